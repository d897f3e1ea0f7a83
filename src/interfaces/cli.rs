use crate::domain::error::ArgosError;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "argos-strings")]
#[command(about = "Offline string translation for disassembled programs.")]
#[command(version)]
pub struct Cli {
    /// Translate every string in the document
    #[arg(short = 'a', long)]
    pub all: bool,

    /// With --all, skip strings that already have a translation
    #[arg(short = 'p', long)]
    pub pending: bool,

    /// Document database (overrides the config file)
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Import strings from a listing (address<TAB>value lines, or .json)
    #[arg(short = 'i', long, value_name = "FILE")]
    pub import: Option<PathBuf>,

    /// Change a translation option, e.g. --set "Target Language=fr"
    #[arg(long, value_name = "NAME=VALUE")]
    pub set: Vec<String>,

    /// Show translation options
    #[arg(long)]
    pub options: bool,

    /// Translate into a scratch copy, leaving the document untouched
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output the batch report as JSON
    #[arg(long)]
    pub json: bool,

    /// Mark the request as automatic (recorded only)
    #[arg(long)]
    pub auto_translate: bool,

    /// Generate config sample
    #[arg(long)]
    pub generate_config: bool,

    /// Edit configuration file
    #[arg(long)]
    pub edit_config: bool,

    /// Show status
    #[arg(long)]
    pub status: bool,

    /// Locations (addresses) of the strings to translate
    #[arg(num_args = 1..)]
    pub locations: Vec<String>,
}

/// Split a `NAME=VALUE` option assignment
pub fn parse_assignment(assignment: &str) -> Result<(String, String), ArgosError> {
    let (name, value) = assignment.split_once('=').ok_or_else(|| {
        ArgosError::Config(format!("Expected NAME=VALUE, got '{}'", assignment))
    })?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ArgosError::Config(format!(
            "Missing option name in '{}'",
            assignment
        )));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_keeps_spaces_in_name() {
        let (name, value) = parse_assignment("Target Language = fr").unwrap();
        assert_eq!(name, "Target Language");
        assert_eq!(value, "fr");
    }

    #[test]
    fn assignment_splits_on_first_equals() {
        let (name, value) = parse_assignment("Argos Path=/opt/a=b/argos").unwrap();
        assert_eq!(name, "Argos Path");
        assert_eq!(value, "/opt/a=b/argos");
    }

    #[test]
    fn assignment_requires_equals_and_name() {
        assert!(parse_assignment("Target Language").is_err());
        assert!(parse_assignment("=fr").is_err());
    }

    #[test]
    fn cli_parses_locations_and_flags() {
        let cli = Cli::parse_from(["argos-strings", "--dry-run", "0x10", "0x20"]);
        assert!(cli.dry_run);
        assert_eq!(cli.locations, vec!["0x10", "0x20"]);
    }
}
