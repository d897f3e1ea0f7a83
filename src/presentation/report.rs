use crate::domain::model::{BatchReport, BatchStatus, ItemOutcome};
use colored::Colorize;
use std::fmt::Write;

/// Render a batch report for the terminal
pub fn format_report(report: &BatchReport) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "{} {} → {} {}",
        report.label.bold(),
        report.languages.from.cyan(),
        report.languages.to.cyan(),
        format!("[{}]", report.translator).bright_black()
    )
    .ok();

    for item in &report.items {
        let original = item.original.as_deref().unwrap_or("");
        let line = match &item.outcome {
            ItemOutcome::Translated(value) => format!(
                "  {} {}  {}  {}",
                "✔".green(),
                item.location.to_string().bright_white(),
                original,
                value.green()
            ),
            ItemOutcome::Untranslated => format!(
                "  {} {}  {}  {}",
                "·".yellow(),
                item.location.to_string().bright_white(),
                original,
                "(no translation)".yellow()
            ),
            ItemOutcome::Skipped => format!(
                "  {} {}  {}",
                "-".bright_black(),
                item.location.to_string().bright_black(),
                "(no string)".bright_black()
            ),
            ItemOutcome::Failed(reason) => format!(
                "  {} {}  {}  {}",
                "✘".red(),
                item.location.to_string().bright_white(),
                original,
                reason.red()
            ),
            ItemOutcome::NotAttempted => format!(
                "  {} {}",
                " ".normal(),
                item.location.to_string().bright_black()
            ),
        };
        writeln!(output, "{}", line).ok();
    }

    let summary = format!(
        "{}/{} translated",
        report.translated_count(),
        report.items.len()
    );
    let status = match &report.status {
        BatchStatus::Complete => "complete".green().to_string(),
        BatchStatus::Partial => "partial".yellow().to_string(),
        BatchStatus::Aborted { index, reason } => {
            format!("aborted at item {}: {}", index + 1, reason)
                .red()
                .to_string()
        }
        BatchStatus::Cancelled { index } => format!("cancelled before item {}", index + 1)
            .yellow()
            .to_string(),
    };
    let commit = if report.committed {
        "committed".normal()
    } else {
        "NOT committed".red().bold()
    };
    writeln!(output, "\n  {}, {}, {}", summary, status, commit).ok();

    output
}
