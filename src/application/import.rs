use crate::domain::error::ArgosError;
use crate::domain::model::Location;
use crate::infrastructure::storage::SqliteDocument;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ListingEntry {
    address: String,
    value: String,
}

/// Parse a string listing: one `address<TAB>value` per line.
///
/// Blank lines and lines starting with `#` are ignored. `\n`, `\t` and
/// `\\` inside values are unescaped.
pub fn parse_listing(content: &str) -> Result<Vec<(Location, String)>, ArgosError> {
    let mut items = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let (address, value) = line.split_once('\t').ok_or_else(|| ArgosError::Import {
            line: i + 1,
            message: "expected <address><TAB><value>".to_string(),
        })?;
        let address = address.trim();
        if address.is_empty() {
            return Err(ArgosError::Import {
                line: i + 1,
                message: "empty address".to_string(),
            });
        }
        items.push((Location::new(address), unescape(value)));
    }
    Ok(items)
}

/// Parse a JSON listing: `[{"address": "...", "value": "..."}]`
pub fn parse_json_listing(content: &str) -> Result<Vec<(Location, String)>, ArgosError> {
    let entries: Vec<ListingEntry> = serde_json::from_str(content)?;
    Ok(entries
        .into_iter()
        .map(|entry| (Location::new(entry.address), entry.value))
        .collect())
}

pub async fn import_file(document: &SqliteDocument, path: &Path) -> Result<usize, ArgosError> {
    let content = tokio::fs::read_to_string(path).await?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let items = if is_json {
        parse_json_listing(&content)?
    } else {
        parse_listing(&content)?
    };

    let count = document.import_strings(items).await?;
    tracing::info!(path = %path.display(), count, "imported strings");
    Ok(count)
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
