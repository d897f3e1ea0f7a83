use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

pub const DEFAULT_SOURCE_LANGUAGE: &str = "ko";
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";
pub const DEFAULT_ARGOS_PATH: &str = "argos-translate";

// 字符串所在位置（地址文本，对调用方不透明）
// 按地址数值排序，无法解析的地址排在后面并按文本排序
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of a hex address such as `0x401000` or `00401000`
    pub fn offset(&self) -> Option<u64> {
        let digits = self
            .0
            .strip_prefix("0x")
            .or_else(|| self.0.strip_prefix("0X"))
            .unwrap_or(&self.0);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        u64::from_str_radix(digits, 16).ok()
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.offset(), other.offset()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

/// Translation metadata attached to a string-bearing data unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationAnnotation {
    pub translated_value: String,
    pub show_translated: bool,
}

impl TranslationAnnotation {
    /// Annotation that replaces the original string on display.
    pub fn shown(translated_value: impl Into<String>) -> Self {
        Self {
            translated_value: translated_value.into(),
            show_translated: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguagePair {
    pub from: String,
    pub to: String,
}

/// Immutable view of the persisted translation options.
///
/// A batch holds one snapshot for its whole duration, so option changes
/// made while it runs only affect later batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationSettings {
    pub source_language: String,
    pub target_language: String,
    pub argos_path: String,
}

impl TranslationSettings {
    pub fn languages(&self) -> LanguagePair {
        LanguagePair {
            from: self.source_language.clone(),
            to: self.target_language.clone(),
        }
    }
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            argos_path: DEFAULT_ARGOS_PATH.to_string(),
        }
    }
}

/// Options supplied by the caller of a translation request.
///
/// Languages are never taken from here: they always come from the
/// persisted [`TranslationSettings`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslateOptions {
    pub auto_translate: bool,
}

// 单条字符串的处理结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ItemOutcome {
    /// Location did not resolve, or its value was null or empty
    Skipped,
    Translated(String),
    /// Translator returned an empty line or nothing
    Untranslated,
    /// Error that aborted the remaining batch
    Failed(String),
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    pub location: Location,
    pub original: Option<String>,
    pub outcome: ItemOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every attempted item received a translation
    Complete,
    /// All items were attempted but some received no translation
    Partial,
    /// A failure on item `index` stopped the batch
    Aborted { index: usize, reason: String },
    /// Cancellation observed before item `index`
    Cancelled { index: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_id: String,
    pub translator: String,
    pub label: String,
    pub languages: LanguagePair,
    pub items: Vec<BatchItem>,
    pub status: BatchStatus,
    pub committed: bool,
}

impl BatchReport {
    pub fn translated_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Translated(_)))
            .count()
    }

    pub fn count(&self, predicate: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| predicate(&item.outcome)).count()
    }
}
