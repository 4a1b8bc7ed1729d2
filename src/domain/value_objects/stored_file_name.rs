use regex::Regex;
use std::sync::LazyLock;

/// Leaves room for a `_N` counter within the usual 255 byte file name limit.
const MAX_NAME_LEN: usize = 200;

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid regex"));

/// Filesystem-safe name a document's bytes are stored under.
///
/// Derived from the client supplied file name: path components are flattened,
/// whitespace runs become `_`, anything outside `[A-Za-z0-9_.-]` is dropped and
/// leading/trailing dots and underscores are trimmed. Long names are cut to
/// `MAX_NAME_LEN` bytes, keeping the extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredFileName(String);

impl StoredFileName {
    /// Sanitizes `client_name`; `fallback_extension` names the file when nothing
    /// usable survives sanitization.
    pub fn sanitize(client_name: &str, fallback_extension: &str) -> Self {
        let flattened = client_name.replace(['/', '\\'], " ");
        let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
        let cleaned = UNSAFE_CHARS.replace_all(&joined, "");
        let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

        if trimmed.is_empty() || !trimmed.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Self(format!("document.{}", fallback_extension));
        }

        Self(truncate_keeping_extension(trimmed))
    }

    /// Variant used when the plain name is already taken: `report.pdf` -> `report_2.pdf`.
    pub fn with_counter(&self, counter: u32) -> Self {
        match self.0.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Self(format!("{}_{}.{}", stem, counter, ext)),
            _ => Self(format!("{}_{}", self.0, counter)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Only ASCII survives sanitization, so byte offsets are char boundaries.
fn truncate_keeping_extension(name: &str) -> String {
    if name.len() <= MAX_NAME_LEN {
        return name.to_string();
    }
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() < MAX_NAME_LEN / 2 => {
            let stem = stem[..MAX_NAME_LEN - ext.len() - 1].trim_end_matches(['.', '_']);
            format!("{}.{}", stem, ext)
        }
        _ => name[..MAX_NAME_LEN].to_string(),
    }
}

impl std::fmt::Display for StoredFileName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<StoredFileName> for String {
    fn from(name: StoredFileName) -> Self {
        name.0
    }
}
