use std::collections::BTreeSet;

/// Set of file extensions accepted for upload, stored lowercase without the dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedExtensions {
    extensions: BTreeSet<String>,
}

impl AllowedExtensions {
    pub fn new<I, S>(extensions: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions: BTreeSet<String> = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();

        if extensions.is_empty() {
            return Err("At least one allowed extension is required".to_string());
        }

        Ok(Self { extensions })
    }

    /// Parses a comma separated list such as `pdf, PDF,.txt`.
    pub fn parse(list: &str) -> Result<Self, String> {
        Self::new(list.split(','))
    }

    /// Returns the lowercase extension of `file_name` when it is in the set.
    ///
    /// The extension is the suffix after the last dot; a name without a dot, or
    /// ending in a dot, has none.
    pub fn matching_extension(&self, file_name: &str) -> Option<String> {
        let (_, ext) = file_name.rsplit_once('.')?;
        let ext = ext.to_lowercase();
        self.extensions.contains(&ext).then_some(ext)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(|e| e.as_str())
    }
}

impl Default for AllowedExtensions {
    fn default() -> Self {
        Self {
            extensions: BTreeSet::from(["pdf".to_string()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allows_pdf_case_insensitively() {
        let allowed = AllowedExtensions::default();
        assert!(allowed.matching_extension("report.pdf").is_some());
        assert!(allowed.matching_extension("REPORT.PDF").is_some());
        assert!(allowed.matching_extension("archive.tar.pdf").is_some());
        assert!(allowed.matching_extension("report.pdf.exe").is_none());
        assert!(allowed.matching_extension("pdf").is_none());
        assert!(allowed.matching_extension("report.").is_none());
    }

    #[test]
    fn test_parse_list() {
        let allowed = AllowedExtensions::parse(" pdf, .TXT ,,").unwrap();
        assert_eq!(allowed.iter().collect::<Vec<_>>(), vec!["pdf", "txt"]);
        assert_eq!(allowed.matching_extension("notes.Txt"), Some("txt".to_string()));
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert!(AllowedExtensions::parse(" , ").is_err());
    }
}
