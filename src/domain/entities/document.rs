use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::OwnerId;

/// A document whose text has been extracted but which has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    owner_id: OwnerId,
    filename: String,
    original_filename: String,
    filepath: String,
    file_size: i64,
    page_count: i32,
    processed_text: String,
}

impl NewDocument {
    pub fn new(
        owner_id: OwnerId,
        filename: String,
        original_filename: String,
        filepath: String,
        file_size: i64,
        page_count: i32,
        processed_text: String,
    ) -> Result<Self, String> {
        if file_size < 0 {
            return Err(format!("File size cannot be negative: {}", file_size));
        }
        if page_count < 0 {
            return Err(format!("Page count cannot be negative: {}", page_count));
        }
        if filename.trim().is_empty() {
            return Err("Stored file name cannot be empty".to_string());
        }
        for (field, value) in [
            ("filename", &filename),
            ("original_filename", &original_filename),
            ("filepath", &filepath),
            ("processed_text", &processed_text),
        ] {
            if value.contains('\0') {
                return Err(format!("{} cannot contain NUL characters", field));
            }
        }

        Ok(Self {
            owner_id,
            filename,
            original_filename,
            filepath,
            file_size,
            page_count,
            processed_text,
        })
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn filepath(&self) -> &str {
        &self.filepath
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn page_count(&self) -> i32 {
        self.page_count
    }

    pub fn processed_text(&self) -> &str {
        &self.processed_text
    }

    /// Storage location changes when the staged bytes are moved into place.
    pub fn relocate(&mut self, filename: String, filepath: String) {
        self.filename = filename;
        self.filepath = filepath;
    }

    /// Attaches the identity assigned by storage.
    pub fn into_persisted(self, id: i32, created_at: DateTime<Utc>) -> Document {
        Document {
            id,
            owner_id: self.owner_id,
            filename: self.filename,
            original_filename: self.original_filename,
            filepath: self.filepath,
            file_size: self.file_size,
            page_count: self.page_count,
            processed_text: self.processed_text,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: i32,
    owner_id: OwnerId,
    filename: String,
    original_filename: String,
    filepath: String,
    file_size: i64,
    page_count: i32,
    processed_text: String,
    created_at: DateTime<Utc>,
}

impl Document {
    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    pub fn filepath(&self) -> &str {
        &self.filepath
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn page_count(&self) -> i32 {
        self.page_count
    }

    pub fn processed_text(&self) -> &str {
        &self.processed_text
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_owned_by(&self, owner: OwnerId) -> bool {
        self.owner_id == owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> OwnerId {
        OwnerId::new(7).unwrap()
    }

    #[test]
    fn test_new_document() {
        let doc = NewDocument::new(
            owner(),
            "report.pdf".to_string(),
            "My Report.pdf".to_string(),
            "/uploads/report.pdf".to_string(),
            2048,
            3,
            "page one".to_string(),
        )
        .unwrap();

        assert_eq!(doc.owner_id(), owner());
        assert_eq!(doc.original_filename(), "My Report.pdf");
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_negative_size_and_pages_are_rejected() {
        let size = NewDocument::new(
            owner(),
            "a.pdf".to_string(),
            "a.pdf".to_string(),
            "/a.pdf".to_string(),
            -1,
            1,
            String::new(),
        );
        assert!(size.is_err());

        let pages = NewDocument::new(
            owner(),
            "a.pdf".to_string(),
            "a.pdf".to_string(),
            "/a.pdf".to_string(),
            1,
            -1,
            String::new(),
        );
        assert!(pages.is_err());
    }

    #[test]
    fn test_nul_characters_are_rejected() {
        let name = NewDocument::new(
            owner(),
            "a.pdf".to_string(),
            "bad\0name.pdf".to_string(),
            "/a.pdf".to_string(),
            1,
            1,
            String::new(),
        );
        assert_eq!(
            name.unwrap_err(),
            "original_filename cannot contain NUL characters"
        );

        let text = NewDocument::new(
            owner(),
            "a.pdf".to_string(),
            "a.pdf".to_string(),
            "/a.pdf".to_string(),
            1,
            1,
            "page\0one".to_string(),
        );
        assert!(text.is_err());
    }

    #[test]
    fn test_persisting_keeps_fields() {
        let mut doc = NewDocument::new(
            owner(),
            "a.pdf".to_string(),
            "a.pdf".to_string(),
            "/staging/tmp123".to_string(),
            10,
            1,
            "text".to_string(),
        )
        .unwrap();
        doc.relocate("a_1.pdf".to_string(), "/uploads/a_1.pdf".to_string());

        let now = Utc::now();
        let persisted = doc.into_persisted(11, now);

        assert_eq!(persisted.id(), 11);
        assert_eq!(persisted.filename(), "a_1.pdf");
        assert_eq!(persisted.filepath(), "/uploads/a_1.pdf");
        assert_eq!(persisted.created_at(), now);
        assert!(persisted.is_owned_by(owner()));
        assert!(!persisted.is_owned_by(OwnerId::new(8).unwrap()));
    }
}
