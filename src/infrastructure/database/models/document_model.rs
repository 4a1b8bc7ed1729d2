use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::domain::entities::{Document, NewDocument};
use crate::domain::value_objects::OwnerId;
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: i32,
    pub owner_id: i32,
    pub filename: String,
    pub original_filename: String,
    pub filepath: String,
    pub file_size: i64,
    pub page_count: i32,
    pub processed_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel<'a> {
    pub owner_id: i32,
    pub filename: &'a str,
    pub original_filename: &'a str,
    pub filepath: &'a str,
    pub file_size: i64,
    pub page_count: i32,
    pub processed_text: &'a str,
}

impl<'a> From<&'a NewDocument> for NewDocumentModel<'a> {
    fn from(document: &'a NewDocument) -> Self {
        Self {
            owner_id: document.owner_id().value(),
            filename: document.filename(),
            original_filename: document.original_filename(),
            filepath: document.filepath(),
            file_size: document.file_size(),
            page_count: document.page_count(),
            processed_text: document.processed_text(),
        }
    }
}

impl TryFrom<DocumentModel> for Document {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        let owner = OwnerId::new(model.owner_id)?;

        let document = NewDocument::new(
            owner,
            model.filename,
            model.original_filename,
            model.filepath,
            model.file_size,
            model.page_count,
            model.processed_text,
        )?;

        Ok(document.into_persisted(model.id, model.created_at))
    }
}
