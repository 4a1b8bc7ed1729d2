//! Test doubles shared by unit tests across layers.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use lopdf::content::{Content, Operation};
use lopdf::{Document as PdfDocument, Object, Stream, dictionary};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use crate::application::ports::text_generator::{
    GenerationOutput, GenerationRequest, InferenceError, TextGenerator,
};
use crate::domain::entities::{ConversationTurn, Document, NewConversationTurn, NewDocument};
use crate::domain::repositories::conversation_repository::ConversationRepositoryError;
use crate::domain::repositories::document_repository::DocumentRepositoryError;
use crate::domain::repositories::{ConversationRepository, DocumentRepository};
use crate::domain::value_objects::OwnerId;
use crate::infrastructure::database::schema::users;
use crate::infrastructure::database::{
    DbPool, create_connection_pool, get_connection_from_pool, run_migrations,
};

fn apply_limit<T>(mut items: Vec<T>, limit: Option<i64>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit.max(0) as usize);
    }
    items
}

#[derive(Default)]
pub struct InMemoryDocumentRepository {
    rows: Mutex<Vec<Document>>,
    fail_next: AtomicBool,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `save_batch` fail without storing anything.
    pub fn fail_next_save(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn save_batch(
        &self,
        documents: &[NewDocument],
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(DocumentRepositoryError::DatabaseError(
                "connection reset".to_string(),
            ));
        }

        let mut rows = self.rows.lock().unwrap();
        let mut saved = Vec::with_capacity(documents.len());
        for document in documents {
            let id = rows.len() as i32 + 1;
            let persisted = document.clone().into_persisted(id, Utc::now());
            rows.push(persisted.clone());
            saved.push(persisted);
        }
        Ok(saved)
    }

    async fn find_for_owner(
        &self,
        id: i32,
        owner: OwnerId,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|doc| doc.id() == id && doc.is_owned_by(owner))
            .cloned())
    }

    async fn list_for_owner(
        &self,
        owner: OwnerId,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let mut owned: Vec<Document> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|doc| doc.is_owned_by(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(apply_limit(owned, limit))
    }

    async fn count_for_owner(&self, owner: OwnerId) -> Result<i64, DocumentRepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|doc| doc.is_owned_by(owner)).count() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryConversationRepository {
    rows: Mutex<Vec<ConversationTurn>>,
    fail_next: AtomicBool,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<ConversationTurn> {
        self.rows.lock().unwrap().clone()
    }

    pub fn fail_next_save(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn save(
        &self,
        turn: &NewConversationTurn,
    ) -> Result<ConversationTurn, ConversationRepositoryError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ConversationRepositoryError::DatabaseError(
                "connection reset".to_string(),
            ));
        }

        let mut rows = self.rows.lock().unwrap();
        let persisted = turn.clone().into_persisted(rows.len() as i32 + 1, Utc::now());
        rows.push(persisted.clone());
        Ok(persisted)
    }

    async fn find_for_owner(
        &self,
        id: i32,
        owner: OwnerId,
    ) -> Result<Option<ConversationTurn>, ConversationRepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|turn| turn.id() == id && turn.owner_id() == owner)
            .cloned())
    }

    async fn list_for_owner(
        &self,
        owner: OwnerId,
        limit: Option<i64>,
    ) -> Result<Vec<ConversationTurn>, ConversationRepositoryError> {
        let mut owned: Vec<ConversationTurn> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|turn| turn.owner_id() == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(apply_limit(owned, limit))
    }

    async fn count_for_owner(&self, owner: OwnerId) -> Result<i64, ConversationRepositoryError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|turn| turn.owner_id() == owner).count() as i64)
    }
}

/// Generator that replays a fixed answer (or failure) and records every call.
pub struct ScriptedGenerator {
    answer: Option<String>,
    tokens: Option<i32>,
    delay: Option<Duration>,
    requests: Mutex<Vec<GenerationRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedGenerator {
    fn with_answer(answer: Option<String>) -> Self {
        Self {
            answer,
            tokens: None,
            delay: None,
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn answering(answer: &str) -> Self {
        Self::with_answer(Some(answer.to_string()))
    }

    pub fn failing() -> Self {
        Self::with_answer(None)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_tokens(mut self, tokens: i32) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationOutput, InferenceError> {
        self.requests.lock().unwrap().push(request);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.answer {
            Some(answer) => Ok(GenerationOutput {
                text: answer.clone(),
                tokens_used: self.tokens,
            }),
            None => Err(InferenceError::ServiceUnavailable),
        }
    }

    async fn health_check(&self) -> Result<bool, InferenceError> {
        Ok(self.answer.is_some())
    }

    fn model_info(&self) -> String {
        "scripted".to_string()
    }
}

/// Builds a PDF with one Courier text line per page.
pub fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = PdfDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode page content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("serialize pdf");
    buffer
}

/// Regular files directly inside `dir`, sorted by name. Missing directory yields nothing.
pub fn files_in(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Pool on the database named by `DATABASE_URL`, migrated once per test run.
/// `None` when the variable is unset, so database tests can skip themselves.
pub fn test_database() -> Option<DbPool> {
    static POOL: OnceLock<Option<DbPool>> = OnceLock::new();
    POOL.get_or_init(|| {
        let url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())?;
        let pool = create_connection_pool(&url, 4).expect("test database pool");
        let mut conn = get_connection_from_pool(&pool).expect("test database connection");
        run_migrations(&mut conn).expect("migrations apply");
        Some(pool)
    })
    .clone()
}

/// Inserts a user with a fresh name and returns its id.
pub fn create_test_user(pool: &DbPool) -> OwnerId {
    static SEQ: AtomicUsize = AtomicUsize::new(0);
    let username = format!(
        "t{}_{}_{}",
        std::process::id(),
        Utc::now().timestamp_micros(),
        SEQ.fetch_add(1, Ordering::SeqCst)
    );

    let mut conn = get_connection_from_pool(pool).unwrap();
    let id = diesel::insert_into(users::table)
        .values(users::username.eq(username))
        .returning(users::id)
        .get_result::<i32>(&mut conn)
        .unwrap();
    OwnerId::new(id).unwrap()
}

pub fn delete_test_user(pool: &DbPool, owner: OwnerId) {
    let mut conn = get_connection_from_pool(pool).unwrap();
    diesel::delete(users::table.filter(users::id.eq(owner.value())))
        .execute(&mut conn)
        .unwrap();
}
