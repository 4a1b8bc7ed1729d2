use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::{Document, NewDocument};
use crate::domain::repositories::{DocumentRepository, document_repository::DocumentRepositoryError};
use crate::domain::value_objects::OwnerId;
use crate::infrastructure::database::models::{DocumentModel, NewDocumentModel};
use crate::infrastructure::database::schema::documents;
use crate::infrastructure::database::{DbConnection, DbPool, get_connection_from_pool};

pub struct PostgresDocumentRepository {
    pool: DbPool,
}

impl PostgresDocumentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Runs a query on the blocking pool with a pooled connection.
    async fn with_connection<T, F>(&self, query: F) -> Result<T, DocumentRepositoryError>
    where
        F: FnOnce(&mut DbConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = get_connection_from_pool(&pool)
                .map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))?;
            query(&mut conn).map_err(|e| DocumentRepositoryError::DatabaseError(e.to_string()))
        })
        .await
        .map_err(|e| DocumentRepositoryError::DatabaseError(format!("Database task failed: {}", e)))?
    }
}

fn to_domain(models: Vec<DocumentModel>) -> Result<Vec<Document>, DocumentRepositoryError> {
    models
        .into_iter()
        .map(|model| Document::try_from(model).map_err(DocumentRepositoryError::ValidationError))
        .collect()
}

#[async_trait]
impl DocumentRepository for PostgresDocumentRepository {
    async fn save_batch(
        &self,
        batch: &[NewDocument],
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let batch = batch.to_vec();
        let inserted = self
            .with_connection(move |conn| {
                conn.transaction::<Vec<DocumentModel>, diesel::result::Error, _>(|conn| {
                    batch
                        .iter()
                        .map(|document| {
                            diesel::insert_into(documents::table)
                                .values(NewDocumentModel::from(document))
                                .returning(DocumentModel::as_returning())
                                .get_result(conn)
                        })
                        .collect()
                })
            })
            .await?;

        to_domain(inserted)
    }

    async fn find_for_owner(
        &self,
        document_id: i32,
        owner: OwnerId,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let result = self
            .with_connection(move |conn| {
                documents::table
                    .filter(documents::id.eq(document_id))
                    .filter(documents::owner_id.eq(owner.value()))
                    .select(DocumentModel::as_select())
                    .first::<DocumentModel>(conn)
                    .optional()
            })
            .await?;

        match result {
            Some(model) => {
                let document =
                    Document::try_from(model).map_err(DocumentRepositoryError::ValidationError)?;
                Ok(Some(document))
            }
            None => Ok(None),
        }
    }

    async fn list_for_owner(
        &self,
        owner: OwnerId,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let models = self
            .with_connection(move |conn| {
                let mut query = documents::table
                    .filter(documents::owner_id.eq(owner.value()))
                    .order((documents::created_at.desc(), documents::id.desc()))
                    .select(DocumentModel::as_select())
                    .into_boxed();

                if let Some(limit) = limit {
                    query = query.limit(limit);
                }

                query.load::<DocumentModel>(conn)
            })
            .await?;

        to_domain(models)
    }

    async fn count_for_owner(&self, owner: OwnerId) -> Result<i64, DocumentRepositoryError> {
        self.with_connection(move |conn| {
            documents::table
                .filter(documents::owner_id.eq(owner.value()))
                .count()
                .get_result(conn)
        })
        .await
    }
}
