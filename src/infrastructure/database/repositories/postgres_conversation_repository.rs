use async_trait::async_trait;
use diesel::prelude::*;

use crate::domain::entities::{ConversationTurn, NewConversationTurn};
use crate::domain::repositories::{
    ConversationRepository, conversation_repository::ConversationRepositoryError,
};
use crate::domain::value_objects::OwnerId;
use crate::infrastructure::database::models::{ConversationTurnModel, NewConversationTurnModel};
use crate::infrastructure::database::schema::conversation_turns;
use crate::infrastructure::database::{DbConnection, DbPool, get_connection_from_pool};

pub struct PostgresConversationRepository {
    pool: DbPool,
}

impl PostgresConversationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn with_connection<T, F>(&self, query: F) -> Result<T, ConversationRepositoryError>
    where
        F: FnOnce(&mut DbConnection) -> QueryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = get_connection_from_pool(&pool)
                .map_err(|e| ConversationRepositoryError::DatabaseError(e.to_string()))?;
            query(&mut conn)
                .map_err(|e| ConversationRepositoryError::DatabaseError(e.to_string()))
        })
        .await
        .map_err(|e| {
            ConversationRepositoryError::DatabaseError(format!("Database task failed: {}", e))
        })?
    }
}

#[async_trait]
impl ConversationRepository for PostgresConversationRepository {
    async fn save(
        &self,
        turn: &NewConversationTurn,
    ) -> Result<ConversationTurn, ConversationRepositoryError> {
        let turn = turn.clone();
        let inserted = self
            .with_connection(move |conn| {
                diesel::insert_into(conversation_turns::table)
                    .values(NewConversationTurnModel::from(&turn))
                    .returning(ConversationTurnModel::as_returning())
                    .get_result::<ConversationTurnModel>(conn)
            })
            .await?;

        ConversationTurn::try_from(inserted).map_err(ConversationRepositoryError::ValidationError)
    }

    async fn find_for_owner(
        &self,
        turn_id: i32,
        owner: OwnerId,
    ) -> Result<Option<ConversationTurn>, ConversationRepositoryError> {
        let result = self
            .with_connection(move |conn| {
                conversation_turns::table
                    .filter(conversation_turns::id.eq(turn_id))
                    .filter(conversation_turns::owner_id.eq(owner.value()))
                    .select(ConversationTurnModel::as_select())
                    .first::<ConversationTurnModel>(conn)
                    .optional()
            })
            .await?;

        result
            .map(ConversationTurn::try_from)
            .transpose()
            .map_err(ConversationRepositoryError::ValidationError)
    }

    async fn list_for_owner(
        &self,
        owner: OwnerId,
        limit: Option<i64>,
    ) -> Result<Vec<ConversationTurn>, ConversationRepositoryError> {
        let models = self
            .with_connection(move |conn| {
                let mut query = conversation_turns::table
                    .filter(conversation_turns::owner_id.eq(owner.value()))
                    .order((
                        conversation_turns::created_at.desc(),
                        conversation_turns::id.desc(),
                    ))
                    .select(ConversationTurnModel::as_select())
                    .into_boxed();

                if let Some(limit) = limit {
                    query = query.limit(limit);
                }

                query.load::<ConversationTurnModel>(conn)
            })
            .await?;

        models
            .into_iter()
            .map(|model| {
                ConversationTurn::try_from(model)
                    .map_err(ConversationRepositoryError::ValidationError)
            })
            .collect()
    }

    async fn count_for_owner(&self, owner: OwnerId) -> Result<i64, ConversationRepositoryError> {
        self.with_connection(move |conn| {
            conversation_turns::table
                .filter(conversation_turns::owner_id.eq(owner.value()))
                .count()
                .get_result(conn)
        })
        .await
    }
}
