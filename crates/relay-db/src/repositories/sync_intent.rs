//! PostgreSQL implementation of SyncIntentRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use relay_core::entities::SyncIntent;
use relay_core::error::DomainError;
use relay_core::traits::{RepoResult, SyncIntentRepository};

use crate::models::SyncIntentModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SyncIntentRepository
#[derive(Clone)]
pub struct PgSyncIntentRepository {
    pool: PgPool,
}

impl PgSyncIntentRepository {
    /// Create a new PgSyncIntentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncIntentRepository for PgSyncIntentRepository {
    #[instrument(skip(self, intent), fields(intent_id = %intent.id, event = %intent.event))]
    async fn record(&self, intent: &SyncIntent) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sync_intents (id, direction, event, entity_id, status, created_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(intent.id)
        .bind(intent.direction.as_str())
        .bind(intent.event.as_str())
        .bind(intent.entity_id)
        .bind(intent.status.as_str())
        .bind(intent.created_at)
        .bind(intent.completed_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn complete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE sync_intents
            SET status = 'done', completed_at = NOW()
            WHERE id = $1 AND status = 'pending'
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InternalError(format!(
                "sync intent {id} is not pending"
            )));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_pending(&self, limit: i64) -> RepoResult<Vec<SyncIntent>> {
        let limit = limit.clamp(1, 500);

        let results = sqlx::query_as::<_, SyncIntentModel>(
            r#"
            SELECT id, direction, event, entity_id, status, created_at, completed_at
            FROM sync_intents
            WHERE status = 'pending'
            ORDER BY created_at ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(SyncIntent::try_from).collect()
    }
}
