//! PostgreSQL implementation of IssueMappingRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use relay_core::entities::{IssueContent, IssueMapping};
use relay_core::error::DomainError;
use relay_core::traits::{IssueMappingRepository, RepoResult};
use relay_core::value_objects::IssueState;

use crate::models::IssueModel;

use super::error::{map_db_error, map_unique_violation};

const ISSUE_COLUMNS: &str = "source_issue_id, source_org, source_repo, source_issue_number, \
     author_login, title, body, state, hub_issue_number";

/// PostgreSQL implementation of IssueMappingRepository
#[derive(Clone)]
pub struct PgIssueMappingRepository {
    pool: PgPool,
}

impl PgIssueMappingRepository {
    /// Create a new PgIssueMappingRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: i64) -> RepoResult<Option<IssueMapping>> {
        let sql = format!("SELECT {ISSUE_COLUMNS} FROM issues WHERE {column} = $1");
        let result = sqlx::query_as::<_, IssueModel>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(IssueMapping::try_from).transpose()
    }
}

#[async_trait]
impl IssueMappingRepository for PgIssueMappingRepository {
    #[instrument(skip(self))]
    async fn find_by_source(&self, source_issue_id: i64) -> RepoResult<Option<IssueMapping>> {
        self.find_one("source_issue_id", source_issue_id).await
    }

    #[instrument(skip(self))]
    async fn find_by_hub(&self, hub_issue_number: i64) -> RepoResult<Option<IssueMapping>> {
        self.find_one("hub_issue_number", hub_issue_number).await
    }

    #[instrument(skip(self, mapping), fields(source_issue_id = mapping.source_issue_id, hub_issue_number = mapping.hub_issue_number))]
    async fn create(&self, mapping: &IssueMapping) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO issues (source_issue_id, source_org, source_repo, source_issue_number,
                                author_login, title, body, state, hub_issue_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(mapping.source_issue_id)
        .bind(&mapping.source_org)
        .bind(&mapping.source_repo)
        .bind(mapping.source_issue_number)
        .bind(&mapping.author_login)
        .bind(&mapping.title)
        .bind(&mapping.body)
        .bind(mapping.state.as_str())
        .bind(mapping.hub_issue_number)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                DomainError::DuplicateMapping(format!(
                    "source issue {} / hub issue #{}",
                    mapping.source_issue_id, mapping.hub_issue_number
                ))
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self, content))]
    async fn update(&self, source_issue_id: i64, content: &IssueContent) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE issues
            SET author_login = $2, title = $3, body = $4, state = $5
            WHERE source_issue_id = $1
            "#,
        )
        .bind(source_issue_id)
        .bind(&content.author_login)
        .bind(&content.title)
        .bind(&content.body)
        .bind(content.state.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::issue_not_found_by_source(source_issue_id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_state(&self, source_issue_id: i64, state: IssueState) -> RepoResult<()> {
        let result = sqlx::query("UPDATE issues SET state = $2 WHERE source_issue_id = $1")
            .bind(source_issue_id)
            .bind(state.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::issue_not_found_by_source(source_issue_id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, source_issue_id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM issues WHERE source_issue_id = $1")
            .bind(source_issue_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::issue_not_found_by_source(source_issue_id));
        }

        Ok(())
    }
}
