//! PostgreSQL implementation of CommentMappingRepository
//!
//! The origin side selects the relation: source-origin pairs are keyed by
//! `source_comment_id` in `comments`, hub-origin pairs by `hub_comment_id`
//! in `synced_comments`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use relay_core::entities::{CommentMapping, CommentTarget};
use relay_core::error::DomainError;
use relay_core::traits::{CommentMappingRepository, RepoResult};
use relay_core::value_objects::Side;

use crate::mappers::comment_target;
use crate::models::CommentTargetModel;

use super::error::{map_child_insert_error, map_db_error};

/// Relation and key column holding comments written on `origin`
fn relation(origin: Side) -> (&'static str, &'static str) {
    match origin {
        Side::Source => ("comments", "source_comment_id"),
        Side::Hub => ("synced_comments", "hub_comment_id"),
    }
}

/// PostgreSQL implementation of CommentMappingRepository
#[derive(Clone)]
pub struct PgCommentMappingRepository {
    pool: PgPool,
}

impl PgCommentMappingRepository {
    /// Create a new PgCommentMappingRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentMappingRepository for PgCommentMappingRepository {
    #[instrument(skip(self))]
    async fn find(&self, origin: Side, comment_id: i64) -> RepoResult<Option<CommentTarget>> {
        let (table, key) = relation(origin);
        let sql = format!(
            r#"
            SELECT c.source_comment_id, c.hub_comment_id, c.parent_issue_id, c.author_login, c.body,
                   i.source_org AS issue_source_org,
                   i.source_repo AS issue_source_repo,
                   i.source_issue_number AS issue_source_issue_number,
                   i.author_login AS issue_author_login,
                   i.title AS issue_title,
                   i.body AS issue_body,
                   i.state AS issue_state,
                   i.hub_issue_number AS issue_hub_issue_number
            FROM {table} c
            JOIN issues i ON i.source_issue_id = c.parent_issue_id
            WHERE c.{key} = $1
            "#
        );

        let result = sqlx::query_as::<_, CommentTargetModel>(&sql)
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(|row| comment_target(origin, row)).transpose()
    }

    #[instrument(skip(self, mapping), fields(origin = %mapping.origin, comment_id = mapping.origin_id()))]
    async fn create(&self, mapping: &CommentMapping) -> RepoResult<()> {
        let (table, _) = relation(mapping.origin);
        let sql = format!(
            r#"
            INSERT INTO {table} (source_comment_id, hub_comment_id, parent_issue_id, author_login, body)
            VALUES ($1, $2, $3, $4, $5)
            "#
        );

        sqlx::query(&sql)
            .bind(mapping.source_comment_id)
            .bind(mapping.hub_comment_id)
            .bind(mapping.parent_issue_id)
            .bind(&mapping.author_login)
            .bind(&mapping.body)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_child_insert_error(
                    e,
                    || {
                        DomainError::DuplicateMapping(format!(
                            "{} comment {}",
                            mapping.origin,
                            mapping.origin_id()
                        ))
                    },
                    || DomainError::issue_not_found_by_source(mapping.parent_issue_id),
                )
            })?;

        Ok(())
    }

    #[instrument(skip(self, body))]
    async fn update(
        &self,
        origin: Side,
        comment_id: i64,
        author_login: &str,
        body: &str,
    ) -> RepoResult<()> {
        let (table, key) = relation(origin);
        let sql = format!("UPDATE {table} SET author_login = $2, body = $3 WHERE {key} = $1");

        let result = sqlx::query(&sql)
            .bind(comment_id)
            .bind(author_login)
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommentMappingNotFound {
                origin,
                id: comment_id,
            });
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, origin: Side, comment_id: i64) -> RepoResult<()> {
        let (table, key) = relation(origin);
        let sql = format!("DELETE FROM {table} WHERE {key} = $1");

        let result = sqlx::query(&sql)
            .bind(comment_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CommentMappingNotFound {
                origin,
                id: comment_id,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_per_origin() {
        assert_eq!(relation(Side::Source), ("comments", "source_comment_id"));
        assert_eq!(relation(Side::Hub), ("synced_comments", "hub_comment_id"));
    }
}
