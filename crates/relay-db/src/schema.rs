//! Schema bootstrap
//!
//! Tables are created idempotently at startup. Source-origin comment pairs
//! live in `comments`, hub-origin pairs in `synced_comments`; both cascade
//! with their parent issue mapping.

use sqlx::PgPool;
use tracing::info;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS issues (
        source_issue_id     BIGINT PRIMARY KEY,
        source_org          TEXT NOT NULL,
        source_repo         TEXT NOT NULL,
        source_issue_number BIGINT NOT NULL,
        author_login        TEXT NOT NULL,
        title               TEXT NOT NULL,
        body                TEXT NOT NULL DEFAULT '',
        state               TEXT NOT NULL DEFAULT 'open' CHECK (state IN ('open', 'closed')),
        hub_issue_number    BIGINT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        source_comment_id BIGINT PRIMARY KEY,
        hub_comment_id    BIGINT NOT NULL,
        parent_issue_id   BIGINT NOT NULL REFERENCES issues (source_issue_id) ON DELETE CASCADE,
        author_login      TEXT NOT NULL,
        body              TEXT NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS comments_hub_comment_id_idx ON comments (hub_comment_id)",
    "CREATE INDEX IF NOT EXISTS comments_parent_issue_id_idx ON comments (parent_issue_id)",
    r#"
    CREATE TABLE IF NOT EXISTS synced_comments (
        hub_comment_id    BIGINT PRIMARY KEY,
        source_comment_id BIGINT NOT NULL,
        parent_issue_id   BIGINT NOT NULL REFERENCES issues (source_issue_id) ON DELETE CASCADE,
        author_login      TEXT NOT NULL,
        body              TEXT NOT NULL DEFAULT ''
    )
    "#,
    "CREATE INDEX IF NOT EXISTS synced_comments_source_comment_id_idx ON synced_comments (source_comment_id)",
    "CREATE INDEX IF NOT EXISTS synced_comments_parent_issue_id_idx ON synced_comments (parent_issue_id)",
    r#"
    CREATE TABLE IF NOT EXISTS sync_intents (
        id           UUID PRIMARY KEY,
        direction    TEXT NOT NULL,
        event        TEXT NOT NULL,
        entity_id    BIGINT NOT NULL,
        status       TEXT NOT NULL CHECK (status IN ('pending', 'done')),
        created_at   TIMESTAMPTZ NOT NULL,
        completed_at TIMESTAMPTZ
    )
    "#,
    "CREATE INDEX IF NOT EXISTS sync_intents_pending_idx ON sync_intents (created_at) WHERE status = 'pending'",
];

/// Create all tables and indexes if they do not exist yet
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    for statement in STATEMENTS {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!(statements = STATEMENTS.len(), "Database schema ready");
    Ok(())
}
