//! In-memory repositories sharing one set of tables behind a lock

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use relay_core::entities::{
    CommentMapping, CommentTarget, IntentStatus, IssueContent, IssueMapping, SyncIntent,
};
use relay_core::error::DomainError;
use relay_core::traits::{
    CommentMappingRepository, IssueMappingRepository, RepoResult, SyncIntentRepository,
};
use relay_core::value_objects::{IssueState, Side};

#[derive(Debug, Default)]
struct Tables {
    issues: HashMap<i64, IssueMapping>,
    hub_index: HashMap<i64, i64>,
    comments: HashMap<(Side, i64), CommentMapping>,
    intents: Vec<SyncIntent>,
}

/// Shared in-memory tables; hand out one repository handle per trait
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue_repository(&self) -> MemoryIssueMappingRepository {
        MemoryIssueMappingRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn comment_repository(&self) -> MemoryCommentMappingRepository {
        MemoryCommentMappingRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    pub fn intent_repository(&self) -> MemorySyncIntentRepository {
        MemorySyncIntentRepository {
            tables: Arc::clone(&self.tables),
        }
    }

    /// Number of comment mappings currently stored (both origins)
    pub fn comment_count(&self) -> usize {
        self.tables.read().comments.len()
    }

    /// Every intent ever recorded, in insertion order
    pub fn intents(&self) -> Vec<SyncIntent> {
        self.tables.read().intents.clone()
    }
}

#[derive(Debug, Clone)]
pub struct MemoryIssueMappingRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl IssueMappingRepository for MemoryIssueMappingRepository {
    async fn find_by_source(&self, source_issue_id: i64) -> RepoResult<Option<IssueMapping>> {
        Ok(self.tables.read().issues.get(&source_issue_id).cloned())
    }

    async fn find_by_hub(&self, hub_issue_number: i64) -> RepoResult<Option<IssueMapping>> {
        let tables = self.tables.read();
        Ok(tables
            .hub_index
            .get(&hub_issue_number)
            .and_then(|id| tables.issues.get(id))
            .cloned())
    }

    async fn create(&self, mapping: &IssueMapping) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if tables.issues.contains_key(&mapping.source_issue_id)
            || tables.hub_index.contains_key(&mapping.hub_issue_number)
        {
            return Err(DomainError::DuplicateMapping(format!(
                "source issue {} / hub issue #{}",
                mapping.source_issue_id, mapping.hub_issue_number
            )));
        }
        tables
            .hub_index
            .insert(mapping.hub_issue_number, mapping.source_issue_id);
        tables
            .issues
            .insert(mapping.source_issue_id, mapping.clone());
        Ok(())
    }

    async fn update(&self, source_issue_id: i64, content: &IssueContent) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let mapping = tables
            .issues
            .get_mut(&source_issue_id)
            .ok_or_else(|| DomainError::issue_not_found_by_source(source_issue_id))?;
        mapping.apply(content.clone());
        Ok(())
    }

    async fn set_state(&self, source_issue_id: i64, state: IssueState) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let mapping = tables
            .issues
            .get_mut(&source_issue_id)
            .ok_or_else(|| DomainError::issue_not_found_by_source(source_issue_id))?;
        mapping.state = state;
        Ok(())
    }

    async fn delete(&self, source_issue_id: i64) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let mapping = tables
            .issues
            .remove(&source_issue_id)
            .ok_or_else(|| DomainError::issue_not_found_by_source(source_issue_id))?;
        tables.hub_index.remove(&mapping.hub_issue_number);
        tables
            .comments
            .retain(|_, c| c.parent_issue_id != source_issue_id);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct MemoryCommentMappingRepository {
    tables: Arc<RwLock<Tables>>,
}

fn comment_not_found(origin: Side, id: i64) -> DomainError {
    DomainError::CommentMappingNotFound { origin, id }
}

#[async_trait]
impl CommentMappingRepository for MemoryCommentMappingRepository {
    async fn find(&self, origin: Side, comment_id: i64) -> RepoResult<Option<CommentTarget>> {
        let tables = self.tables.read();
        let Some(comment) = tables.comments.get(&(origin, comment_id)) else {
            return Ok(None);
        };
        // Parent rows cascade, so a dangling comment means a broken invariant
        let parent = tables
            .issues
            .get(&comment.parent_issue_id)
            .cloned()
            .ok_or_else(|| DomainError::issue_not_found_by_source(comment.parent_issue_id))?;
        Ok(Some(CommentTarget {
            comment: comment.clone(),
            parent,
        }))
    }

    async fn create(&self, mapping: &CommentMapping) -> RepoResult<()> {
        let mut tables = self.tables.write();
        if !tables.issues.contains_key(&mapping.parent_issue_id) {
            return Err(DomainError::issue_not_found_by_source(
                mapping.parent_issue_id,
            ));
        }
        let key = (mapping.origin, mapping.origin_id());
        if tables.comments.contains_key(&key) {
            return Err(DomainError::DuplicateMapping(format!(
                "{} comment {}",
                mapping.origin,
                mapping.origin_id()
            )));
        }
        tables.comments.insert(key, mapping.clone());
        Ok(())
    }

    async fn update(
        &self,
        origin: Side,
        comment_id: i64,
        author_login: &str,
        body: &str,
    ) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let comment = tables
            .comments
            .get_mut(&(origin, comment_id))
            .ok_or_else(|| comment_not_found(origin, comment_id))?;
        comment.author_login = author_login.to_string();
        comment.body = body.to_string();
        Ok(())
    }

    async fn delete(&self, origin: Side, comment_id: i64) -> RepoResult<()> {
        self.tables
            .write()
            .comments
            .remove(&(origin, comment_id))
            .map(|_| ())
            .ok_or_else(|| comment_not_found(origin, comment_id))
    }
}

#[derive(Debug, Clone)]
pub struct MemorySyncIntentRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl SyncIntentRepository for MemorySyncIntentRepository {
    async fn record(&self, intent: &SyncIntent) -> RepoResult<()> {
        self.tables.write().intents.push(intent.clone());
        Ok(())
    }

    async fn complete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables.write();
        let intent = tables
            .intents
            .iter_mut()
            .find(|i| i.id == id && i.is_pending())
            .ok_or_else(|| DomainError::InternalError(format!("sync intent {id} is not pending")))?;
        intent.status = IntentStatus::Done;
        intent.completed_at = Some(Utc::now());
        Ok(())
    }

    async fn list_pending(&self, limit: i64) -> RepoResult<Vec<SyncIntent>> {
        let limit = usize::try_from(limit.clamp(1, 500)).unwrap_or(500);
        Ok(self
            .tables
            .read()
            .intents
            .iter()
            .filter(|i| i.is_pending())
            .take(limit)
            .cloned()
            .collect())
    }
}
