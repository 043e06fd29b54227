//! Service context - dependency container for services
//!
//! Holds the identity store repositories, one installation resolver per app,
//! the bot-loop filter and the hub repository coordinates.

use std::sync::Arc;

use relay_core::entities::RepoRef;
use relay_core::traits::{CommentMappingRepository, IssueMappingRepository, SyncIntentRepository};
use relay_db::PgPool;

use super::bot_filter::BotFilter;
use super::error::{ServiceError, ServiceResult};
use super::installation::InstallationResolver;

/// Service context containing all dependencies
///
/// This is the dependency container passed to all services. It provides:
/// - Identity store repositories (issue, comment, intent)
/// - The source and hub installation resolvers
/// - The bot-loop filter
/// - The hub repository every mirror lives in
#[derive(Clone)]
pub struct ServiceContext {
    // Database pool, absent when running against the in-memory store
    pool: Option<PgPool>,

    // Repositories
    issue_repo: Arc<dyn IssueMappingRepository>,
    comment_repo: Arc<dyn CommentMappingRepository>,
    intent_repo: Arc<dyn SyncIntentRepository>,

    // Installation resolvers
    source_installations: Arc<InstallationResolver>,
    hub_installations: Arc<InstallationResolver>,

    bot_filter: BotFilter,
    hub_repo: RepoRef,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: Option<PgPool>,
        issue_repo: Arc<dyn IssueMappingRepository>,
        comment_repo: Arc<dyn CommentMappingRepository>,
        intent_repo: Arc<dyn SyncIntentRepository>,
        source_installations: Arc<InstallationResolver>,
        hub_installations: Arc<InstallationResolver>,
        bot_filter: BotFilter,
        hub_repo: RepoRef,
    ) -> Self {
        Self {
            pool,
            issue_repo,
            comment_repo,
            intent_repo,
            source_installations,
            hub_installations,
            bot_filter,
            hub_repo,
        }
    }

    // === Database Pool ===

    /// Get the PostgreSQL connection pool, if the store is backed by one
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    // === Repositories ===

    /// Get the issue mapping repository
    pub fn issue_repo(&self) -> &dyn IssueMappingRepository {
        self.issue_repo.as_ref()
    }

    /// Get the comment mapping repository
    pub fn comment_repo(&self) -> &dyn CommentMappingRepository {
        self.comment_repo.as_ref()
    }

    /// Get the sync intent repository
    pub fn intent_repo(&self) -> &dyn SyncIntentRepository {
        self.intent_repo.as_ref()
    }

    // === Installations ===

    /// Resolver for the app installed on the source orgs
    pub fn source_installations(&self) -> &InstallationResolver {
        self.source_installations.as_ref()
    }

    /// Resolver for the app installed on the hub org
    pub fn hub_installations(&self) -> &InstallationResolver {
        self.hub_installations.as_ref()
    }

    // === Relay settings ===

    pub fn bot_filter(&self) -> &BotFilter {
        &self.bot_filter
    }

    /// Repository receiving every mirrored issue
    pub fn hub_repo(&self) -> &RepoRef {
        &self.hub_repo
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("pool", &self.pool.as_ref().map(|_| "PgPool"))
            .field("repositories", &"...")
            .field("hub_repo", &self.hub_repo)
            .field("bot_filter", &self.bot_filter)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    pool: Option<PgPool>,
    issue_repo: Option<Arc<dyn IssueMappingRepository>>,
    comment_repo: Option<Arc<dyn CommentMappingRepository>>,
    intent_repo: Option<Arc<dyn SyncIntentRepository>>,
    source_installations: Option<Arc<InstallationResolver>>,
    hub_installations: Option<Arc<InstallationResolver>>,
    bot_filter: Option<BotFilter>,
    hub_repo: Option<RepoRef>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn issue_repo(mut self, repo: Arc<dyn IssueMappingRepository>) -> Self {
        self.issue_repo = Some(repo);
        self
    }

    pub fn comment_repo(mut self, repo: Arc<dyn CommentMappingRepository>) -> Self {
        self.comment_repo = Some(repo);
        self
    }

    pub fn intent_repo(mut self, repo: Arc<dyn SyncIntentRepository>) -> Self {
        self.intent_repo = Some(repo);
        self
    }

    pub fn source_installations(mut self, resolver: Arc<InstallationResolver>) -> Self {
        self.source_installations = Some(resolver);
        self
    }

    pub fn hub_installations(mut self, resolver: Arc<InstallationResolver>) -> Self {
        self.hub_installations = Some(resolver);
        self
    }

    pub fn bot_filter(mut self, filter: BotFilter) -> Self {
        self.bot_filter = Some(filter);
        self
    }

    pub fn hub_repo(mut self, repo: RepoRef) -> Self {
        self.hub_repo = Some(repo);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.pool,
            self.issue_repo.ok_or_else(|| ServiceError::validation("issue_repo is required"))?,
            self.comment_repo.ok_or_else(|| ServiceError::validation("comment_repo is required"))?,
            self.intent_repo.ok_or_else(|| ServiceError::validation("intent_repo is required"))?,
            self.source_installations
                .ok_or_else(|| ServiceError::validation("source_installations is required"))?,
            self.hub_installations
                .ok_or_else(|| ServiceError::validation("hub_installations is required"))?,
            self.bot_filter.ok_or_else(|| ServiceError::validation("bot_filter is required"))?,
            self.hub_repo.ok_or_else(|| ServiceError::validation("hub_repo is required"))?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_reports_missing_dependency() {
        let err = ServiceContextBuilder::new()
            .hub_repo(RepoRef::new("hub", "issues"))
            .build()
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("issue_repo is required"));
    }
}
