//! Test doubles for the tracker ports
//!
//! `SpyTracker` records every call and answers with synthetic ids.
//! `SpyApp` serves a fixed installation list and hands out the shared spy.
//! `RelayFixture` wires both into a [`ServiceContext`] over the in-memory store.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use relay_core::entities::{
    Installation, InstallationToken, IssuePatch, RemoteComment, RemoteIssue, RepoRef,
};
use relay_core::traits::{AppInstallations, IssueTracker, TrackerResult};
use relay_core::value_objects::IssueState;
use relay_core::DomainError;
use relay_db::MemoryStore;

use crate::services::{BotFilter, InstallationResolver, ServiceContext, ServiceContextBuilder};

pub const HUB_ORG: &str = "hub-org";
pub const HUB_REPO: &str = "issues";
pub const SOURCE_BOT: &str = "source-sync[bot]";
pub const HUB_BOT: &str = "hub-sync[bot]";

/// Hub issue numbers handed out by [`SpyTracker::create_issue`] start here
pub const FIRST_ISSUE_NUMBER: i64 = 1000;

/// Comment ids handed out by [`SpyTracker::create_comment`] start here
pub const FIRST_COMMENT_ID: i64 = 9000;

/// One recorded tracker call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    CreateIssue {
        repo: RepoRef,
        title: String,
        body: String,
    },
    EditIssue {
        repo: RepoRef,
        number: i64,
        patch: IssuePatch,
    },
    GetIssue {
        repo: RepoRef,
        number: i64,
    },
    DeleteIssue {
        node_id: String,
    },
    CreateComment {
        repo: RepoRef,
        issue_number: i64,
        body: String,
    },
    EditComment {
        repo: RepoRef,
        comment_id: i64,
        body: String,
    },
    DeleteComment {
        repo: RepoRef,
        comment_id: i64,
    },
}

/// Recording tracker
#[derive(Debug)]
pub struct SpyTracker {
    calls: Mutex<Vec<TrackerCall>>,
    next_issue: AtomicI64,
    next_comment: AtomicI64,
    failing: Mutex<Option<u16>>,
}

impl Default for SpyTracker {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            next_issue: AtomicI64::new(FIRST_ISSUE_NUMBER),
            next_comment: AtomicI64::new(FIRST_COMMENT_ID),
            failing: Mutex::new(None),
        }
    }
}

impl SpyTracker {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call so far, in order
    pub fn calls(&self) -> Vec<TrackerCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Make every following call fail with `RemoteApi{status}`
    pub fn fail_with(&self, status: u16) {
        *self.failing.lock() = Some(status);
    }

    fn record(&self, call: TrackerCall) -> TrackerResult<()> {
        self.calls.lock().push(call);
        match *self.failing.lock() {
            Some(status) => Err(DomainError::RemoteApi {
                status,
                message: "spy failure".to_string(),
            }),
            None => Ok(()),
        }
    }

    fn node_id(number: i64) -> String {
        format!("I_node_{number}")
    }
}

#[async_trait]
impl IssueTracker for SpyTracker {
    async fn create_issue(
        &self,
        repo: &RepoRef,
        title: &str,
        body: &str,
    ) -> TrackerResult<RemoteIssue> {
        self.record(TrackerCall::CreateIssue {
            repo: repo.clone(),
            title: title.to_string(),
            body: body.to_string(),
        })?;
        let number = self.next_issue.fetch_add(1, Ordering::SeqCst);
        Ok(RemoteIssue {
            id: number * 10,
            node_id: Self::node_id(number),
            number,
            title: title.to_string(),
            state: IssueState::Open,
        })
    }

    async fn edit_issue(
        &self,
        repo: &RepoRef,
        number: i64,
        patch: &IssuePatch,
    ) -> TrackerResult<RemoteIssue> {
        self.record(TrackerCall::EditIssue {
            repo: repo.clone(),
            number,
            patch: patch.clone(),
        })?;
        Ok(RemoteIssue {
            id: number * 10,
            node_id: Self::node_id(number),
            number,
            title: patch.title.clone().unwrap_or_default(),
            state: patch.state.unwrap_or_default(),
        })
    }

    async fn get_issue(&self, repo: &RepoRef, number: i64) -> TrackerResult<RemoteIssue> {
        self.record(TrackerCall::GetIssue {
            repo: repo.clone(),
            number,
        })?;
        Ok(RemoteIssue {
            id: number * 10,
            node_id: Self::node_id(number),
            number,
            title: String::new(),
            state: IssueState::Open,
        })
    }

    async fn delete_issue(&self, node_id: &str) -> TrackerResult<()> {
        self.record(TrackerCall::DeleteIssue {
            node_id: node_id.to_string(),
        })
    }

    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: i64,
        body: &str,
    ) -> TrackerResult<RemoteComment> {
        self.record(TrackerCall::CreateComment {
            repo: repo.clone(),
            issue_number,
            body: body.to_string(),
        })?;
        Ok(RemoteComment {
            id: self.next_comment.fetch_add(1, Ordering::SeqCst),
        })
    }

    async fn edit_comment(
        &self,
        repo: &RepoRef,
        comment_id: i64,
        body: &str,
    ) -> TrackerResult<RemoteComment> {
        self.record(TrackerCall::EditComment {
            repo: repo.clone(),
            comment_id,
            body: body.to_string(),
        })?;
        Ok(RemoteComment { id: comment_id })
    }

    async fn delete_comment(&self, repo: &RepoRef, comment_id: i64) -> TrackerResult<()> {
        self.record(TrackerCall::DeleteComment {
            repo: repo.clone(),
            comment_id,
        })
    }
}

/// App double serving a fixed installation list
#[derive(Debug)]
pub struct SpyApp {
    tracker: Arc<SpyTracker>,
    installations: Vec<Installation>,
    token_ttl: Duration,
    list_delay: Option<StdDuration>,
    list_calls: AtomicUsize,
    minted: Mutex<Vec<i64>>,
}

impl SpyApp {
    pub fn new(tracker: Arc<SpyTracker>, installations: Vec<Installation>) -> Self {
        Self {
            tracker,
            installations,
            token_ttl: Duration::hours(1),
            list_delay: None,
            list_calls: AtomicUsize::new(0),
            minted: Mutex::new(Vec::new()),
        }
    }

    /// App installed on each of `orgs`, with ids starting at 1
    pub fn installed_on(tracker: Arc<SpyTracker>, orgs: &[&str]) -> Self {
        let installations = orgs
            .iter()
            .zip(1..)
            .map(|(org, id)| Installation {
                id,
                account_login: (*org).to_string(),
            })
            .collect();
        Self::new(tracker, installations)
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_list_delay(mut self, delay: StdDuration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn token_calls(&self) -> usize {
        self.minted.lock().len()
    }

    /// Installation ids tokens were minted for, in order
    pub fn minted_for(&self) -> Vec<i64> {
        self.minted.lock().clone()
    }
}

#[async_trait]
impl AppInstallations for SpyApp {
    async fn list_installations(
        &self,
        page: u32,
        per_page: u32,
    ) -> TrackerResult<Vec<Installation>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }
        let start = (page.saturating_sub(1) * per_page) as usize;
        Ok(self
            .installations
            .iter()
            .skip(start)
            .take(per_page as usize)
            .cloned()
            .collect())
    }

    async fn create_installation_token(
        &self,
        installation_id: i64,
    ) -> TrackerResult<InstallationToken> {
        self.minted.lock().push(installation_id);
        Ok(InstallationToken {
            token: format!("ghs_spy_{installation_id}"),
            expires_at: Utc::now() + self.token_ttl,
        })
    }

    fn issue_tracker(&self, _token: &InstallationToken) -> TrackerResult<Arc<dyn IssueTracker>> {
        Ok(Arc::clone(&self.tracker) as Arc<dyn IssueTracker>)
    }
}

/// Service context over the in-memory store with one spy per side
#[derive(Debug, Clone)]
pub struct RelayFixture {
    pub store: MemoryStore,
    /// Tracker for every source org
    pub source: Arc<SpyTracker>,
    /// Tracker for the hub org
    pub hub: Arc<SpyTracker>,
    pub source_app: Arc<SpyApp>,
    pub hub_app: Arc<SpyApp>,
    pub ctx: ServiceContext,
}

impl RelayFixture {
    /// Source app installed on `source_orgs`, hub app on [`HUB_ORG`]
    pub fn new(source_orgs: &[&str]) -> Self {
        let store = MemoryStore::new();
        let source = SpyTracker::shared();
        let hub = SpyTracker::shared();
        let source_app = Arc::new(SpyApp::installed_on(Arc::clone(&source), source_orgs));
        let hub_app = Arc::new(SpyApp::installed_on(Arc::clone(&hub), &[HUB_ORG]));

        let ctx = ServiceContextBuilder::new()
            .issue_repo(Arc::new(store.issue_repository()))
            .comment_repo(Arc::new(store.comment_repository()))
            .intent_repo(Arc::new(store.intent_repository()))
            .source_installations(Arc::new(InstallationResolver::new(
                Arc::clone(&source_app) as Arc<dyn AppInstallations>,
                [],
            )))
            .hub_installations(Arc::new(InstallationResolver::new(
                Arc::clone(&hub_app) as Arc<dyn AppInstallations>,
                [],
            )))
            .bot_filter(BotFilter::new(SOURCE_BOT, HUB_BOT))
            .hub_repo(RepoRef::new(HUB_ORG, HUB_REPO))
            .build();

        match ctx {
            Ok(ctx) => Self {
                store,
                source,
                hub,
                source_app,
                hub_app,
                ctx,
            },
            Err(e) => panic!("fixture context is complete: {e}"),
        }
    }

    /// Total calls seen by both trackers
    pub fn tracker_calls(&self) -> usize {
        self.source.call_count() + self.hub.call_count()
    }
}
