//! Installation resolver
//!
//! Maps an organization to an authenticated tracker client for one GitHub
//! App. The installation id is looked up once per org; the short-lived
//! token minted for it is refreshed shortly before it expires.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use relay_core::entities::InstallationToken;
use relay_core::traits::{AppInstallations, IssueTracker, TrackerResult};
use relay_core::DomainError;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// Installations requested per listing page
pub const INSTALLATIONS_PAGE_SIZE: u32 = 100;

/// Tokens expiring within this window are re-minted
pub const TOKEN_REFRESH_SKEW_SECS: i64 = 60;

struct CachedInstallation {
    installation_id: i64,
    token: InstallationToken,
    tracker: Arc<dyn IssueTracker>,
}

type Slot = Arc<Mutex<Option<CachedInstallation>>>;

/// Per-app cache of org → installation client
pub struct InstallationResolver {
    app: Arc<dyn AppInstallations>,
    excluded: HashSet<i64>,
    entries: DashMap<String, Slot>,
}

impl InstallationResolver {
    pub fn new(app: Arc<dyn AppInstallations>, excluded: impl IntoIterator<Item = i64>) -> Self {
        Self {
            app,
            excluded: excluded.into_iter().collect(),
            entries: DashMap::new(),
        }
    }

    /// Resolve an authenticated client for `org`
    ///
    /// Concurrent callers for the same org are serialized on that org's slot,
    /// so a cold cache lists installations once and every caller gets the
    /// same handle. Other orgs are not blocked.
    ///
    /// # Errors
    /// `InstallationNotFound` when no eligible installation matches, or the
    /// `RemoteApi` error from listing or minting.
    #[instrument(skip(self))]
    pub async fn resolve_client(&self, org: &str) -> TrackerResult<Arc<dyn IssueTracker>> {
        let slot = self.slot(org);
        let mut cached = slot.lock().await;

        let installation_id = match cached.as_ref() {
            Some(entry)
                if !entry
                    .token
                    .expires_within(Duration::seconds(TOKEN_REFRESH_SKEW_SECS)) =>
            {
                return Ok(Arc::clone(&entry.tracker));
            }
            Some(entry) => {
                debug!(installation_id = entry.installation_id, "Installation token near expiry");
                entry.installation_id
            }
            None => self.find_installation(org).await?,
        };

        let token = self.app.create_installation_token(installation_id).await?;
        let tracker = self.app.issue_tracker(&token)?;
        info!(installation_id, expires_at = %token.expires_at, "Installation token minted");

        *cached = Some(CachedInstallation {
            installation_id,
            token,
            tracker: Arc::clone(&tracker),
        });
        Ok(tracker)
    }

    /// Number of orgs with a cached installation
    pub async fn cached_orgs(&self) -> usize {
        let slots: Vec<Slot> = self.entries.iter().map(|e| Arc::clone(e.value())).collect();
        let mut count = 0;
        for slot in slots {
            if slot.lock().await.is_some() {
                count += 1;
            }
        }
        count
    }

    fn slot(&self, org: &str) -> Slot {
        // The map guard is released before the slot is awaited
        Arc::clone(&self.entries.entry(org.to_ascii_lowercase()).or_default())
    }

    async fn find_installation(&self, org: &str) -> TrackerResult<i64> {
        let mut page = 1;
        loop {
            let installations = self
                .app
                .list_installations(page, INSTALLATIONS_PAGE_SIZE)
                .await?;
            let page_len = installations.len();

            if let Some(found) = installations.into_iter().find(|i| {
                i.account_login.eq_ignore_ascii_case(org) && !self.excluded.contains(&i.id)
            }) {
                debug!(installation_id = found.id, page, "Installation found");
                return Ok(found.id);
            }
            if page_len < INSTALLATIONS_PAGE_SIZE as usize {
                return Err(DomainError::InstallationNotFound(org.to_string()));
            }
            page += 1;
        }
    }
}

impl fmt::Debug for InstallationResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationResolver")
            .field("excluded", &self.excluded)
            .field("orgs", &self.entries.len())
            .finish()
    }
}
