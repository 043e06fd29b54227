//! Sync service
//!
//! Applies one classified webhook event to the other side of the relay.
//! Every mutation follows the same sequence: resolve the mapping, resolve the
//! acting client, record a pending intent, mutate the tracker, persist the
//! mapping change, mark the intent done. Nothing is retried or compensated.

use std::future::Future;
use std::sync::Arc;

use relay_core::entities::{
    CommentMapping, IssueContent, IssueMapping, IssuePatch, RepoRef, SyncIntent,
};
use relay_core::events::{CommentEvent, EditChanges, EventKind, IssueEvent, SyncEvent};
use relay_core::traits::{IssueTracker, RepoResult};
use relay_core::value_objects::{Direction, IssueState, Side};
use relay_core::DomainError;
use tracing::{error, info, instrument, warn};

use crate::dto::{IgnoreReason, SyncResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::provenance::{attributed_body, mirror_title};

/// Sync service
pub struct SyncService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SyncService<'a> {
    /// Create a new SyncService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle one event received on the route for `direction`
    #[instrument(
        skip(self, event),
        fields(event = %event.kind(), entity_id = event.entity_id())
    )]
    pub async fn handle(
        &self,
        direction: Direction,
        event: SyncEvent,
    ) -> ServiceResult<SyncResponse> {
        let kind = event.kind();

        if self.ctx.bot_filter().is_echo(direction, &event) {
            info!(
                actor = self.ctx.bot_filter().actor(direction, &event),
                sender = event.sender_login(),
                "Ignoring event raised by a synchronizing app"
            );
            return Ok(SyncResponse::ignored(
                direction,
                kind,
                IgnoreReason::SynchronizedActor,
            ));
        }

        match direction {
            Direction::SourceToHub => self.relay_to_hub(event).await,
            Direction::HubToSource => self.relay_to_source(event).await,
        }
    }

    // ========================================================================
    // Source → hub
    // ========================================================================

    async fn relay_to_hub(&self, event: SyncEvent) -> ServiceResult<SyncResponse> {
        match event {
            SyncEvent::IssueOpened(e) => self.mirror_issue(&e).await,
            SyncEvent::IssueEdited { event: e, .. } => self.update_mirror(&e).await,
            SyncEvent::IssueClosed(e) => self.push_state_to_hub(&e, IssueState::Closed).await,
            SyncEvent::IssueReopened(e) => self.push_state_to_hub(&e, IssueState::Open).await,
            SyncEvent::IssueDeleted(e) => self.delete_mirror(&e).await,
            SyncEvent::CommentCreated(e) => self.mirror_comment(&e).await,
            SyncEvent::CommentEdited(e) => self.update_mirrored_comment(&e).await,
            SyncEvent::CommentDeleted(e) => self.delete_mirrored_comment(&e).await,
        }
    }

    async fn mirror_issue(&self, e: &IssueEvent) -> ServiceResult<SyncResponse> {
        let direction = Direction::SourceToHub;
        let issue = &e.issue;

        // A redelivered `opened` must not produce a second mirror
        if self.ctx.issue_repo().find_by_source(issue.id).await?.is_some() {
            return Err(
                DomainError::DuplicateMapping(format!("source issue {}", issue.id)).into(),
            );
        }

        let hub = self.hub_client().await?;
        let intent = self
            .begin(direction, EventKind::IssueOpened, issue.id)
            .await?;

        let title = mirror_title(&e.repository.owner, &e.repository.name, issue.number, &issue.title);
        let body = attributed_body(&issue.author_login, &issue.body);
        let created = hub.create_issue(self.ctx.hub_repo(), &title, &body).await?;

        let mapping = IssueMapping {
            source_issue_id: issue.id,
            source_org: e.repository.owner.clone(),
            source_repo: e.repository.name.clone(),
            source_issue_number: issue.number,
            author_login: issue.author_login.clone(),
            title: issue.title.clone(),
            body: issue.body.clone(),
            state: issue.state,
            hub_issue_number: created.number,
        };
        self.persist(&intent, self.ctx.issue_repo().create(&mapping))
            .await?;

        info!(
            source_issue_id = issue.id,
            hub_issue_number = created.number,
            "Issue mirrored to hub"
        );
        Ok(SyncResponse::applied(direction, intent.event, intent.id))
    }

    async fn update_mirror(&self, e: &IssueEvent) -> ServiceResult<SyncResponse> {
        let issue = &e.issue;
        let hub_issue_number = self.ctx.issue_repo().resolve_hub_issue(issue.id).await?;
        let hub = self.hub_client().await?;
        let intent = self
            .begin(Direction::SourceToHub, EventKind::IssueEdited, issue.id)
            .await?;

        let patch = IssuePatch::content(
            mirror_title(&e.repository.owner, &e.repository.name, issue.number, &issue.title),
            attributed_body(&issue.author_login, &issue.body),
        );
        hub.edit_issue(self.ctx.hub_repo(), hub_issue_number, &patch)
            .await?;

        let content = IssueContent {
            author_login: issue.author_login.clone(),
            title: issue.title.clone(),
            body: issue.body.clone(),
            state: issue.state,
        };
        self.persist(&intent, self.ctx.issue_repo().update(issue.id, &content))
            .await?;

        info!(source_issue_id = issue.id, hub_issue_number, "Hub mirror updated");
        Ok(SyncResponse::applied(Direction::SourceToHub, intent.event, intent.id))
    }

    async fn push_state_to_hub(
        &self,
        e: &IssueEvent,
        state: IssueState,
    ) -> ServiceResult<SyncResponse> {
        let issue = &e.issue;
        let hub_issue_number = self.ctx.issue_repo().resolve_hub_issue(issue.id).await?;
        let hub = self.hub_client().await?;
        let intent = self
            .begin(Direction::SourceToHub, state_event(state), issue.id)
            .await?;

        hub.edit_issue(self.ctx.hub_repo(), hub_issue_number, &IssuePatch::state(state))
            .await?;
        self.persist(&intent, self.ctx.issue_repo().set_state(issue.id, state))
            .await?;

        info!(source_issue_id = issue.id, hub_issue_number, %state, "Hub mirror state pushed");
        Ok(SyncResponse::applied(Direction::SourceToHub, intent.event, intent.id))
    }

    async fn delete_mirror(&self, e: &IssueEvent) -> ServiceResult<SyncResponse> {
        let issue = &e.issue;
        let hub_issue_number = self.ctx.issue_repo().resolve_hub_issue(issue.id).await?;
        let hub = self.hub_client().await?;
        let intent = self
            .begin(Direction::SourceToHub, EventKind::IssueDeleted, issue.id)
            .await?;

        delete_issue(hub.as_ref(), self.ctx.hub_repo(), hub_issue_number).await?;
        self.persist(&intent, self.ctx.issue_repo().delete(issue.id))
            .await?;

        info!(source_issue_id = issue.id, hub_issue_number, "Hub mirror deleted");
        Ok(SyncResponse::applied(Direction::SourceToHub, intent.event, intent.id))
    }

    async fn mirror_comment(&self, e: &CommentEvent) -> ServiceResult<SyncResponse> {
        let comment = &e.comment;
        let hub_issue_number = self.ctx.issue_repo().resolve_hub_issue(e.issue.id).await?;
        let hub = self.hub_client().await?;
        let intent = self
            .begin(Direction::SourceToHub, EventKind::CommentCreated, comment.id)
            .await?;

        let created = hub
            .create_comment(
                self.ctx.hub_repo(),
                hub_issue_number,
                &attributed_body(&comment.author_login, &comment.body),
            )
            .await?;

        let mapping = CommentMapping {
            origin: Side::Source,
            source_comment_id: comment.id,
            hub_comment_id: created.id,
            parent_issue_id: e.issue.id,
            author_login: comment.author_login.clone(),
            body: comment.body.clone(),
        };
        self.persist(&intent, self.ctx.comment_repo().create(&mapping))
            .await?;

        info!(
            source_comment_id = comment.id,
            hub_comment_id = created.id,
            hub_issue_number,
            "Comment mirrored to hub"
        );
        Ok(SyncResponse::applied(Direction::SourceToHub, intent.event, intent.id))
    }

    async fn update_mirrored_comment(&self, e: &CommentEvent) -> ServiceResult<SyncResponse> {
        let comment = &e.comment;
        let target = self.ctx.comment_repo().resolve(Side::Source, comment.id).await?;
        let hub = self.hub_client().await?;
        let intent = self
            .begin(Direction::SourceToHub, EventKind::CommentEdited, comment.id)
            .await?;

        hub.edit_comment(
            self.ctx.hub_repo(),
            target.comment.hub_comment_id,
            &attributed_body(&comment.author_login, &comment.body),
        )
        .await?;
        self.persist(
            &intent,
            self.ctx.comment_repo().update(
                Side::Source,
                comment.id,
                &comment.author_login,
                &comment.body,
            ),
        )
        .await?;

        info!(
            source_comment_id = comment.id,
            hub_comment_id = target.comment.hub_comment_id,
            "Hub comment updated"
        );
        Ok(SyncResponse::applied(Direction::SourceToHub, intent.event, intent.id))
    }

    async fn delete_mirrored_comment(&self, e: &CommentEvent) -> ServiceResult<SyncResponse> {
        let comment = &e.comment;
        let target = self.ctx.comment_repo().resolve(Side::Source, comment.id).await?;
        let hub = self.hub_client().await?;
        let intent = self
            .begin(Direction::SourceToHub, EventKind::CommentDeleted, comment.id)
            .await?;

        hub.delete_comment(self.ctx.hub_repo(), target.comment.hub_comment_id)
            .await?;
        self.persist(&intent, self.ctx.comment_repo().delete(Side::Source, comment.id))
            .await?;

        info!(
            source_comment_id = comment.id,
            hub_comment_id = target.comment.hub_comment_id,
            "Hub comment deleted"
        );
        Ok(SyncResponse::applied(Direction::SourceToHub, intent.event, intent.id))
    }

    // ========================================================================
    // Hub → source
    // ========================================================================

    async fn relay_to_source(&self, event: SyncEvent) -> ServiceResult<SyncResponse> {
        let direction = Direction::HubToSource;
        // Hub issue numbers are only unique within the mirror repository
        if !event.repository().is_same_repo(self.ctx.hub_repo()) {
            info!(
                repository = %event.repository(),
                "Ignoring hub event outside the mirror repository"
            );
            return Ok(SyncResponse::ignored(
                direction,
                event.kind(),
                IgnoreReason::ForeignRepository,
            ));
        }

        match event {
            SyncEvent::IssueOpened(e) => {
                info!(hub_issue_number = e.issue.number, "Ignoring issue opened in hub");
                Ok(SyncResponse::ignored(
                    direction,
                    EventKind::IssueOpened,
                    IgnoreReason::HubNativeIssue,
                ))
            }
            SyncEvent::IssueEdited { event: e, changes } => self.revert_hub_edit(&e, &changes).await,
            SyncEvent::IssueClosed(e) => self.push_state_to_source(&e, IssueState::Closed).await,
            SyncEvent::IssueReopened(e) => self.push_state_to_source(&e, IssueState::Open).await,
            SyncEvent::IssueDeleted(e) => self.delete_source_issue(&e).await,
            SyncEvent::CommentCreated(e) => self.relay_hub_comment(&e).await,
            SyncEvent::CommentEdited(e) => self.update_relayed_comment(&e).await,
            SyncEvent::CommentDeleted(e) => self.delete_relayed_comment(&e).await,
        }
    }

    /// Undo a human edit of a mirror; the source issue stays authoritative
    async fn revert_hub_edit(
        &self,
        e: &IssueEvent,
        changes: &EditChanges,
    ) -> ServiceResult<SyncResponse> {
        let direction = Direction::HubToSource;
        let kind = EventKind::IssueEdited;
        if changes.is_empty() {
            return Ok(SyncResponse::ignored(direction, kind, IgnoreReason::NoChanges));
        }

        // Only mirrors are reverted; hub-native issues are left alone
        self.ctx
            .issue_repo()
            .resolve_source_issue(e.issue.number)
            .await?;
        let hub = self.hub_client().await?;
        let intent = self.begin(direction, kind, e.issue.id).await?;

        let patch = IssuePatch {
            title: changes.title_from.clone(),
            body: changes.body_from.clone(),
            state: None,
        };
        hub.edit_issue(self.ctx.hub_repo(), e.issue.number, &patch)
            .await?;
        self.complete(&intent).await;

        info!(
            hub_issue_number = e.issue.number,
            title = patch.title.is_some(),
            body = patch.body.is_some(),
            "Hub edit reverted"
        );
        Ok(SyncResponse::applied(direction, kind, intent.id))
    }

    async fn push_state_to_source(
        &self,
        e: &IssueEvent,
        state: IssueState,
    ) -> ServiceResult<SyncResponse> {
        let source = self.ctx.issue_repo().resolve_source_issue(e.issue.number).await?;
        let client = self.source_client(&source.org).await?;
        let intent = self
            .begin(Direction::HubToSource, state_event(state), e.issue.id)
            .await?;

        client
            .edit_issue(&source.repo_ref(), source.number, &IssuePatch::state(state))
            .await?;
        self.persist(
            &intent,
            self.ctx.issue_repo().set_state(source.source_issue_id, state),
        )
        .await?;

        info!(
            hub_issue_number = e.issue.number,
            source_issue_id = source.source_issue_id,
            %state,
            "Source issue state pushed"
        );
        Ok(SyncResponse::applied(Direction::HubToSource, intent.event, intent.id))
    }

    async fn delete_source_issue(&self, e: &IssueEvent) -> ServiceResult<SyncResponse> {
        let source = self.ctx.issue_repo().resolve_source_issue(e.issue.number).await?;
        let client = self.source_client(&source.org).await?;
        let intent = self
            .begin(Direction::HubToSource, EventKind::IssueDeleted, e.issue.id)
            .await?;

        delete_issue(client.as_ref(), &source.repo_ref(), source.number).await?;
        self.persist(&intent, self.ctx.issue_repo().delete(source.source_issue_id))
            .await?;

        info!(
            hub_issue_number = e.issue.number,
            source_issue_id = source.source_issue_id,
            "Source issue deleted"
        );
        Ok(SyncResponse::applied(Direction::HubToSource, intent.event, intent.id))
    }

    async fn relay_hub_comment(&self, e: &CommentEvent) -> ServiceResult<SyncResponse> {
        let comment = &e.comment;
        let source = self.ctx.issue_repo().resolve_source_issue(e.issue.number).await?;
        let client = self.source_client(&source.org).await?;
        let intent = self
            .begin(Direction::HubToSource, EventKind::CommentCreated, comment.id)
            .await?;

        let created = client
            .create_comment(
                &source.repo_ref(),
                source.number,
                &attributed_body(&comment.author_login, &comment.body),
            )
            .await?;

        let mapping = CommentMapping {
            origin: Side::Hub,
            source_comment_id: created.id,
            hub_comment_id: comment.id,
            parent_issue_id: source.source_issue_id,
            author_login: comment.author_login.clone(),
            body: comment.body.clone(),
        };
        self.persist(&intent, self.ctx.comment_repo().create(&mapping))
            .await?;

        info!(
            hub_comment_id = comment.id,
            source_comment_id = created.id,
            source_issue_id = source.source_issue_id,
            "Comment relayed to source"
        );
        Ok(SyncResponse::applied(Direction::HubToSource, intent.event, intent.id))
    }

    async fn update_relayed_comment(&self, e: &CommentEvent) -> ServiceResult<SyncResponse> {
        let comment = &e.comment;
        let target = self.ctx.comment_repo().resolve(Side::Hub, comment.id).await?;
        let source = target.parent.source_ref();
        let client = self.source_client(&source.org).await?;
        let intent = self
            .begin(Direction::HubToSource, EventKind::CommentEdited, comment.id)
            .await?;

        client
            .edit_comment(
                &source.repo_ref(),
                target.comment.source_comment_id,
                &attributed_body(&comment.author_login, &comment.body),
            )
            .await?;
        self.persist(
            &intent,
            self.ctx.comment_repo().update(
                Side::Hub,
                comment.id,
                &comment.author_login,
                &comment.body,
            ),
        )
        .await?;

        info!(
            hub_comment_id = comment.id,
            source_comment_id = target.comment.source_comment_id,
            "Source comment updated"
        );
        Ok(SyncResponse::applied(Direction::HubToSource, intent.event, intent.id))
    }

    async fn delete_relayed_comment(&self, e: &CommentEvent) -> ServiceResult<SyncResponse> {
        let comment = &e.comment;
        let target = self.ctx.comment_repo().resolve(Side::Hub, comment.id).await?;
        let source = target.parent.source_ref();
        let client = self.source_client(&source.org).await?;
        let intent = self
            .begin(Direction::HubToSource, EventKind::CommentDeleted, comment.id)
            .await?;

        client
            .delete_comment(&source.repo_ref(), target.comment.source_comment_id)
            .await?;
        self.persist(&intent, self.ctx.comment_repo().delete(Side::Hub, comment.id))
            .await?;

        info!(
            hub_comment_id = comment.id,
            source_comment_id = target.comment.source_comment_id,
            "Source comment deleted"
        );
        Ok(SyncResponse::applied(Direction::HubToSource, intent.event, intent.id))
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn hub_client(&self) -> ServiceResult<Arc<dyn IssueTracker>> {
        Ok(self
            .ctx
            .hub_installations()
            .resolve_client(&self.ctx.hub_repo().owner)
            .await?)
    }

    async fn source_client(&self, org: &str) -> ServiceResult<Arc<dyn IssueTracker>> {
        Ok(self.ctx.source_installations().resolve_client(org).await?)
    }

    /// Write the pending intent ahead of the remote mutation
    async fn begin(
        &self,
        direction: Direction,
        kind: EventKind,
        entity_id: i64,
    ) -> ServiceResult<SyncIntent> {
        let intent = SyncIntent::pending(direction, kind, entity_id);
        self.ctx.intent_repo().record(&intent).await?;
        Ok(intent)
    }

    /// Apply the mapping write that follows a successful remote mutation
    ///
    /// A failure here leaves the tracker changed and the store stale. It is
    /// surfaced as `Persistence` and the intent stays pending.
    async fn persist<F>(&self, intent: &SyncIntent, write: F) -> ServiceResult<()>
    where
        F: Future<Output = RepoResult<()>>,
    {
        if let Err(e) = write.await {
            error!(
                intent_id = %intent.id,
                event = %intent.event,
                direction = %intent.direction,
                entity_id = intent.entity_id,
                error = %e,
                "Remote change applied but mapping write failed; store and tracker disagree"
            );
            return Err(DomainError::Persistence(format!("{e} (intent {})", intent.id)).into());
        }
        self.complete(intent).await;
        Ok(())
    }

    /// Mark the intent done; the relay itself has already succeeded
    async fn complete(&self, intent: &SyncIntent) {
        if let Err(e) = self.ctx.intent_repo().complete(intent.id).await {
            warn!(intent_id = %intent.id, error = %e, "Failed to mark intent done");
        }
    }
}

fn state_event(state: IssueState) -> EventKind {
    match state {
        IssueState::Closed => EventKind::IssueClosed,
        IssueState::Open => EventKind::IssueReopened,
    }
}

/// Deletion goes through GraphQL, which addresses issues by node id
async fn delete_issue(
    tracker: &dyn IssueTracker,
    repo: &RepoRef,
    number: i64,
) -> ServiceResult<()> {
    let issue = tracker.get_issue(repo, number).await?;
    tracker.delete_issue(&issue.node_id).await?;
    Ok(())
}
