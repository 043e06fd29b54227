//! Inbound webhook payloads
//!
//! Only the fields the relay reads are modelled. Everything is optional at
//! the serde level so that presence can be checked per event kind.

use relay_core::entities::RepoRef;
use relay_core::events::{
    CommentEvent, CommentSnapshot, EditChanges, EventKind, IssueEvent, IssueSnapshot, SyncEvent,
};
use relay_core::value_objects::IssueState;
use relay_core::DomainError;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssuePayload {
    pub id: i64,
    #[serde(default)]
    pub node_id: Option<String>,
    pub number: i64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub user: UserPayload,
    pub state: IssueState,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPayload {
    pub id: i64,
    #[serde(default)]
    pub body: Option<String>,
    pub user: UserPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub owner: UserPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeFrom {
    pub from: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangesPayload {
    #[serde(default)]
    pub title: Option<ChangeFrom>,
    #[serde(default)]
    pub body: Option<ChangeFrom>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallationPayload {
    pub id: i64,
}

/// Body of an `issues` or `issue_comment` delivery
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub issue: Option<IssuePayload>,
    #[serde(default)]
    pub comment: Option<CommentPayload>,
    #[serde(default)]
    pub repository: Option<RepositoryPayload>,
    #[serde(default)]
    pub sender: Option<UserPayload>,
    #[serde(default)]
    pub changes: Option<ChangesPayload>,
    #[serde(default)]
    pub installation: Option<InstallationPayload>,
}

impl WebhookPayload {
    /// Decode a raw delivery body
    ///
    /// # Errors
    /// `InvalidEvent` when the body is not a JSON object of the expected shape.
    pub fn from_slice(body: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(body)
            .map_err(|e| DomainError::InvalidEvent(format!("malformed payload: {e}")))
    }

    pub fn installation_id(&self) -> Option<i64> {
        self.installation.as_ref().map(|i| i.id)
    }

    /// Classify the delivery and check the parts its kind requires
    ///
    /// # Errors
    /// `UnsupportedEvent` for an unknown event type or action, `InvalidEvent`
    /// when a required part is missing.
    pub fn into_event(self, event_type: &str) -> Result<SyncEvent, DomainError> {
        let action = self
            .action
            .as_deref()
            .ok_or_else(|| missing("action"))?;
        let kind = EventKind::parse(event_type, action)?;

        let issue = self.issue.ok_or_else(|| missing("issue"))?;
        let repository = self.repository.ok_or_else(|| missing("repository"))?;
        let sender = self.sender.ok_or_else(|| missing("sender"))?;

        let repository = RepoRef::new(repository.owner.login, repository.name);
        let issue = IssueSnapshot {
            id: issue.id,
            node_id: issue.node_id,
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            author_login: issue.user.login,
            state: issue.state,
        };

        if kind.is_comment() {
            let comment = self.comment.ok_or_else(|| missing("comment"))?;
            let event = CommentEvent {
                repository,
                issue,
                comment: CommentSnapshot {
                    id: comment.id,
                    body: comment.body.unwrap_or_default(),
                    author_login: comment.user.login,
                },
                sender_login: sender.login,
            };
            return Ok(match kind {
                EventKind::CommentCreated => SyncEvent::CommentCreated(event),
                EventKind::CommentEdited => SyncEvent::CommentEdited(event),
                _ => SyncEvent::CommentDeleted(event),
            });
        }

        let event = IssueEvent {
            repository,
            issue,
            sender_login: sender.login,
        };
        Ok(match kind {
            EventKind::IssueOpened => SyncEvent::IssueOpened(event),
            EventKind::IssueEdited => {
                let changes = self.changes.unwrap_or_default();
                SyncEvent::IssueEdited {
                    event,
                    changes: EditChanges {
                        title_from: changes.title.map(|c| c.from),
                        body_from: changes.body.map(|c| c.from),
                    },
                }
            }
            EventKind::IssueClosed => SyncEvent::IssueClosed(event),
            EventKind::IssueReopened => SyncEvent::IssueReopened(event),
            _ => SyncEvent::IssueDeleted(event),
        })
    }
}

fn missing(part: &str) -> DomainError {
    DomainError::InvalidEvent(format!("payload has no {part}"))
}
