//! Sync events
//!
//! Inbound webhooks are classified once, at the edge, into [`SyncEvent`].
//! Anything outside the closed set below is rejected rather than ignored.

use std::fmt;

use serde::Serialize;

use crate::entities::RepoRef;
use crate::error::DomainError;
use crate::value_objects::IssueState;

/// `(resource, action)` pairs the relay understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    #[serde(rename = "issue.opened")]
    IssueOpened,
    #[serde(rename = "issue.edited")]
    IssueEdited,
    #[serde(rename = "issue.closed")]
    IssueClosed,
    #[serde(rename = "issue.reopened")]
    IssueReopened,
    #[serde(rename = "issue.deleted")]
    IssueDeleted,
    #[serde(rename = "comment.created")]
    CommentCreated,
    #[serde(rename = "comment.edited")]
    CommentEdited,
    #[serde(rename = "comment.deleted")]
    CommentDeleted,
}

impl EventKind {
    /// Webhook event type header value for issue events
    pub const ISSUES: &'static str = "issues";
    /// Webhook event type header value for comment events
    pub const ISSUE_COMMENT: &'static str = "issue_comment";

    /// Classify a webhook by its event type header and `action` field
    ///
    /// # Errors
    /// Returns `DomainError::UnsupportedEvent` for anything outside the closed set.
    pub fn parse(event_type: &str, action: &str) -> Result<Self, DomainError> {
        let kind = match (event_type, action) {
            (Self::ISSUES, "opened") => Self::IssueOpened,
            (Self::ISSUES, "edited") => Self::IssueEdited,
            (Self::ISSUES, "closed") => Self::IssueClosed,
            (Self::ISSUES, "reopened") => Self::IssueReopened,
            (Self::ISSUES, "deleted") => Self::IssueDeleted,
            (Self::ISSUE_COMMENT, "created") => Self::CommentCreated,
            (Self::ISSUE_COMMENT, "edited") => Self::CommentEdited,
            (Self::ISSUE_COMMENT, "deleted") => Self::CommentDeleted,
            _ => {
                return Err(DomainError::UnsupportedEvent(format!(
                    "{event_type}.{action}"
                )))
            }
        };
        Ok(kind)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::IssueOpened => "issue.opened",
            Self::IssueEdited => "issue.edited",
            Self::IssueClosed => "issue.closed",
            Self::IssueReopened => "issue.reopened",
            Self::IssueDeleted => "issue.deleted",
            Self::CommentCreated => "comment.created",
            Self::CommentEdited => "comment.edited",
            Self::CommentDeleted => "comment.deleted",
        }
    }

    /// Parse the persisted representation produced by [`EventKind::as_str`]
    pub fn from_persisted(value: &str) -> Option<Self> {
        let (resource, action) = value.split_once('.')?;
        let event_type = match resource {
            "issue" => Self::ISSUES,
            "comment" => Self::ISSUE_COMMENT,
            _ => return None,
        };
        Self::parse(event_type, action).ok()
    }

    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            Self::CommentCreated | Self::CommentEdited | Self::CommentDeleted
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue fields carried by a webhook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSnapshot {
    pub id: i64,
    pub node_id: Option<String>,
    pub number: i64,
    pub title: String,
    pub body: String,
    pub author_login: String,
    pub state: IssueState,
}

/// Comment fields carried by a webhook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSnapshot {
    pub id: i64,
    pub body: String,
    pub author_login: String,
}

/// Previous values reported with an `edited` action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditChanges {
    pub title_from: Option<String>,
    pub body_from: Option<String>,
}

impl EditChanges {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.title_from.is_none() && self.body_from.is_none()
    }
}

/// An issue lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueEvent {
    pub repository: RepoRef,
    pub issue: IssueSnapshot,
    pub sender_login: String,
}

/// A comment lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentEvent {
    pub repository: RepoRef,
    pub issue: IssueSnapshot,
    pub comment: CommentSnapshot,
    pub sender_login: String,
}

/// Closed set of inbound changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    IssueOpened(IssueEvent),
    IssueEdited {
        event: IssueEvent,
        changes: EditChanges,
    },
    IssueClosed(IssueEvent),
    IssueReopened(IssueEvent),
    IssueDeleted(IssueEvent),
    CommentCreated(CommentEvent),
    CommentEdited(CommentEvent),
    CommentDeleted(CommentEvent),
}

impl SyncEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::IssueOpened(_) => EventKind::IssueOpened,
            Self::IssueEdited { .. } => EventKind::IssueEdited,
            Self::IssueClosed(_) => EventKind::IssueClosed,
            Self::IssueReopened(_) => EventKind::IssueReopened,
            Self::IssueDeleted(_) => EventKind::IssueDeleted,
            Self::CommentCreated(_) => EventKind::CommentCreated,
            Self::CommentEdited(_) => EventKind::CommentEdited,
            Self::CommentDeleted(_) => EventKind::CommentDeleted,
        }
    }

    /// The issue the event concerns (the parent issue for comment events)
    pub fn issue(&self) -> &IssueSnapshot {
        match self {
            Self::IssueOpened(e)
            | Self::IssueClosed(e)
            | Self::IssueReopened(e)
            | Self::IssueDeleted(e)
            | Self::IssueEdited { event: e, .. } => &e.issue,
            Self::CommentCreated(e) | Self::CommentEdited(e) | Self::CommentDeleted(e) => {
                &e.issue
            }
        }
    }

    pub fn repository(&self) -> &RepoRef {
        match self {
            Self::IssueOpened(e)
            | Self::IssueClosed(e)
            | Self::IssueReopened(e)
            | Self::IssueDeleted(e)
            | Self::IssueEdited { event: e, .. } => &e.repository,
            Self::CommentCreated(e) | Self::CommentEdited(e) | Self::CommentDeleted(e) => {
                &e.repository
            }
        }
    }

    /// Login of the author of the entity that changed
    pub fn author_login(&self) -> &str {
        match self {
            Self::CommentCreated(e) | Self::CommentEdited(e) | Self::CommentDeleted(e) => {
                &e.comment.author_login
            }
            _ => &self.issue().author_login,
        }
    }

    /// Login of the account that triggered the webhook
    pub fn sender_login(&self) -> &str {
        match self {
            Self::IssueOpened(e)
            | Self::IssueClosed(e)
            | Self::IssueReopened(e)
            | Self::IssueDeleted(e)
            | Self::IssueEdited { event: e, .. } => &e.sender_login,
            Self::CommentCreated(e) | Self::CommentEdited(e) | Self::CommentDeleted(e) => {
                &e.sender_login
            }
        }
    }

    /// Id of the entity that changed (comment id for comment events)
    pub fn entity_id(&self) -> i64 {
        match self {
            Self::CommentCreated(e) | Self::CommentEdited(e) | Self::CommentDeleted(e) => {
                e.comment.id
            }
            _ => self.issue().id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_event() -> IssueEvent {
        IssueEvent {
            repository: RepoRef::new("acme", "widgets"),
            issue: IssueSnapshot {
                id: 5,
                node_id: None,
                number: 7,
                title: "Bug".to_string(),
                body: "It broke".to_string(),
                author_login: "alice".to_string(),
                state: IssueState::Open,
            },
            sender_login: "carol".to_string(),
        }
    }

    #[test]
    fn test_parse_known_pairs() {
        assert_eq!(
            EventKind::parse("issues", "opened").unwrap(),
            EventKind::IssueOpened
        );
        assert_eq!(
            EventKind::parse("issue_comment", "deleted").unwrap(),
            EventKind::CommentDeleted
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(
            EventKind::parse("issues", "labeled"),
            Err(DomainError::UnsupportedEvent(_))
        ));
        assert!(matches!(
            EventKind::parse("pull_request", "opened"),
            Err(DomainError::UnsupportedEvent(_))
        ));
        assert!(EventKind::parse("issue_comment", "opened").is_err());
    }

    #[test]
    fn test_persisted_round_trip() {
        for kind in [
            EventKind::IssueOpened,
            EventKind::IssueReopened,
            EventKind::CommentEdited,
        ] {
            assert_eq!(EventKind::from_persisted(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::from_persisted("garbage"), None);
    }

    #[test]
    fn test_author_and_sender() {
        let event = SyncEvent::IssueClosed(issue_event());
        assert_eq!(event.author_login(), "alice");
        assert_eq!(event.sender_login(), "carol");
        assert_eq!(event.entity_id(), 5);
        assert_eq!(event.kind(), EventKind::IssueClosed);
    }

    #[test]
    fn test_comment_author_is_comment_user() {
        let issue = issue_event();
        let event = SyncEvent::CommentCreated(CommentEvent {
            repository: issue.repository,
            issue: issue.issue,
            comment: CommentSnapshot {
                id: 100,
                body: "me too".to_string(),
                author_login: "dave".to_string(),
            },
            sender_login: "dave".to_string(),
        });
        assert_eq!(event.author_login(), "dave");
        assert_eq!(event.entity_id(), 100);
        assert_eq!(event.issue().number, 7);
        assert!(event.kind().is_comment());
    }
}
