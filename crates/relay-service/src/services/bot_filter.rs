//! Bot-loop filter
//!
//! Every mutation the relay performs raises a webhook on the other side. Those
//! echoes are recognised by their actor and dropped before dispatch.

use relay_core::events::SyncEvent;
use relay_core::value_objects::Direction;

/// Recognises the two synchronizing app identities
#[derive(Debug, Clone)]
pub struct BotFilter {
    source_bot: String,
    hub_bot: String,
}

impl BotFilter {
    pub fn new(source_bot: impl Into<String>, hub_bot: impl Into<String>) -> Self {
        Self {
            source_bot: source_bot.into(),
            hub_bot: hub_bot.into(),
        }
    }

    /// Whether `login` belongs to one of the synchronizing apps
    pub fn is_synchronized_actor(&self, login: &str) -> bool {
        login.eq_ignore_ascii_case(&self.source_bot) || login.eq_ignore_ascii_case(&self.hub_bot)
    }

    /// Login the loop check is applied to
    ///
    /// Mirrored hub issues are all authored by the hub bot, so issue events
    /// arriving from the hub are judged by the sender instead.
    pub fn actor<'e>(&self, direction: Direction, event: &'e SyncEvent) -> &'e str {
        match direction {
            Direction::HubToSource if !event.kind().is_comment() => event.sender_login(),
            _ => event.author_login(),
        }
    }

    /// Whether the event was produced by the relay itself
    ///
    /// Source issues keep their human author when the relay closes, reopens or
    /// deletes them, so source issue events are also judged by the sender.
    pub fn is_echo(&self, direction: Direction, event: &SyncEvent) -> bool {
        if self.is_synchronized_actor(self.actor(direction, event)) {
            return true;
        }
        direction == Direction::SourceToHub
            && !event.kind().is_comment()
            && self.is_synchronized_actor(event.sender_login())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::entities::RepoRef;
    use relay_core::events::{CommentEvent, CommentSnapshot, IssueEvent, IssueSnapshot};
    use relay_core::value_objects::IssueState;

    fn filter() -> BotFilter {
        BotFilter::new("source-sync[bot]", "hub-sync[bot]")
    }

    fn issue_event(author: &str, sender: &str) -> IssueEvent {
        IssueEvent {
            repository: RepoRef::new("acme", "widgets"),
            issue: IssueSnapshot {
                id: 5,
                node_id: None,
                number: 7,
                title: "Bug".to_string(),
                body: String::new(),
                author_login: author.to_string(),
                state: IssueState::Open,
            },
            sender_login: sender.to_string(),
        }
    }

    #[test]
    fn test_matches_either_bot_case_insensitively() {
        let f = filter();
        assert!(f.is_synchronized_actor("source-sync[bot]"));
        assert!(f.is_synchronized_actor("HUB-SYNC[BOT]"));
        assert!(!f.is_synchronized_actor("alice"));
        assert!(!f.is_synchronized_actor(""));
    }

    #[test]
    fn test_source_events_use_author() {
        let event = SyncEvent::IssueClosed(issue_event("hub-sync[bot]", "alice"));
        assert!(filter().is_echo(Direction::SourceToHub, &event));

        let event = SyncEvent::IssueClosed(issue_event("alice", "carol"));
        assert!(!filter().is_echo(Direction::SourceToHub, &event));
    }

    #[test]
    fn test_source_issue_changed_by_relay_is_echo() {
        // The relay closing alice's issue after a hub close
        let event = SyncEvent::IssueClosed(issue_event("alice", "source-sync[bot]"));
        assert!(filter().is_echo(Direction::SourceToHub, &event));

        let event = SyncEvent::IssueDeleted(issue_event("alice", "Source-Sync[bot]"));
        assert!(filter().is_echo(Direction::SourceToHub, &event));
    }

    #[test]
    fn test_source_comment_events_ignore_sender() {
        let base = issue_event("alice", "source-sync[bot]");
        let event = SyncEvent::CommentCreated(CommentEvent {
            repository: base.repository,
            issue: base.issue,
            comment: CommentSnapshot {
                id: 100,
                body: "me too".to_string(),
                author_login: "dave".to_string(),
            },
            sender_login: "source-sync[bot]".to_string(),
        });
        assert!(!filter().is_echo(Direction::SourceToHub, &event));
    }

    #[test]
    fn test_hub_issue_events_use_sender() {
        // A human closing a bot-authored mirror is relayed
        let event = SyncEvent::IssueClosed(issue_event("hub-sync[bot]", "maintainer"));
        assert!(!filter().is_echo(Direction::HubToSource, &event));

        let event = SyncEvent::IssueClosed(issue_event("hub-sync[bot]", "hub-sync[bot]"));
        assert!(filter().is_echo(Direction::HubToSource, &event));
    }

    #[test]
    fn test_hub_comment_events_use_comment_author() {
        let base = issue_event("hub-sync[bot]", "someone");
        let event = SyncEvent::CommentCreated(CommentEvent {
            repository: base.repository,
            issue: base.issue,
            comment: CommentSnapshot {
                id: 900,
                body: "relayed".to_string(),
                author_login: "hub-sync[bot]".to_string(),
            },
            sender_login: "someone".to_string(),
        });
        assert!(filter().is_echo(Direction::HubToSource, &event));
    }
}
