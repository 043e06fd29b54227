//! Sync events - the closed set of inbound changes the relay acts on

mod sync_event;

pub use sync_event::{
    CommentEvent, CommentSnapshot, EditChanges, EventKind, IssueEvent, IssueSnapshot, SyncEvent,
};
