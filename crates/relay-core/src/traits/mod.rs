//! Ports implemented by the infrastructure crates

mod repositories;
mod tracker;

pub use repositories::{
    CommentMappingRepository, IssueMappingRepository, RepoResult, SyncIntentRepository,
};
pub use tracker::{AppInstallations, IssueTracker, TrackerResult};
