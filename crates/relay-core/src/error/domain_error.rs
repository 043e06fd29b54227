//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Side;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Lookup Errors
    // =========================================================================
    #[error("Issue mapping not found: {0}")]
    IssueMappingNotFound(String),

    #[error("Comment mapping not found: {origin} comment {id}")]
    CommentMappingNotFound { origin: Side, id: i64 },

    #[error("No installation found for org: {0}")]
    InstallationNotFound(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Mapping already exists: {0}")]
    DuplicateMapping(String),

    // =========================================================================
    // Inbound Event Errors
    // =========================================================================
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Unsupported event: {0}")]
    UnsupportedEvent(String),

    // =========================================================================
    // Remote Tracker Errors
    // =========================================================================
    #[error("Remote API error ({status}): {message}")]
    RemoteApi { status: u16, message: String },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    /// A store write failed after the remote side was already mutated
    #[error("Persistence failed after remote change: {0}")]
    Persistence(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn issue_not_found_by_source(source_issue_id: i64) -> Self {
        Self::IssueMappingNotFound(format!("source issue {source_issue_id}"))
    }

    pub fn issue_not_found_by_hub(hub_issue_number: i64) -> Self {
        Self::IssueMappingNotFound(format!("hub issue #{hub_issue_number}"))
    }

    /// Transport failure with no HTTP status (connect, timeout, decode)
    pub fn transport(message: impl Into<String>) -> Self {
        Self::RemoteApi {
            status: 0,
            message: message.into(),
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::IssueMappingNotFound(_) => "UNKNOWN_ISSUE_MAPPING",
            Self::CommentMappingNotFound { .. } => "UNKNOWN_COMMENT_MAPPING",
            Self::InstallationNotFound(_) => "INSTALLATION_NOT_FOUND",
            Self::DuplicateMapping(_) => "DUPLICATE_MAPPING",
            Self::InvalidEvent(_) => "INVALID_EVENT",
            Self::UnsupportedEvent(_) => "UNSUPPORTED_EVENT",
            Self::RemoteApi { .. } => "REMOTE_API_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::IssueMappingNotFound(_)
                | Self::CommentMappingNotFound { .. }
                | Self::InstallationNotFound(_)
        )
    }

    /// Check if the inbound event itself was rejected
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidEvent(_) | Self::UnsupportedEvent(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateMapping(_))
    }
}
