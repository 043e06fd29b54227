//! IssueMapping entity - one synchronized issue pair

use crate::entities::RepoRef;
use crate::value_objects::IssueState;

/// Links a source-org issue to its mirror in the hub org
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueMapping {
    /// Durable global id of the originating issue, stable across edits
    pub source_issue_id: i64,
    pub source_org: String,
    pub source_repo: String,
    pub source_issue_number: i64,
    pub author_login: String,
    pub title: String,
    pub body: String,
    pub state: IssueState,
    /// Number of the mirrored issue in the hub repository
    pub hub_issue_number: i64,
}

impl IssueMapping {
    /// Mutable part of the mapping
    pub fn content(&self) -> IssueContent {
        IssueContent {
            author_login: self.author_login.clone(),
            title: self.title.clone(),
            body: self.body.clone(),
            state: self.state,
        }
    }

    /// Apply new content, leaving the identity columns untouched
    pub fn apply(&mut self, content: IssueContent) {
        self.author_login = content.author_login;
        self.title = content.title;
        self.body = content.body;
        self.state = content.state;
    }

    /// Coordinates of the originating issue
    pub fn source_ref(&self) -> SourceIssueRef {
        SourceIssueRef {
            org: self.source_org.clone(),
            repo: self.source_repo.clone(),
            number: self.source_issue_number,
            source_issue_id: self.source_issue_id,
        }
    }
}

/// Fields overwritten by an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueContent {
    pub author_login: String,
    pub title: String,
    pub body: String,
    pub state: IssueState,
}

/// Where an issue lives in the source org, resolved from its hub mirror
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceIssueRef {
    pub org: String,
    pub repo: String,
    pub number: i64,
    pub source_issue_id: i64,
}

impl SourceIssueRef {
    pub fn repo_ref(&self) -> RepoRef {
        RepoRef::new(&self.org, &self.repo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping() -> IssueMapping {
        IssueMapping {
            source_issue_id: 5,
            source_org: "acme".to_string(),
            source_repo: "widgets".to_string(),
            source_issue_number: 7,
            author_login: "alice".to_string(),
            title: "Bug".to_string(),
            body: "It broke".to_string(),
            state: IssueState::Open,
            hub_issue_number: 42,
        }
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut m = mapping();
        m.apply(IssueContent {
            author_login: "bob".to_string(),
            title: "Bug (again)".to_string(),
            body: String::new(),
            state: IssueState::Closed,
        });
        assert_eq!(m.source_issue_id, 5);
        assert_eq!(m.hub_issue_number, 42);
        assert_eq!(m.title, "Bug (again)");
        assert!(m.state.is_closed());
    }

    #[test]
    fn test_source_ref() {
        let r = mapping().source_ref();
        assert_eq!(r.repo_ref().full_name(), "acme/widgets");
        assert_eq!(r.number, 7);
        assert_eq!(r.source_issue_id, 5);
    }
}
