//! IssueMapping entity <-> model mapper

use relay_core::entities::IssueMapping;
use relay_core::error::DomainError;
use relay_core::value_objects::IssueState;

use crate::models::IssueModel;
use crate::repositories::error::invalid_column;

pub(crate) fn parse_state(value: &str) -> Result<IssueState, DomainError> {
    value
        .parse::<IssueState>()
        .map_err(|_| invalid_column("state", value))
}

/// Convert IssueModel to IssueMapping entity
impl TryFrom<IssueModel> for IssueMapping {
    type Error = DomainError;

    fn try_from(model: IssueModel) -> Result<Self, Self::Error> {
        Ok(IssueMapping {
            state: parse_state(&model.state)?,
            source_issue_id: model.source_issue_id,
            source_org: model.source_org,
            source_repo: model.source_repo,
            source_issue_number: model.source_issue_number,
            author_login: model.author_login,
            title: model.title,
            body: model.body,
            hub_issue_number: model.hub_issue_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(state: &str) -> IssueModel {
        IssueModel {
            source_issue_id: 5,
            source_org: "acme".to_string(),
            source_repo: "widgets".to_string(),
            source_issue_number: 7,
            author_login: "alice".to_string(),
            title: "Bug".to_string(),
            body: String::new(),
            state: state.to_string(),
            hub_issue_number: 42,
        }
    }

    #[test]
    fn test_model_to_entity() {
        let mapping = IssueMapping::try_from(model("closed")).unwrap();
        assert_eq!(mapping.state, IssueState::Closed);
        assert_eq!(mapping.hub_issue_number, 42);
    }

    #[test]
    fn test_bad_state_rejected() {
        assert!(matches!(
            IssueMapping::try_from(model("merged")),
            Err(DomainError::DatabaseError(_))
        ));
    }
}
