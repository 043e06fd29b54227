//! CommentTarget entity <-> model mapper

use relay_core::entities::{CommentMapping, CommentTarget, IssueMapping};
use relay_core::error::DomainError;
use relay_core::value_objects::Side;

use crate::models::CommentTargetModel;

use super::issue::parse_state;

/// Build a CommentTarget from a joined row; `origin` is the relation it was read from
pub fn comment_target(origin: Side, model: CommentTargetModel) -> Result<CommentTarget, DomainError> {
    let parent = IssueMapping {
        source_issue_id: model.parent_issue_id,
        source_org: model.issue_source_org,
        source_repo: model.issue_source_repo,
        source_issue_number: model.issue_source_issue_number,
        author_login: model.issue_author_login,
        title: model.issue_title,
        body: model.issue_body,
        state: parse_state(&model.issue_state)?,
        hub_issue_number: model.issue_hub_issue_number,
    };

    Ok(CommentTarget {
        comment: CommentMapping {
            origin,
            source_comment_id: model.source_comment_id,
            hub_comment_id: model.hub_comment_id,
            parent_issue_id: model.parent_issue_id,
            author_login: model.author_login,
            body: model.body,
        },
        parent,
    })
}
