//! CommentMapping entity - one synchronized comment pair

use crate::entities::IssueMapping;
use crate::value_objects::Side;

/// Links a comment to its mirror, scoped to a parent issue mapping
///
/// `origin` records which org the comment was written in. Source-origin rows
/// live in the `comments` relation, hub-origin rows in `synced_comments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentMapping {
    pub origin: Side,
    pub source_comment_id: i64,
    pub hub_comment_id: i64,
    /// `source_issue_id` of the parent IssueMapping
    pub parent_issue_id: i64,
    pub author_login: String,
    pub body: String,
}

impl CommentMapping {
    /// Id of the comment in the org it was written in
    #[inline]
    pub fn origin_id(&self) -> i64 {
        match self.origin {
            Side::Source => self.source_comment_id,
            Side::Hub => self.hub_comment_id,
        }
    }

    /// Id of the relayed copy
    #[inline]
    pub fn mirror_id(&self) -> i64 {
        match self.origin {
            Side::Source => self.hub_comment_id,
            Side::Hub => self.source_comment_id,
        }
    }

    /// Comment id on the given side
    #[inline]
    pub fn id_on(&self, side: Side) -> i64 {
        match side {
            Side::Source => self.source_comment_id,
            Side::Hub => self.hub_comment_id,
        }
    }
}

/// A comment mapping resolved through its parent issue mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentTarget {
    pub comment: CommentMapping,
    pub parent: IssueMapping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_and_mirror_ids() {
        let from_source = CommentMapping {
            origin: Side::Source,
            source_comment_id: 100,
            hub_comment_id: 900,
            parent_issue_id: 5,
            author_login: "alice".to_string(),
            body: "hi".to_string(),
        };
        assert_eq!(from_source.origin_id(), 100);
        assert_eq!(from_source.mirror_id(), 900);

        let from_hub = CommentMapping {
            origin: Side::Hub,
            ..from_source
        };
        assert_eq!(from_hub.origin_id(), 900);
        assert_eq!(from_hub.mirror_id(), 100);
        assert_eq!(from_hub.id_on(Side::Source), 100);
    }
}
