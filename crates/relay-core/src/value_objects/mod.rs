//! Value objects - immutable types that represent domain concepts

mod direction;
mod issue_state;

pub use direction::{Direction, Side};
pub use issue_state::{IssueState, IssueStateParseError};
