//! Entity to model mappers
//!
//! Conversions from database rows to domain objects. Text columns holding
//! enums are parsed strictly; a bad value is a `DatabaseError`.

mod comment;
mod issue;
mod sync_intent;

pub use comment::comment_target;
