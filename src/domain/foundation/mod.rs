//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, the tagged remote result, and validation errors
//! that form the vocabulary of the StreamHub client.

mod errors;
mod ids;
mod remote_result;

pub use errors::ValidationError;
pub use ids::{StreamId, UserId};
pub use remote_result::RemoteResult;
