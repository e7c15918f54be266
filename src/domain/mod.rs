//! Domain layer containing the client's business types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, remote result, validation errors)
//! - `chat` - Chat messages, connection state and the wire codec
//! - `stream` - Live streams from the directory

pub mod chat;
pub mod foundation;
pub mod stream;
