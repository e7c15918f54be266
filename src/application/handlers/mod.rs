//! Request handlers for the REST-backed use cases.

pub mod auth;
pub mod streams;

pub use auth::{LoginCommand, LoginHandler, RegisterCommand, RegisterHandler};
pub use streams::{
    CreateStreamCommand, CreateStreamHandler, JoinStreamHandler, ListStreamsHandler,
    StartStreamHandler,
};
