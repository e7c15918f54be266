//! StreamHub Chat - client core for live-stream chat rooms.
//!
//! Connects a viewer to a stream's chat over WebSocket, decodes the chat
//! protocol, and folds the traffic into view state. A small REST client covers
//! the stream directory and login so a terminal client can join a stream.
//!
//! # Layers
//!
//! - [`domain`] - messages, streams, connection state, wire codec
//! - [`ports`] - transport, directory, auth and credential seams
//! - [`adapters`] - tokio-tungstenite, reqwest and in-memory implementations
//! - [`application`] - chat session core and use case handlers
//! - [`presentation`] - chat view state

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod presentation;
pub mod telemetry;
