//! Chat module - live chat vocabulary.
//!
//! - [`connection_state`] - state of the chat socket
//! - [`message`] - the chat message entity and ownership rule
//! - [`wire`] - JSON frame types and the codec

pub mod connection_state;
pub mod message;
pub mod wire;

pub use connection_state::ConnectionState;
pub use message::{is_own, ChatMessage, ANONYMOUS_USERNAME};
pub use wire::{
    decode, encode, CodecError, InboundWireEvent, OutboundWireEvent, MESSAGE_EVENT_TYPE,
    SEND_MESSAGE_EVENT_TYPE,
};
