//! Chat wire protocol and codec.
//!
//! Defines the JSON text frames exchanged over the chat socket:
//! - Server → Client: typed events; only `"message"` is consumed today
//! - Client → Server: `send_message`
//!
//! Decoding is tolerant: every field except `type` is optional and unknown
//! fields are ignored. A frame that fails to decode is the caller's to drop;
//! it never affects the connection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::UserId;

use super::message::{is_own, ChatMessage, ANONYMOUS_USERNAME};

/// Event type carried by chat message frames.
pub const MESSAGE_EVENT_TYPE: &str = "message";

/// Event type of the only client-to-server frame.
pub const SEND_MESSAGE_EVENT_TYPE: &str = "send_message";

/// Errors raised by the codec.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Malformed chat frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

// ============================================
// Server → Client
// ============================================

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundWireEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl InboundWireEvent {
    /// True for frames that carry a chat message.
    pub fn is_chat_message(&self) -> bool {
        self.event_type == MESSAGE_EVENT_TYPE
    }

    /// Maps a `"message"` frame to a [`ChatMessage`] for the given viewer.
    ///
    /// Returns `None` for every other event type.
    pub fn into_chat_message(self, identity: Option<&UserId>) -> Option<ChatMessage> {
        if !self.is_chat_message() {
            return None;
        }

        let is_own_message = is_own(self.user_id.as_deref(), identity);

        Some(ChatMessage {
            id: self.id.unwrap_or_default(),
            user_id: self.user_id.unwrap_or_default(),
            username: self
                .username
                .unwrap_or_else(|| ANONYMOUS_USERNAME.to_string()),
            content: self.content.unwrap_or_default(),
            created_at: self.created_at.unwrap_or_default(),
            is_own_message,
        })
    }
}

/// Decodes one text frame.
pub fn decode(text: &str) -> Result<InboundWireEvent, CodecError> {
    Ok(serde_json::from_str(text)?)
}

// ============================================
// Client → Server
// ============================================

/// A frame sent by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundWireEvent {
    #[serde(rename = "type")]
    pub event_type: &'static str,
    pub content: String,
}

impl OutboundWireEvent {
    /// Builds a `send_message` frame.
    pub fn send_message(content: impl Into<String>) -> Self {
        Self {
            event_type: SEND_MESSAGE_EVENT_TYPE,
            content: content.into(),
        }
    }
}

/// Encodes an outbound frame as JSON text.
pub fn encode(event: &OutboundWireEvent) -> Result<String, CodecError> {
    Ok(serde_json::to_string(event)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn identity(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn decodes_full_message_frame() {
        let event = decode(
            r#"{"type":"message","id":"1","user_id":"user-7","username":"ana","content":"hi","created_at":"2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert!(event.is_chat_message());
        assert_eq!(event.id.as_deref(), Some("1"));
        assert_eq!(event.user_id.as_deref(), Some("user-7"));
        assert_eq!(event.created_at.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn decodes_frame_with_only_type() {
        let event = decode(r#"{"type":"message"}"#).unwrap();
        assert_eq!(event.id, None);
        assert_eq!(event.content, None);
    }

    #[test]
    fn ignores_unknown_fields() {
        let event = decode(r#"{"type":"viewer_count","count":12,"extra":{"a":1}}"#).unwrap();
        assert_eq!(event.event_type, "viewer_count");
        assert!(!event.is_chat_message());
    }

    #[test]
    fn explicit_nulls_decode_as_absent() {
        let event = decode(r#"{"type":"message","user_id":null,"username":null}"#).unwrap();
        assert_eq!(event.user_id, None);
        assert_eq!(event.username, None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode("not json").is_err());
        assert!(decode(r#"{"id":"1"}"#).is_err());
        assert!(decode("").is_err());
    }

    #[test]
    fn maps_missing_fields_to_defaults() {
        let message = decode(r#"{"type":"message"}"#)
            .unwrap()
            .into_chat_message(Some(&identity("user-7")))
            .unwrap();

        assert_eq!(message.id, "");
        assert_eq!(message.user_id, "");
        assert_eq!(message.username, ANONYMOUS_USERNAME);
        assert_eq!(message.content, "");
        assert_eq!(message.created_at, "");
        assert!(!message.is_own_message);
    }

    #[test]
    fn non_message_frames_map_to_none() {
        let event = decode(r#"{"type":"user_joined","user_id":"user-7"}"#).unwrap();
        assert!(event.into_chat_message(Some(&identity("user-7"))).is_none());
    }

    #[test]
    fn encodes_send_message_frame() {
        let json = encode(&OutboundWireEvent::send_message("hello")).unwrap();
        assert_eq!(json, r#"{"type":"send_message","content":"hello"}"#);
    }

    #[test]
    fn encodes_content_with_quotes_and_unicode() {
        let json = encode(&OutboundWireEvent::send_message("dijo \"¡hola!\"")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["content"], "dijo \"¡hola!\"");
    }

    proptest! {
        #[test]
        fn ownership_matches_exact_user_id(
            author in "[a-zA-Z0-9-]{1,12}",
            viewer in "[a-zA-Z0-9-]{1,12}",
        ) {
            let frame = serde_json::json!({
                "type": "message",
                "id": "x",
                "user_id": author.clone(),
            })
            .to_string();

            let message = decode(&frame)
                .unwrap()
                .into_chat_message(Some(&identity(&viewer)))
                .unwrap();

            prop_assert_eq!(message.is_own_message, author == viewer);
        }

        #[test]
        fn frames_without_user_id_are_never_own(viewer in "[a-z0-9-]{1,12}") {
            let message = decode(r#"{"type":"message","id":"x"}"#)
                .unwrap()
                .into_chat_message(Some(&identity(&viewer)))
                .unwrap();

            prop_assert!(!message.is_own_message);
        }

        #[test]
        fn other_event_types_never_become_messages(
            event_type in "[a-z_]{1,16}".prop_filter("not message", |t| t != "message"),
        ) {
            let frame = serde_json::json!({ "type": event_type, "id": "1" }).to_string();
            let event = decode(&frame).unwrap();
            prop_assert!(event.into_chat_message(None).is_none());
        }

        #[test]
        fn decode_never_panics(input in ".*") {
            let _ = decode(&input);
        }
    }
}
