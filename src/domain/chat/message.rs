//! Chat message entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::UserId;

/// Placeholder shown when the server omits the author's username.
pub const ANONYMOUS_USERNAME: &str = "Anonymous";

/// A chat message as seen by the current viewer.
///
/// `is_own_message` is derived when the message is mapped from the wire and is
/// never part of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub content: String,
    pub created_at: String,
    pub is_own_message: bool,
}

impl ChatMessage {
    /// Parses `created_at` as RFC 3339, if the server sent a valid timestamp.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// Decides whether a message author is the current viewer.
///
/// Exact, case-sensitive match. An absent author or an absent identity is
/// never a match.
pub fn is_own(author: Option<&str>, identity: Option<&UserId>) -> bool {
    match (author, identity) {
        (Some(author), Some(identity)) => author == identity.as_str(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn same_author_is_own() {
        assert!(is_own(Some("user-7"), Some(&user("user-7"))));
    }

    #[test]
    fn different_author_is_not_own() {
        assert!(!is_own(Some("user-8"), Some(&user("user-7"))));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert!(!is_own(Some("User-7"), Some(&user("user-7"))));
    }

    #[test]
    fn missing_author_or_identity_is_not_own() {
        assert!(!is_own(None, Some(&user("user-7"))));
        assert!(!is_own(Some("user-7"), None));
        assert!(!is_own(None, None));
    }

    #[test]
    fn created_at_parses_rfc3339() {
        let message = ChatMessage {
            id: "1".into(),
            user_id: "user-7".into(),
            username: "ana".into(),
            content: "hi".into(),
            created_at: "2024-01-01T00:00:00Z".into(),
            is_own_message: true,
        };
        let parsed = message.created_at_utc().unwrap();
        assert_eq!(parsed.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn created_at_tolerates_garbage() {
        let message = ChatMessage {
            id: String::new(),
            user_id: String::new(),
            username: ANONYMOUS_USERNAME.into(),
            content: String::new(),
            created_at: "yesterday".into(),
            is_own_message: false,
        };
        assert!(message.created_at_utc().is_none());
    }
}
