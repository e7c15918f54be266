//! Stream module - live streams listed by the directory.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StreamId, UserId, ValidationError};

/// Title used when the server returns a stream without one.
pub const UNTITLED_STREAM: &str = "Untitled";

/// A live stream as listed by the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: StreamId,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub category: Option<String>,
    /// Empty when the server omitted the owner.
    pub owner_id: String,
    pub viewers_count: u32,
    pub is_live: bool,
    pub started_at: Option<String>,
    pub created_at: String,
}

impl Stream {
    /// True when the given user owns this stream.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        !self.owner_id.is_empty() && self.owner_id == user_id.as_str()
    }
}

/// Input for creating a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStream {
    title: String,
    pub description: String,
    pub thumbnail: String,
    pub category: String,
}

impl NewStream {
    /// Creates the input, rejecting a blank title.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        thumbnail: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(Self {
            title,
            description: description.into(),
            thumbnail: thumbnail.into(),
            category: category.into(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stream_trims_title() {
        let input = NewStream::new("  Friday jam  ", "", "", "music").unwrap();
        assert_eq!(input.title(), "Friday jam");
        assert_eq!(input.category, "music");
    }

    #[test]
    fn new_stream_rejects_blank_title() {
        let err = NewStream::new("   ", "d", "t", "c").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("title"));
    }

    #[test]
    fn ownership_requires_matching_non_empty_owner() {
        let mut stream = Stream {
            id: StreamId::new("s1").unwrap(),
            title: "t".into(),
            description: None,
            thumbnail_url: None,
            category: None,
            owner_id: "user-1".into(),
            viewers_count: 0,
            is_live: false,
            started_at: None,
            created_at: String::new(),
        };
        let owner = UserId::new("user-1").unwrap();
        assert!(stream.is_owned_by(&owner));

        stream.owner_id = String::new();
        assert!(!stream.is_owned_by(&owner));
    }
}
