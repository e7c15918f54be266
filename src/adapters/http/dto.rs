//! Wire DTOs for the platform's REST API.
//!
//! The server is inconsistent about field casing (`ID` vs `id`,
//! `ThumbnailURL` vs `thumbnail_url`), so responses accept every spelling
//! seen in the wild.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StreamId;
use crate::domain::stream::{NewStream, Stream, UNTITLED_STREAM};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct CreateStreamRequest {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub category: String,
}

impl From<&NewStream> for CreateStreamRequest {
    fn from(input: &NewStream) -> Self {
        Self {
            title: input.title().to_string(),
            description: input.description.clone(),
            thumbnail: input.thumbnail.clone(),
            category: input.category.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamResponse {
    #[serde(default, rename = "ID", alias = "id")]
    pub id: Option<String>,
    #[serde(default, rename = "Title", alias = "title")]
    pub title: Option<String>,
    #[serde(default, rename = "Description", alias = "description")]
    pub description: Option<String>,
    #[serde(
        default,
        rename = "ThumbnailURL",
        alias = "thumbnail_url",
        alias = "ThumbnailUrl"
    )]
    pub thumbnail_url: Option<String>,
    #[serde(default, rename = "Category", alias = "category")]
    pub category: Option<String>,
    #[serde(default, rename = "OwnerID", alias = "owner_id", alias = "OwnerId")]
    pub owner_id: Option<String>,
    #[serde(default, rename = "ViewersCount", alias = "viewers_count")]
    pub viewers_count: u32,
    #[serde(default, rename = "IsLive", alias = "is_live")]
    pub is_live: bool,
    #[serde(default, rename = "StartedAt", alias = "started_at")]
    pub started_at: Option<String>,
    #[serde(default, rename = "CreatedAt", alias = "created_at")]
    pub created_at: Option<String>,
}

impl From<StreamResponse> for Stream {
    fn from(dto: StreamResponse) -> Self {
        let id = dto
            .id
            .as_deref()
            .and_then(|id| StreamId::new(id).ok())
            .unwrap_or_else(StreamId::generate);

        let title = dto
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| UNTITLED_STREAM.to_string());

        Stream {
            id,
            title,
            description: dto.description,
            thumbnail_url: dto.thumbnail_url,
            category: dto.category,
            owner_id: dto.owner_id.unwrap_or_default(),
            viewers_count: dto.viewers_count,
            is_live: dto.is_live,
            started_at: dto.started_at,
            created_at: dto.created_at.unwrap_or_default(),
        }
    }
}

/// Acknowledgement body for start/join.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RegisterResponse {
    /// The most specific acknowledgement the server gave.
    pub fn acknowledgement(self) -> String {
        self.id
            .or(self.email)
            .unwrap_or_else(|| "Registration successful".to_string())
    }
}

/// Body of `GET api/protected/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    #[serde(alias = "userId", alias = "id")]
    pub user_id: String,
}
