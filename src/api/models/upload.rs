use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Attachment metadata returned by the webhook for a stored file.
///
/// Passed through to the caller verbatim: field names map 1:1 and no
/// individual field is validated, so partially-populated descriptors
/// deserialize with defaults rather than failing the relay.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AttachmentDescriptor {
    pub id: String,
    pub filename: String,
    pub size: u64,
    pub url: String,
    pub proxy_url: String,
}

/// Success envelope for `POST /upload`.
///
/// Failures use the uniform `{ "success": false, "error": "..." }` shape
/// rendered by [`crate::errors::Error`].
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub attachments: Vec<AttachmentDescriptor>,
}

/// Body shape for URL-based uploads, accepted as JSON or form-encoded.
#[derive(Debug, Default, Deserialize)]
pub struct UrlPayload {
    /// One URL or a list of URLs to fetch and relay
    pub url: Option<OneOrMany<String>>,
}

/// A single value or a list of values; resolved into a `Vec` once at the
/// request boundary instead of being re-checked downstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}
