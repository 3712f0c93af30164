//! Webhook delivery: build a multipart payload and POST it to the configured
//! endpoint.
//!
//! The endpoint accepts either a single `file` part or repeated `files[0]`,
//! `files[1]`, … parts; the field-name asymmetry mirrors the shapes the
//! external webhook accepts and must be preserved exactly. A successful
//! response carries a non-empty `attachments` array which is passed back to
//! the caller unmodified.

use crate::api::models::upload::AttachmentDescriptor;
use crate::config::WebhookConfig;
use crate::errors::{Error, Result};
use crate::relay::UploadedFile;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use url::Url;

/// Expected shape of the webhook's JSON response body.
#[derive(Debug, Deserialize)]
struct WebhookResponse {
    #[serde(default)]
    attachments: Vec<AttachmentDescriptor>,
}

/// Relays file payloads to the configured webhook endpoint.
#[derive(Debug, Clone)]
pub struct WebhookRelay {
    client: reqwest::Client,
    endpoint: Option<Url>,
}

impl WebhookRelay {
    pub fn new(config: &WebhookConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create webhook HTTP client");
        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }

    /// Relay a non-empty file sequence, returning the webhook's attachment
    /// descriptors.
    ///
    /// The endpoint presence is checked on every call, before any network
    /// I/O. Callers guarantee `files` is non-empty; the upload handler
    /// rejects empty requests long before this point.
    pub async fn relay(&self, files: &[UploadedFile]) -> Result<Vec<AttachmentDescriptor>> {
        let endpoint = self.endpoint.as_ref().ok_or_else(|| Error::Configuration {
            message: "missing webhook endpoint".to_string(),
        })?;

        debug_assert!(!files.is_empty(), "relay called with an empty file sequence");

        let mut form = Form::new();
        if let [file] = files {
            form = form.part("file", file_part(file)?);
        } else {
            for (index, file) in files.iter().enumerate() {
                form = form.part(format!("files[{index}]"), file_part(file)?);
            }
        }

        tracing::debug!(count = files.len(), endpoint = %endpoint, "Relaying files to webhook");

        let response = self
            .client
            .post(endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Relay {
                message: format!("webhook request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Relay {
                message: format!("webhook returned HTTP {}", status.as_u16()),
            });
        }

        let body: WebhookResponse = response.json().await.map_err(|e| Error::Relay {
            message: format!("invalid webhook response: {e}"),
        })?;

        if body.attachments.is_empty() {
            return Err(Error::Relay {
                message: "no attachments found".to_string(),
            });
        }

        tracing::debug!(attachments = body.attachments.len(), "Webhook relay succeeded");

        Ok(body.attachments)
    }
}

/// Build a multipart part for one file, with a MIME type guessed from its name.
fn file_part(file: &UploadedFile) -> Result<Part> {
    let mime = mime_guess::from_path(&file.name).first_or_octet_stream();
    Part::bytes(file.data.to_vec())
        .file_name(file.name.clone())
        .mime_str(mime.essence_str())
        .map_err(|e| Error::Relay {
            message: format!("invalid attachment content type: {e}"),
        })
}
