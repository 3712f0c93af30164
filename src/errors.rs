use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data, e.g. neither a file nor a url was provided
    #[error("{message}")]
    Validation { message: String },

    /// Inbound payload exceeds the configured size limit
    #[error("{message}")]
    PayloadTooLarge { message: String },

    /// API key header missing or mismatched
    #[error("Invalid API key")]
    Unauthenticated,

    /// Operator-correctable configuration problem
    #[error("{message}")]
    Configuration { message: String },

    /// Remote URL could not be downloaded
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    /// Webhook call failed or returned an unusable response
    #[error("{message}")]
    Relay { message: String },

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Unauthenticated => StatusCode::FORBIDDEN,
            Error::Configuration { .. } | Error::Fetch { .. } | Error::Relay { .. } | Error::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::Other(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Configuration { .. } | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Fetch { .. } | Error::Relay { .. } => {
                tracing::warn!("Upstream error: {}", self);
            }
            Error::Unauthenticated => {
                tracing::info!("Authorization error: {}", self);
            }
            Error::Validation { .. } | Error::PayloadTooLarge { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        // Every failure renders as the uniform relay envelope
        let body = json!({
            "success": false,
            "error": self.user_message(),
        });

        (self.status_code(), Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
