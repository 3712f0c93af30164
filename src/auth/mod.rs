//! Inbound API-key authentication.
//!
//! A single header-equality check against the configured secret, applied as
//! middleware on the upload route. On mismatch the request is rejected with
//! 403 and the fixed `{"success": false, "error": "Invalid API key"}` body
//! before the relay pipeline is invoked. When no key is configured the check
//! is disabled (see DESIGN.md).

use crate::{AppState, errors::Error};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Middleware enforcing the API key header-equality check.
pub async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Result<Response, Error> {
    if let Some(expected) = state.config.auth.api_key.as_deref() {
        let presented = request
            .headers()
            .get(state.config.auth.header_name.as_str())
            .and_then(|value| value.to_str().ok());

        if presented != Some(expected) {
            return Err(Error::Unauthenticated);
        }
    }

    Ok(next.run(request).await)
}
