//! # uplink: file-to-webhook relay
//!
//! `uplink` is a small HTTP relay. Callers `POST /upload` with either raw
//! files (multipart) or remote URLs (JSON or form-encoded), and the service
//! forwards the files to a fixed third-party webhook endpoint as a multipart
//! payload, returning the webhook's attachment metadata verbatim.
//!
//! ## Request Flow
//!
//! A request first passes the API-key middleware (a header-equality check
//! against the configured secret). The upload handler then resolves the
//! body into a uniform file sequence: direct uploads are used as-is, remote
//! URLs are downloaded concurrently into memory ([`relay::RemoteFetcher`]),
//! and direct files take precedence when both are present. The sequence is
//! relayed by [`relay::WebhookRelay`] as a single multipart POST, and the
//! webhook's `attachments` array is returned to the caller inside a
//! `{ success, message, attachments }` envelope. Any failure along the way
//! maps to the uniform `{ success: false, error }` shape via
//! [`errors::Error`] - there is no retry, no queuing, and no partial
//! success.
//!
//! ## Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use uplink::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Parse CLI arguments and load configuration
//!     let args = uplink::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     // Initialize structured logging
//!     uplink::telemetry::init_telemetry()?;
//!
//!     // Create and start the application with graceful shutdown on Ctrl+C
//!     Application::new(config)?
//!         .serve(async {
//!             tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
mod openapi;
pub mod relay;
pub mod telemetry;

#[cfg(test)]
mod test_utils;

use crate::config::CorsOrigin;
use crate::openapi::ApiDoc;
use crate::relay::{RemoteFetcher, WebhookRelay};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use bon::Builder;
pub use config::Config;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

/// Application state shared across all request handlers.
///
/// Everything in here is read-only at request time: the configuration and
/// the relay components constructed from it. Cloning is cheap (`reqwest`
/// clients are reference-counted).
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub fetcher: RemoteFetcher,
    pub relay: WebhookRelay,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = Vec::new();
    for origin in &config.cors.allowed_origins {
        let header_value = match origin {
            CorsOrigin::Wildcard => "*".parse::<HeaderValue>()?,
            CorsOrigin::Url(url) => url.as_str().parse::<HeaderValue>()?,
        };
        origins.push(header_value);
    }

    Ok(CorsLayer::new().allow_origin(origins))
}

/// Build the application router with all endpoints and middleware.
///
/// - `POST /upload` behind the API-key middleware and the configured body limit
/// - `GET /healthz` liveness check (unauthenticated)
/// - `/docs` OpenAPI documentation
/// - CORS and tracing layers
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let upload_limit = state.config.limits.max_upload_bytes as usize;

    let upload_routes = Router::new()
        .route("/upload", post(api::handlers::upload::upload))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(from_fn_with_state(state.clone(), auth::require_api_key))
        .with_state(state.clone());

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .merge(upload_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    );

    Ok(router)
}

/// Main application struct that owns the router and configuration.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] constructs the relay components from
///    configuration and assembles the router
/// 2. **Serve**: [`Application::serve`] binds a TCP listener and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    /// Create a new application instance with all components constructed.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting uplink with configuration: {:#?}", config);

        if config.auth.api_key.is_none() {
            warn!("auth.api_key is not set; /upload accepts unauthenticated requests");
        }
        if config.webhook.endpoint.is_none() {
            warn!("webhook.endpoint is not set; uploads will fail until it is configured");
        }

        let state = AppState::builder()
            .fetcher(RemoteFetcher::new(&config.fetch))
            .relay(WebhookRelay::new(&config.webhook))
            .config(config.clone())
            .build();

        let router = build_router(state)?;

        Ok(Self { router, config })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Relay listening on http://{}, available at http://localhost:{}",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Server shut down");

        Ok(())
    }
}
