//! API layer for HTTP request handling and data models.
//!
//! This module contains the REST API implementation, organized into:
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures for API communication
//!
//! # API Structure
//!
//! - **Upload** (`POST /upload`): the relay boundary - accepts direct file
//!   uploads or remote URLs and forwards them to the configured webhook
//! - **Health** (`GET /healthz`): liveness check, always unauthenticated
//!
//! # OpenAPI Documentation
//!
//! Endpoints are documented with OpenAPI annotations using `utoipa`.
//! API documentation is available at `/docs` when the server is running.

pub mod handlers;
pub mod models;
