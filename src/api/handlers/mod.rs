//! HTTP request handlers.
//!
//! Each handler is responsible for:
//! - Request validation and deserialization
//! - Business logic execution via the relay components
//! - Response serialization
//!
//! Handlers return [`crate::errors::Error`] which automatically converts to
//! appropriate HTTP status codes and the uniform `{success, error}` JSON
//! failure envelope.

pub mod upload;
