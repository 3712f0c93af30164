//! API request and response data models.
//!
//! These structures define the public API contract: the `url` payload shapes
//! accepted by the upload endpoint, and the response envelope carrying the
//! webhook's attachment descriptors back to the caller.

pub mod upload;
