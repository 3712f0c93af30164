//! OpenAPI documentation configuration.
//!
//! The generated spec is served through Scalar at `/docs`.

use crate::api::models::upload::{AttachmentDescriptor, UploadResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "uplink",
        description = "A small HTTP relay that forwards uploaded files and remote URLs to a webhook endpoint"
    ),
    paths(crate::api::handlers::upload::upload),
    components(schemas(UploadResponse, AttachmentDescriptor)),
    tags((name = "upload", description = "File relay endpoints"))
)]
pub struct ApiDoc;
