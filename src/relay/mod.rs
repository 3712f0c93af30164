//! The upload-relay pipeline.
//!
//! - [`fetcher`]: remote URL downloads into in-memory [`UploadedFile`]s
//! - [`webhook`]: multipart delivery of files to the configured webhook endpoint
//!
//! The boundary handler resolves the caller's polymorphic input (one file,
//! many files, one URL, many URLs) into a [`FilePayload`] exactly once; from
//! there on every component works with a uniform ordered file sequence.

pub mod fetcher;
pub mod webhook;

pub use fetcher::RemoteFetcher;
pub use webhook::WebhookRelay;

use bytes::Bytes;

/// A file buffered in memory, ready to be relayed.
///
/// Created either from a direct multipart upload or from a completed remote
/// fetch. Owned by the request that produced it and discarded after the
/// relay call completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// The "file or list of files" input shape, resolved once at the boundary.
#[derive(Debug)]
pub enum FilePayload {
    Single(UploadedFile),
    Many(Vec<UploadedFile>),
}

impl FilePayload {
    /// Normalize into a uniform ordered sequence. Pure; a single file becomes
    /// a one-element list, a list passes through unchanged.
    pub fn into_files(self) -> Vec<UploadedFile> {
        match self {
            FilePayload::Single(file) => vec![file],
            FilePayload::Many(files) => files,
        }
    }
}

impl From<Vec<UploadedFile>> for FilePayload {
    fn from(mut files: Vec<UploadedFile>) -> Self {
        if files.len() == 1 {
            FilePayload::Single(files.remove(0))
        } else {
            FilePayload::Many(files)
        }
    }
}
