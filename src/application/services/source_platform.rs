use async_trait::async_trait;
use bytes::Bytes;

use crate::{domain::models::file::SourceFileMetadata, services::PlatformError};

/// Incrementally readable response body.
#[async_trait]
pub trait DownloadBody: Send {
    /// Returns `Ok(None)` once the body is exhausted.
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, PlatformError>;
}

pub struct Download {
    /// Value of the `Content-Length` header, when the platform sent one.
    pub content_length: Option<u64>,
    pub body: Box<dyn DownloadBody>,
}

/// The chat front-end files are fetched from.
#[async_trait]
pub trait SourcePlatform: Send + Sync {
    async fn get_file_metadata(
        &self,
        file_reference: &str,
    ) -> Result<SourceFileMetadata, PlatformError>;

    async fn download(&self, download_path: &str) -> Result<Download, PlatformError>;
}
