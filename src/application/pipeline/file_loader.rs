use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    application::{
        error::{SizeCheckpoint, TransferError},
        pipeline::{
            buffer_pool::BufferPool, mime::MimeResolver, monitor::PerformanceMonitor,
            retry::RetryExecutor, sanitizer::SecuritySanitizer,
        },
        services::SourcePlatform,
    },
    domain::{config::TransferConfig, models::file::FileBuffer},
    services::PlatformError,
};

/// Fetches one file from the source platform into a validated pooled buffer.
pub struct FileLoader {
    source: Arc<dyn SourcePlatform>,
    pool: Arc<BufferPool>,
    config: Arc<TransferConfig>,
    sanitizer: SecuritySanitizer,
    mime: MimeResolver,
    retry: RetryExecutor,
    monitor: PerformanceMonitor,
}

impl FileLoader {
    pub fn new(
        source: Arc<dyn SourcePlatform>,
        pool: Arc<BufferPool>,
        config: Arc<TransferConfig>,
        retry: RetryExecutor,
        monitor: PerformanceMonitor,
    ) -> Self {
        Self {
            source,
            pool,
            sanitizer: SecuritySanitizer::new(config.max_file_name_length),
            config,
            mime: MimeResolver,
            retry,
            monitor,
        }
    }

    pub async fn load(&self, file_reference: &str) -> Result<FileBuffer, TransferError> {
        if file_reference.trim().is_empty() {
            return Err(TransferError::Download {
                reference: file_reference.to_string(),
                source: PlatformError::InvalidRequest("File reference is empty".to_string()),
            });
        }

        let (result, _) = self
            .monitor
            .measure(
                "file_download",
                file_reference,
                self.retry
                    .execute("download", |_| self.load_once(file_reference)),
            )
            .await;

        if let Ok(file) = &result {
            info!(
                reference = file_reference,
                file_name = %file.file_name,
                mime_type = %file.mime_type,
                size = file.size(),
                "File loaded"
            );
        }
        result
    }

    async fn load_once(&self, file_reference: &str) -> Result<FileBuffer, TransferError> {
        let timeout = self.config.download_timeout();
        match tokio::time::timeout(timeout, self.fetch(file_reference)).await {
            Ok(result) => result,
            Err(_) => Err(TransferError::Timeout {
                operation: "download",
                timeout,
            }),
        }
    }

    async fn fetch(&self, file_reference: &str) -> Result<FileBuffer, TransferError> {
        let download_error = |source: PlatformError| TransferError::Download {
            reference: file_reference.to_string(),
            source,
        };

        let metadata = self
            .source
            .get_file_metadata(file_reference)
            .await
            .map_err(download_error)?;

        let finding = self
            .sanitizer
            .sanitize(metadata.file_name.as_deref().unwrap_or_default());
        if !finding.is_clean() {
            warn!(
                reference = file_reference,
                threat_level = %finding.threat_level(),
                issues = ?finding.issues,
                sanitized = %finding.sanitized_name,
                "Filename required sanitization"
            );
        }
        let file_name = finding.sanitized_name;
        let limit = self.config.max_file_size;

        if let Some(reported) = metadata.reported_size {
            if reported > limit {
                return Err(TransferError::SizeExceeded {
                    file_name,
                    size: reported,
                    limit,
                    checkpoint: SizeCheckpoint::ReportedSize,
                });
            }
        }

        let mut download = self
            .source
            .download(&metadata.download_path)
            .await
            .map_err(download_error)?;

        if let Some(content_length) = download.content_length {
            if content_length > limit {
                return Err(TransferError::SizeExceeded {
                    file_name,
                    size: content_length,
                    limit,
                    checkpoint: SizeCheckpoint::ContentLength,
                });
            }
        }

        let mut buffer = self.pool.acquire();
        loop {
            let chunk = match download.body.next_chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(source) => {
                    self.pool.release(buffer);
                    return Err(download_error(source));
                }
            };

            let size = (buffer.len() + chunk.len()) as u64;
            let appended = if size > limit {
                Err(size)
            } else {
                buffer
                    .extend_from_slice(&chunk)
                    .map_err(|overflow| overflow.attempted as u64)
            };
            if let Err(size) = appended {
                self.pool.release(buffer);
                return Err(TransferError::SizeExceeded {
                    file_name,
                    size,
                    limit,
                    checkpoint: SizeCheckpoint::ActualBytes,
                });
            }
        }

        if buffer.is_empty() {
            self.pool.release(buffer);
            return Err(TransferError::EmptyFile(file_name));
        }

        let mime_type = self
            .mime
            .resolve(&file_name, metadata.mime_hint.as_deref());
        if !self.config.is_mime_allowed(&mime_type) {
            self.pool.release(buffer);
            return Err(TransferError::UnsupportedType {
                file_name,
                mime_type,
            });
        }

        Ok(FileBuffer::new(
            file_reference.to_string(),
            file_name,
            mime_type,
            buffer,
        ))
    }
}
