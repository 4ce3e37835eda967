use std::sync::Arc;

use tracing::info;

use crate::{
    application::{
        error::TransferError,
        pipeline::{buffer_pool::BufferPool, monitor::PerformanceMonitor, retry::RetryExecutor},
        services::{DestinationPlatform, OutgoingMessage},
    },
    domain::{
        config::TransferConfig,
        models::file::{FileBuffer, PostedMessage, SenderIdentity},
    },
    services::PlatformError,
};

/// Sent when the caller has no text of its own; the destination refuses empty bodies.
pub const DEFAULT_ATTACHMENT_MESSAGE: &str = "Attachment shared from chat";

/// Delivers one loaded file to the destination platform.
pub struct Uploader {
    destination: Arc<dyn DestinationPlatform>,
    pool: Arc<BufferPool>,
    config: Arc<TransferConfig>,
    retry: RetryExecutor,
    monitor: PerformanceMonitor,
}

impl Uploader {
    pub fn new(
        destination: Arc<dyn DestinationPlatform>,
        pool: Arc<BufferPool>,
        config: Arc<TransferConfig>,
        retry: RetryExecutor,
        monitor: PerformanceMonitor,
    ) -> Self {
        Self {
            destination,
            pool,
            config,
            retry,
            monitor,
        }
    }

    /// Takes ownership of the file; its buffer is wiped and handed back to the
    /// pool whatever the outcome.
    pub async fn upload(
        &self,
        mut file: FileBuffer,
        conversation_ref: &str,
        message: Option<&str>,
        sender: Option<&SenderIdentity>,
    ) -> Result<PostedMessage, TransferError> {
        if !self.config.is_mime_allowed(&file.mime_type) {
            let err = TransferError::UnsupportedType {
                file_name: file.file_name.clone(),
                mime_type: file.mime_type.clone(),
            };
            self.pool.release(file.into_buffer());
            return Err(err);
        }

        let outgoing = OutgoingMessage {
            text_body: message
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .unwrap_or(DEFAULT_ATTACHMENT_MESSAGE)
                .to_string(),
            sender: sender.cloned(),
        };

        let (result, _) = self
            .monitor
            .measure(
                "file_upload",
                &file.file_name,
                self.retry
                    .execute("upload", |_| self.send_once(conversation_ref, &outgoing, &file)),
            )
            .await;

        if let Ok(posted) = &result {
            file.zero();
            info!(
                conversation = conversation_ref,
                reference = %file.reference,
                file_name = %file.file_name,
                message_id = %posted.message_id,
                "File uploaded"
            );
        }

        self.pool.release(file.into_buffer());
        result
    }

    async fn send_once(
        &self,
        conversation_ref: &str,
        message: &OutgoingMessage,
        file: &FileBuffer,
    ) -> Result<PostedMessage, TransferError> {
        let timeout = self.config.upload_timeout();
        let send = self.destination.post_message_with_attachment(
            conversation_ref,
            message,
            file.bytes(),
            &file.file_name,
            &file.mime_type,
        );

        match tokio::time::timeout(timeout, send).await {
            Ok(Ok(posted)) => Ok(posted),
            Ok(Err(PlatformError::Status { status, body })) => {
                Err(TransferError::Upload { status, body })
            }
            Ok(Err(other)) => Err(TransferError::UploadTransport(other)),
            Err(_) => Err(TransferError::Timeout {
                operation: "upload",
                timeout,
            }),
        }
    }
}
