use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        error::TransferError,
        pipeline::{
            buffer_pool::BufferPool,
            file_loader::FileLoader,
            monitor::{MemoryProbe, PerformanceMonitor},
            retry::RetryExecutor,
            uploader::Uploader,
        },
        services::{DestinationPlatform, SourcePlatform},
    },
    domain::{
        config::TransferConfig,
        models::{
            batch::BatchResult,
            file::{PostedMessage, SenderIdentity},
        },
    },
};

/// Moves a batch of files from the source to the destination, one file at a time.
pub struct BatchProcessor {
    loader: FileLoader,
    uploader: Uploader,
    pool: Arc<BufferPool>,
    config: Arc<TransferConfig>,
    monitor: PerformanceMonitor,
}

impl BatchProcessor {
    pub fn new(
        source: Arc<dyn SourcePlatform>,
        destination: Arc<dyn DestinationPlatform>,
        pool: Arc<BufferPool>,
        config: Arc<TransferConfig>,
        memory_probe: Arc<dyn MemoryProbe>,
    ) -> Self {
        let retry = RetryExecutor::from_config(&config);
        let monitor = PerformanceMonitor::new(config.slow_operation_threshold(), memory_probe);

        debug!(
            max_concurrent_files = config.max_concurrent_files,
            "Batch pipeline runs files sequentially"
        );

        Self {
            loader: FileLoader::new(
                source,
                pool.clone(),
                config.clone(),
                retry,
                monitor.clone(),
            ),
            uploader: Uploader::new(
                destination,
                pool.clone(),
                config.clone(),
                retry,
                monitor.clone(),
            ),
            pool,
            config,
            monitor,
        }
    }

    pub fn validate(
        &self,
        file_references: &[String],
        conversation_ref: &str,
    ) -> Result<(), TransferError> {
        if file_references.is_empty() {
            return Err(TransferError::InvalidBatch(
                "No files to process".to_string(),
            ));
        }
        if file_references.len() > self.config.max_files {
            return Err(TransferError::InvalidBatch(format!(
                "Too many files: {} (maximum {})",
                file_references.len(),
                self.config.max_files
            )));
        }
        if conversation_ref.trim().is_empty() {
            return Err(TransferError::InvalidBatch(
                "Conversation reference is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Fails only when the batch itself is invalid; per-file failures are
    /// collected in the result.
    pub async fn process_batch(
        &self,
        file_references: &[String],
        conversation_ref: &str,
        message: Option<&str>,
        sender: Option<&SenderIdentity>,
    ) -> Result<BatchResult, TransferError> {
        self.validate(file_references, conversation_ref)?;

        let batch_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            %batch_id,
            files = file_references.len(),
            conversation = conversation_ref,
            "Processing attachment batch"
        );

        let mut succeeded = 0;
        let mut errors = Vec::new();

        for (index, reference) in file_references.iter().enumerate() {
            match self
                .transfer_one(reference, conversation_ref, message, sender)
                .await
            {
                Ok(posted) => {
                    succeeded += 1;
                    debug!(
                        %batch_id,
                        index,
                        reference = %reference,
                        message_id = %posted.message_id,
                        "File transferred"
                    );
                }
                Err(err) => {
                    warn!(%batch_id, index, reference = %reference, error = %err, "File transfer failed");
                    errors.push(format!("{}: {}", reference, err));
                }
            }
        }

        let result = BatchResult {
            batch_id,
            succeeded,
            total: file_references.len(),
            errors,
            elapsed_ms: started.elapsed().as_millis() as u64,
        };

        if result.is_success() {
            info!(%batch_id, total = result.total, elapsed_ms = result.elapsed_ms, "Batch completed");
        } else {
            warn!(
                %batch_id,
                succeeded = result.succeeded,
                total = result.total,
                failed = result.errors.len(),
                elapsed_ms = result.elapsed_ms,
                "Batch completed with failures"
            );
        }

        self.relieve_memory_pressure(batch_id);
        Ok(result)
    }

    async fn transfer_one(
        &self,
        reference: &str,
        conversation_ref: &str,
        message: Option<&str>,
        sender: Option<&SenderIdentity>,
    ) -> Result<PostedMessage, TransferError> {
        let file = self.loader.load(reference).await?;
        self.uploader
            .upload(file, conversation_ref, message, sender)
            .await
    }

    fn relieve_memory_pressure(&self, batch_id: Uuid) {
        let resident = self.monitor.memory_probe().resident_bytes();
        if resident > self.config.memory_threshold {
            let released = self.pool.cleanup();
            warn!(
                %batch_id,
                resident,
                threshold = self.config.memory_threshold,
                released,
                "Memory threshold exceeded, released pooled buffers"
            );
        }
    }
}
