use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;

use crate::{
    application::{
        pipeline::monitor::{MemoryProbe, PerformanceMonitor},
        services::{DestinationPlatform, Download, DownloadBody, OutgoingMessage, SourcePlatform},
    },
    domain::{
        config::TransferConfig,
        models::file::{PostedMessage, SourceFileMetadata},
    },
    services::PlatformError,
};

pub struct FixedProbe(pub u64);

impl MemoryProbe for FixedProbe {
    fn resident_bytes(&self) -> u64 {
        self.0
    }
}

pub fn quiet_monitor() -> PerformanceMonitor {
    PerformanceMonitor::new(Duration::from_secs(60), Arc::new(FixedProbe(1024)))
}

pub fn test_config() -> TransferConfig {
    TransferConfig {
        max_file_size: 1024,
        max_files: 5,
        download_timeout_ms: 500,
        upload_timeout_ms: 500,
        retry_attempts: 2,
        retry_backoff_ms: 1,
        buffer_pool_size: 2,
        ..TransferConfig::default()
    }
}

#[derive(Clone)]
pub struct FakeFile {
    pub name: Option<String>,
    pub mime_hint: Option<String>,
    pub reported_size: Option<u64>,
    pub content_length: Option<u64>,
    pub chunks: Vec<Vec<u8>>,
    pub has_download_path: bool,
    /// Leading download attempts that fail with a transient network error.
    pub transient_failures: usize,
    pub download_delay: Option<Duration>,
}

impl FakeFile {
    pub fn new(name: &str, bytes: Vec<u8>) -> Self {
        let len = bytes.len() as u64;
        Self {
            name: Some(name.to_string()),
            mime_hint: None,
            reported_size: Some(len),
            content_length: Some(len),
            chunks: bytes.chunks(100).map(|c| c.to_vec()).collect(),
            has_download_path: true,
            transient_failures: 0,
            download_delay: None,
        }
    }
}

struct ChunkBody(VecDeque<Vec<u8>>);

#[async_trait]
impl DownloadBody for ChunkBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, PlatformError> {
        Ok(self.0.pop_front().map(Bytes::from))
    }
}

#[derive(Default)]
pub struct FakeSource {
    files: Mutex<HashMap<String, FakeFile>>,
    pub metadata_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
}

impl FakeSource {
    pub fn with_files(files: Vec<(&str, FakeFile)>) -> Self {
        Self {
            files: Mutex::new(
                files
                    .into_iter()
                    .map(|(reference, file)| (reference.to_string(), file))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn downloads(&self) -> usize {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn metadata_lookups(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SourcePlatform for FakeSource {
    async fn get_file_metadata(
        &self,
        file_reference: &str,
    ) -> Result<SourceFileMetadata, PlatformError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        let files = self.files.lock().unwrap();
        let file = files
            .get(file_reference)
            .ok_or_else(|| PlatformError::NotFound(file_reference.to_string()))?;
        if !file.has_download_path {
            return Err(PlatformError::InvalidMetadata(format!(
                "File {} has no download URL",
                file_reference
            )));
        }
        Ok(SourceFileMetadata {
            download_path: format!("https://files.example.com/{}", file_reference),
            reported_size: file.reported_size,
            file_name: file.name.clone(),
            mime_hint: file.mime_hint.clone(),
        })
    }

    async fn download(&self, download_path: &str) -> Result<Download, PlatformError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        let reference = download_path.rsplit('/').next().unwrap_or_default();

        let (delay, file) = {
            let mut files = self.files.lock().unwrap();
            let file = files
                .get_mut(reference)
                .ok_or_else(|| PlatformError::NotFound(reference.to_string()))?;
            if file.transient_failures > 0 {
                file.transient_failures -= 1;
                return Err(PlatformError::NetworkError("connection reset".to_string()));
            }
            (file.download_delay.take(), file.clone())
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        Ok(Download {
            content_length: file.content_length,
            body: Box::new(ChunkBody(file.chunks.into_iter().collect())),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReceivedAttachment {
    pub conversation_ref: String,
    pub text_body: String,
    pub sender_name: Option<String>,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
pub struct FakeDestination {
    pub received: Mutex<Vec<ReceivedAttachment>>,
    /// File names the destination rejects on every attempt, with the status to answer.
    pub rejected: Mutex<HashMap<String, u16>>,
    /// Leading upload attempts (across all files) answered with 503.
    pub transient_failures: AtomicUsize,
    pub attempts: AtomicUsize,
}

impl FakeDestination {
    pub fn rejecting(file_name: &str, status: u16) -> Self {
        let destination = Self::default();
        destination
            .rejected
            .lock()
            .unwrap()
            .insert(file_name.to_string(), status);
        destination
    }

    pub fn received(&self) -> Vec<ReceivedAttachment> {
        self.received.lock().unwrap().clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DestinationPlatform for FakeDestination {
    async fn post_message_with_attachment(
        &self,
        conversation_ref: &str,
        message: &OutgoingMessage,
        attachment: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> Result<PostedMessage, PlatformError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let mut received = self.received.lock().unwrap();
        received.push(ReceivedAttachment {
            conversation_ref: conversation_ref.to_string(),
            text_body: message.text_body.clone(),
            sender_name: message.sender.as_ref().map(|s| s.name.clone()),
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes: attachment.to_vec(),
        });

        if let Some(status) = self.rejected.lock().unwrap().get(file_name) {
            return Err(PlatformError::Status {
                status: *status,
                body: format!("{{\"error\":\"{} refused\"}}", file_name),
            });
        }

        let pending = self.transient_failures.load(Ordering::SeqCst);
        if pending > 0 {
            self.transient_failures.store(pending - 1, Ordering::SeqCst);
            return Err(PlatformError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }

        Ok(PostedMessage {
            message_id: format!("msg-{}", received.len()),
        })
    }
}
