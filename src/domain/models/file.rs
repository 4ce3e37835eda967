use serde::{Deserialize, Serialize};

use super::buffer::PooledBuffer;

/// One file's bytes after download and validation, ready for upload.
#[derive(Debug)]
pub struct FileBuffer {
    pub reference: String,
    pub file_name: String,
    pub mime_type: String,
    buffer: PooledBuffer,
}

impl FileBuffer {
    pub fn new(
        reference: String,
        file_name: String,
        mime_type: String,
        buffer: PooledBuffer,
    ) -> Self {
        Self {
            reference,
            file_name,
            mime_type,
            buffer,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn size(&self) -> u64 {
        self.buffer.len() as u64
    }

    pub fn zero(&mut self) {
        self.buffer.zero();
    }

    pub fn into_buffer(self) -> PooledBuffer {
        self.buffer
    }
}

/// What the source platform knows about a file before it is downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFileMetadata {
    pub download_path: String,
    pub reported_size: Option<u64>,
    pub file_name: Option<String>,
    pub mime_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderIdentity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub message_id: String,
}
