use std::{fmt, time::Duration};

use thiserror::Error;

use crate::services::PlatformError;

#[derive(Debug)]
pub enum ApplicationError {
    BadRequest(String),
    InternalError(String),
}

/// Where a file size was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeCheckpoint {
    ReportedSize,
    ContentLength,
    ActualBytes,
}

impl fmt::Display for SizeCheckpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SizeCheckpoint::ReportedSize => "reported size",
            SizeCheckpoint::ContentLength => "content-length header",
            SizeCheckpoint::ActualBytes => "downloaded bytes",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Invalid batch: {0}")]
    InvalidBatch(String),

    #[error("Download failed for {reference}: {source}")]
    Download {
        reference: String,
        #[source]
        source: PlatformError,
    },

    #[error("File '{file_name}' exceeds the {limit} byte limit ({size} bytes by {checkpoint})")]
    SizeExceeded {
        file_name: String,
        size: u64,
        limit: u64,
        checkpoint: SizeCheckpoint,
    },

    #[error("File '{0}' is empty")]
    EmptyFile(String),

    #[error("File type '{mime_type}' of '{file_name}' is not allowed")]
    UnsupportedType { file_name: String, mime_type: String },

    #[error("Upload rejected with status {status}: {body}")]
    Upload { status: u16, body: String },

    #[error("Upload failed: {0}")]
    UploadTransport(#[source] PlatformError),

    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

impl TransferError {
    pub fn is_retryable(&self) -> bool {
        match self {
            TransferError::Download { source, .. } => source.is_transient(),
            TransferError::UploadTransport(source) => source.is_transient(),
            TransferError::Upload { .. } | TransferError::Timeout { .. } => true,
            TransferError::InvalidBatch(_)
            | TransferError::SizeExceeded { .. }
            | TransferError::EmptyFile(_)
            | TransferError::UnsupportedType { .. } => false,
        }
    }
}

impl From<TransferError> for ApplicationError {
    fn from(error: TransferError) -> Self {
        match error {
            TransferError::InvalidBatch(msg) => ApplicationError::BadRequest(msg),
            other => ApplicationError::InternalError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_size_and_type_errors_are_final() {
        assert!(!TransferError::InvalidBatch("empty".into()).is_retryable());
        assert!(!TransferError::EmptyFile("a.png".into()).is_retryable());
        assert!(!TransferError::SizeExceeded {
            file_name: "a.png".into(),
            size: 20,
            limit: 10,
            checkpoint: SizeCheckpoint::ContentLength,
        }
        .is_retryable());
        assert!(!TransferError::UnsupportedType {
            file_name: "a.exe".into(),
            mime_type: "application/x-msdownload".into(),
        }
        .is_retryable());
    }

    #[test]
    fn network_failures_are_retryable() {
        assert!(TransferError::Upload {
            status: 503,
            body: "busy".into()
        }
        .is_retryable());
        assert!(TransferError::Timeout {
            operation: "download",
            timeout: Duration::from_secs(1),
        }
        .is_retryable());
        assert!(TransferError::Download {
            reference: "F1".into(),
            source: PlatformError::NetworkError("reset".into()),
        }
        .is_retryable());
        assert!(!TransferError::Download {
            reference: "F1".into(),
            source: PlatformError::NotFound("F1".into()),
        }
        .is_retryable());
    }

    #[test]
    fn only_batch_validation_maps_to_bad_request() {
        let err: ApplicationError = TransferError::InvalidBatch("no files".into()).into();
        assert!(matches!(err, ApplicationError::BadRequest(msg) if msg == "no files"));

        let err: ApplicationError = TransferError::EmptyFile("a".into()).into();
        assert!(matches!(err, ApplicationError::InternalError(_)));
    }
}
