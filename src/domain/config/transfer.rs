use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

const MIB: u64 = 1024 * 1024;

/// Content types accepted by default when `RELAY_ALLOWED_MIME_TYPES` is unset.
pub const DEFAULT_ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/bmp",
    "image/tiff",
    "image/heic",
    "application/pdf",
    "text/plain",
    "text/csv",
    "application/json",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-powerpoint",
    "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    "application/zip",
    "audio/mpeg",
    "audio/wav",
    "video/mp4",
    "video/quicktime",
];

/// Limits and budgets for the attachment pipeline.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TransferConfig {
    #[serde(rename = "maxFileSize")]
    pub max_file_size: u64,
    #[serde(rename = "maxFiles")]
    pub max_files: usize,
    #[serde(rename = "downloadTimeoutMs")]
    pub download_timeout_ms: u64,
    #[serde(rename = "uploadTimeoutMs")]
    pub upload_timeout_ms: u64,
    /// Retries after the first attempt.
    #[serde(rename = "retryAttempts")]
    pub retry_attempts: u32,
    #[serde(rename = "retryBackoffMs")]
    pub retry_backoff_ms: u64,
    /// Resident memory (bytes) above which idle pooled buffers are released after a batch.
    #[serde(rename = "memoryThreshold")]
    pub memory_threshold: u64,
    /// Reserved for parallel batching; the default loop is sequential.
    #[serde(rename = "maxConcurrentFiles")]
    pub max_concurrent_files: usize,
    #[serde(rename = "bufferPoolSize")]
    pub buffer_pool_size: usize,
    #[serde(rename = "allowedMimeTypes")]
    pub allowed_mime_types: Vec<String>,
    #[serde(rename = "maxFileNameLength")]
    pub max_file_name_length: usize,
    #[serde(rename = "slowOperationThresholdMs")]
    pub slow_operation_threshold_ms: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * MIB,
            max_files: 10,
            download_timeout_ms: 30_000,
            upload_timeout_ms: 60_000,
            retry_attempts: 3,
            retry_backoff_ms: 1_000,
            memory_threshold: 512 * MIB,
            max_concurrent_files: 3,
            buffer_pool_size: 5,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_file_name_length: 255,
            slow_operation_threshold_ms: 5_000,
        }
    }
}

impl TransferConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup, falling back to the defaults
    /// for every key that is absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let allowed_mime_types = match lookup("RELAY_ALLOWED_MIME_TYPES") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_ascii_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.allowed_mime_types,
        };

        let config = Self {
            max_file_size: parse_or(&lookup, "RELAY_MAX_FILE_SIZE", defaults.max_file_size)?,
            max_files: parse_or(&lookup, "RELAY_MAX_FILES", defaults.max_files)?,
            download_timeout_ms: parse_or(
                &lookup,
                "RELAY_DOWNLOAD_TIMEOUT_MS",
                defaults.download_timeout_ms,
            )?,
            upload_timeout_ms: parse_or(
                &lookup,
                "RELAY_UPLOAD_TIMEOUT_MS",
                defaults.upload_timeout_ms,
            )?,
            retry_attempts: parse_or(&lookup, "RELAY_RETRY_ATTEMPTS", defaults.retry_attempts)?,
            retry_backoff_ms: parse_or(
                &lookup,
                "RELAY_RETRY_BACKOFF_MS",
                defaults.retry_backoff_ms,
            )?,
            memory_threshold: parse_or(
                &lookup,
                "RELAY_MEMORY_THRESHOLD",
                defaults.memory_threshold,
            )?,
            max_concurrent_files: parse_or(
                &lookup,
                "RELAY_MAX_CONCURRENT_FILES",
                defaults.max_concurrent_files,
            )?,
            buffer_pool_size: parse_or(
                &lookup,
                "RELAY_BUFFER_POOL_SIZE",
                defaults.buffer_pool_size,
            )?,
            allowed_mime_types,
            max_file_name_length: parse_or(
                &lookup,
                "RELAY_MAX_FILE_NAME_LENGTH",
                defaults.max_file_name_length,
            )?,
            slow_operation_threshold_ms: parse_or(
                &lookup,
                "RELAY_SLOW_OPERATION_MS",
                defaults.slow_operation_threshold_ms,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_size == 0 {
            return Err(ConfigError::Zero("RELAY_MAX_FILE_SIZE"));
        }
        if self.max_files == 0 {
            return Err(ConfigError::Zero("RELAY_MAX_FILES"));
        }
        if self.download_timeout_ms == 0 {
            return Err(ConfigError::Zero("RELAY_DOWNLOAD_TIMEOUT_MS"));
        }
        if self.upload_timeout_ms == 0 {
            return Err(ConfigError::Zero("RELAY_UPLOAD_TIMEOUT_MS"));
        }
        if self.max_concurrent_files == 0 {
            return Err(ConfigError::Zero("RELAY_MAX_CONCURRENT_FILES"));
        }
        if self.max_file_name_length == 0 {
            return Err(ConfigError::Zero("RELAY_MAX_FILE_NAME_LENGTH"));
        }
        if self.allowed_mime_types.is_empty() {
            return Err(ConfigError::Zero("RELAY_ALLOWED_MIME_TYPES"));
        }
        Ok(())
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_millis(self.download_timeout_ms)
    }

    pub fn upload_timeout(&self) -> Duration {
        Duration::from_millis(self.upload_timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn slow_operation_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_operation_threshold_ms)
    }

    pub fn is_mime_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime_type))
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
            key,
            value: raw,
        }),
        None => Ok(default),
    }
}
