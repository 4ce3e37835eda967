use axum::{extract::State, Json};
use serde::Serialize;
use sysinfo::System;
use tracing::info;

use crate::adapters::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub limits: TransferLimits,
    #[serde(rename = "bufferPool")]
    pub buffer_pool: BufferPoolStatus,
    pub metrics: SystemMetrics,
}

#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    #[serde(rename = "cpuUsagePercent")]
    pub cpu_usage_percent: f32,
    #[serde(rename = "memoryUsedBytes")]
    pub memory_used_bytes: u64,
    #[serde(rename = "memoryTotalBytes")]
    pub memory_total_bytes: u64,
    #[serde(rename = "memoryUsagePercent")]
    pub memory_usage_percent: f32,
}

#[derive(Debug, Serialize)]
pub struct TransferLimits {
    #[serde(rename = "maxFileSize")]
    pub max_file_size: u64,
    #[serde(rename = "maxFiles")]
    pub max_files: usize,
    #[serde(rename = "retryAttempts")]
    pub retry_attempts: u32,
    #[serde(rename = "memoryThreshold")]
    pub memory_threshold: u64,
    #[serde(rename = "allowedMimeTypes")]
    pub allowed_mime_types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BufferPoolStatus {
    pub available: usize,
    #[serde(rename = "maxSize")]
    pub max_size: usize,
    #[serde(rename = "bufferCapacity")]
    pub buffer_capacity: usize,
}

pub struct HealthController;

impl HealthController {
    /// GET /api/v1/health
    pub async fn health_check(State(app_state): State<AppState>) -> Json<HealthResponse> {
        info!("Health check requested");

        let config = &app_state.transfer_config;
        let limits = TransferLimits {
            max_file_size: config.max_file_size,
            max_files: config.max_files,
            retry_attempts: config.retry_attempts,
            memory_threshold: config.memory_threshold,
            allowed_mime_types: config.allowed_mime_types.clone(),
        };

        let pool = &app_state.buffer_pool;
        let buffer_pool = BufferPoolStatus {
            available: pool.available(),
            max_size: pool.max_size(),
            buffer_capacity: pool.buffer_capacity(),
        };

        // Only refresh what's needed
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();

        let memory_used = sys.used_memory();
        let memory_total = sys.total_memory();
        let memory_usage_percent = if memory_total > 0 {
            (memory_used as f32 / memory_total as f32) * 100.0
        } else {
            0.0
        };

        Json(HealthResponse {
            status: "healthy".to_string(),
            limits,
            buffer_pool,
            metrics: SystemMetrics {
                cpu_usage_percent: sys.global_cpu_usage(),
                memory_used_bytes: memory_used,
                memory_total_bytes: memory_total,
                memory_usage_percent,
            },
        })
    }
}
