use axum::extract::FromRef;
use std::sync::Arc;

use crate::{
    application::pipeline::{BatchProcessor, BufferPool},
    domain::config::{ApiSecret, TransferConfig},
};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub processor: Arc<BatchProcessor>,
    pub transfer_config: Arc<TransferConfig>,
    pub buffer_pool: Arc<BufferPool>,
    pub api_secret: ApiSecret,
}
