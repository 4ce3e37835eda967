use axum::{extract::State, http::StatusCode, Json};
use tracing::info;

use crate::{
    adapters::{
        dto::batch_dto::{BatchResponse, CreateBatchRequest},
        state::AppState,
    },
    application::error::ApplicationError,
};

pub struct TransferController;

impl TransferController {
    /// Transfers every referenced file into the target conversation
    /// POST /api/v1/batches
    pub async fn create_batch(
        State(app_state): State<AppState>,
        Json(body): Json<CreateBatchRequest>,
    ) -> Result<(StatusCode, Json<BatchResponse>), ApplicationError> {
        info!(
            files = body.file_references.len(),
            conversation = %body.conversation_ref,
            "Batch transfer requested"
        );

        let result = app_state
            .processor
            .process_batch(
                &body.file_references,
                &body.conversation_ref,
                body.message.as_deref(),
                body.sender.as_ref(),
            )
            .await?;

        Ok((StatusCode::OK, Json(BatchResponse::from(result))))
    }
}
