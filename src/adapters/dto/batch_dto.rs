use serde::{Deserialize, Serialize};

use crate::domain::models::{batch::BatchResult, file::SenderIdentity};

pub const MAX_REPORTED_ERRORS: usize = 5;
pub const MAX_REPORTED_ERROR_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
pub struct CreateBatchRequest {
    #[serde(rename = "fileReferences")]
    pub file_references: Vec<String>,
    #[serde(rename = "conversationRef")]
    pub conversation_ref: String,
    pub message: Option<String>,
    pub sender: Option<SenderIdentity>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    #[serde(rename = "batchId")]
    pub batch_id: String,
    pub success: bool,
    pub succeeded: usize,
    pub total: usize,
    pub errors: Vec<String>,
    #[serde(rename = "elapsedMs")]
    pub elapsed_ms: u64,
}

impl From<BatchResult> for BatchResponse {
    fn from(result: BatchResult) -> Self {
        Self {
            batch_id: result.batch_id.to_string(),
            success: result.is_success(),
            succeeded: result.succeeded,
            total: result.total,
            errors: result.user_facing_errors(MAX_REPORTED_ERRORS, MAX_REPORTED_ERROR_CHARS),
            elapsed_ms: result.elapsed_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn request_accepts_optional_fields() {
        let request: CreateBatchRequest = serde_json::from_value(json!({
            "fileReferences": ["F1", "F2"],
            "conversationRef": "42",
            "sender": { "name": "Dana" }
        }))
        .unwrap();

        assert_eq!(request.file_references, vec!["F1", "F2"]);
        assert_eq!(request.conversation_ref, "42");
        assert!(request.message.is_none());
        assert_eq!(request.sender.unwrap().name, "Dana");
    }

    #[test]
    fn response_caps_reported_errors() {
        let long = "x".repeat(500);
        let result = BatchResult {
            batch_id: Uuid::nil(),
            succeeded: 0,
            total: 8,
            errors: (0..8).map(|i| format!("F{}: {}", i, long)).collect(),
            elapsed_ms: 40,
        };

        let response = serde_json::to_value(BatchResponse::from(result)).unwrap();

        assert_eq!(response["success"], false);
        assert_eq!(response["total"], 8);
        assert_eq!(response["elapsedMs"], 40);
        let errors = response["errors"].as_array().unwrap();
        assert_eq!(errors.len(), MAX_REPORTED_ERRORS);
        assert!(errors
            .iter()
            .all(|e| e.as_str().unwrap().chars().count() == MAX_REPORTED_ERROR_CHARS));
    }
}
