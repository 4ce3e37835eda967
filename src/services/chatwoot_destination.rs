use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;

use crate::{
    application::services::{DestinationPlatform, OutgoingMessage},
    domain::{config::ChatwootSecrets, models::file::PostedMessage},
    services::error::PlatformError,
};

#[derive(Debug, Deserialize)]
struct CreatedMessage {
    id: serde_json::Value,
}

/// Posts attachments into Chatwoot conversations as incoming messages.
pub struct ChatwootDestination {
    client: Client,
    base_url: String,
    account_id: String,
    api_token: String,
}

impl ChatwootDestination {
    pub fn new(secrets: ChatwootSecrets) -> Self {
        Self {
            client: Client::new(),
            base_url: secrets.base_url.trim_end_matches('/').to_string(),
            account_id: secrets.account_id,
            api_token: secrets.api_token,
        }
    }

    fn is_safe_path_segment(value: &str) -> bool {
        !value.is_empty()
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

#[async_trait]
impl DestinationPlatform for ChatwootDestination {
    async fn post_message_with_attachment(
        &self,
        conversation_ref: &str,
        message: &OutgoingMessage,
        attachment: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> Result<PostedMessage, PlatformError> {
        if !Self::is_safe_path_segment(conversation_ref) {
            return Err(PlatformError::InvalidRequest(format!(
                "Invalid conversation reference: {}",
                conversation_ref
            )));
        }

        let file_part = multipart::Part::bytes(attachment.to_vec())
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| PlatformError::InternalError(e.to_string()))?;

        let mut form = multipart::Form::new()
            .text("content", message.text_body.clone())
            .text("message_type", "incoming")
            .text("private", "false")
            .part("attachments[]", file_part);

        if let Some(sender) = &message.sender {
            let attributes = serde_json::json!({
                "sender_name": sender.name,
                "sender_email": sender.email,
            });
            form = form.text("content_attributes", attributes.to_string());
        }

        let url = format!(
            "{}/api/v1/accounts/{}/conversations/{}/messages",
            self.base_url, self.account_id, conversation_ref
        );

        let response = self
            .client
            .post(&url)
            .header("api_access_token", &self.api_token)
            .multipart(form)
            .send()
            .await
            .map_err(PlatformError::from)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Status { status, body });
        }

        let created: CreatedMessage = response.json().await.map_err(PlatformError::from)?;

        let message_id = match created.id {
            serde_json::Value::String(id) => id,
            other => other.to_string(),
        };

        Ok(PostedMessage { message_id })
    }
}
