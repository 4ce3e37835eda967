use async_trait::async_trait;

use crate::{
    domain::models::file::{PostedMessage, SenderIdentity},
    services::PlatformError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text_body: String,
    pub sender: Option<SenderIdentity>,
}

/// The ticketing backend files are delivered to.
#[async_trait]
pub trait DestinationPlatform: Send + Sync {
    async fn post_message_with_attachment(
        &self,
        conversation_ref: &str,
        message: &OutgoingMessage,
        attachment: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> Result<PostedMessage, PlatformError>;
}
