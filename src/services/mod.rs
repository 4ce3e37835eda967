mod chatwoot_destination;
mod error;
mod slack_source;

pub use chatwoot_destination::ChatwootDestination;
pub use error::PlatformError;
pub use slack_source::SlackFileSource;

use std::sync::Arc;

use crate::{
    application::services::{DestinationPlatform, SourcePlatform},
    domain::config::Secrets,
};

pub fn create_platforms(
    secrets: &Secrets,
) -> (Arc<dyn SourcePlatform>, Arc<dyn DestinationPlatform>) {
    let source = Arc::new(SlackFileSource::new(secrets.slack.clone())) as Arc<dyn SourcePlatform>;
    let destination = Arc::new(ChatwootDestination::new(secrets.chatwoot.clone()))
        as Arc<dyn DestinationPlatform>;
    (source, destination)
}
