pub mod destination_platform;
pub mod source_platform;

pub use destination_platform::{DestinationPlatform, OutgoingMessage};
pub use source_platform::{Download, DownloadBody, SourcePlatform};
