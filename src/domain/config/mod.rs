pub mod error;
pub mod secrets;
pub mod transfer;

pub use secrets::{ApiSecret, ChatwootSecrets, Secrets, SlackSecrets};
pub use transfer::TransferConfig;
