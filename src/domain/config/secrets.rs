use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SlackSecrets {
    #[serde(rename = "botToken")]
    pub bot_token: String,
    #[serde(rename = "apiBase")]
    pub api_base: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatwootSecrets {
    #[serde(rename = "baseUrl")]
    pub base_url: String,
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "apiToken")]
    pub api_token: String,
}

/// Shared secret callers present in the `X-Relay-Secret` header.
#[derive(Debug, Clone)]
pub struct ApiSecret(pub Arc<str>);

#[derive(Debug, Clone)]
pub struct Secrets {
    pub slack: SlackSecrets,
    pub chatwoot: ChatwootSecrets,
    pub api_secret: ApiSecret,
}

impl Secrets {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        Ok(Self {
            slack: SlackSecrets {
                bot_token: required("SLACK_BOT_TOKEN")?,
                api_base: lookup("SLACK_API_BASE")
                    .unwrap_or_else(|| DEFAULT_SLACK_API_BASE.to_string()),
            },
            chatwoot: ChatwootSecrets {
                base_url: required("CHATWOOT_BASE_URL")?,
                account_id: required("CHATWOOT_ACCOUNT_ID")?,
                api_token: required("CHATWOOT_API_TOKEN")?,
            },
            api_secret: ApiSecret(Arc::from(required("RELAY_API_SECRET")?)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_is_reported_by_name() {
        let err = Secrets::from_lookup(|key| match key {
            "CHATWOOT_BASE_URL" => Some("https://desk.example.com".to_string()),
            _ => None,
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SLACK_BOT_TOKEN")));
    }

    #[test]
    fn slack_api_base_defaults() {
        let secrets = Secrets::from_lookup(|key| match key {
            "SLACK_API_BASE" => None,
            other => Some(format!("value-for-{other}")),
        })
        .unwrap();
        assert_eq!(secrets.slack.api_base, DEFAULT_SLACK_API_BASE);
        assert_eq!(&*secrets.api_secret.0, "value-for-RELAY_API_SECRET");
    }
}
