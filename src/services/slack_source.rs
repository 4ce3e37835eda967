use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header, Client, Response};
use serde::Deserialize;
use tracing::debug;

use crate::{
    application::services::{Download, DownloadBody, SourcePlatform},
    domain::{config::SlackSecrets, models::file::SourceFileMetadata},
    services::error::PlatformError,
};

#[derive(Debug, Deserialize)]
struct FilesInfoResponse {
    ok: bool,
    error: Option<String>,
    file: Option<SlackFile>,
}

#[derive(Debug, Deserialize)]
struct SlackFile {
    name: Option<String>,
    mimetype: Option<String>,
    size: Option<u64>,
    url_private_download: Option<String>,
    url_private: Option<String>,
}

/// Reads files shared in Slack through `files.info` and the private download URL.
pub struct SlackFileSource {
    client: Client,
    api_base: String,
    bot_token: String,
}

impl SlackFileSource {
    pub fn new(secrets: SlackSecrets) -> Self {
        Self {
            client: Client::new(),
            api_base: secrets.api_base.trim_end_matches('/').to_string(),
            bot_token: secrets.bot_token,
        }
    }

    fn map_api_error(file_reference: &str, code: &str) -> PlatformError {
        match code {
            "file_not_found" | "file_deleted" => PlatformError::NotFound(file_reference.to_string()),
            "not_authed" | "invalid_auth" | "account_inactive" | "token_revoked"
            | "missing_scope" => PlatformError::Unauthorized(code.to_string()),
            "ratelimited" | "internal_error" | "fatal_error" | "service_unavailable"
            | "request_timeout" => PlatformError::ProviderError(code.to_string()),
            other => PlatformError::InvalidRequest(other.to_string()),
        }
    }
}

struct ResponseBody(Response);

#[async_trait]
impl DownloadBody for ResponseBody {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, PlatformError> {
        self.0.chunk().await.map_err(PlatformError::from)
    }
}

#[async_trait]
impl SourcePlatform for SlackFileSource {
    async fn get_file_metadata(
        &self,
        file_reference: &str,
    ) -> Result<SourceFileMetadata, PlatformError> {
        if file_reference.trim().is_empty() {
            return Err(PlatformError::InvalidRequest(
                "File reference is empty".to_string(),
            ));
        }

        let url = format!("{}/files.info", self.api_base);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.bot_token)
            .query(&[("file", file_reference)])
            .send()
            .await
            .map_err(PlatformError::from)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Status { status, body });
        }

        let info: FilesInfoResponse = response.json().await.map_err(PlatformError::from)?;

        if !info.ok {
            let code = info.error.unwrap_or_else(|| "unknown_error".to_string());
            return Err(Self::map_api_error(file_reference, &code));
        }

        let file = info.file.ok_or_else(|| {
            PlatformError::InvalidMetadata(format!("files.info for {} has no file", file_reference))
        })?;

        let download_path = file
            .url_private_download
            .or(file.url_private)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                PlatformError::InvalidMetadata(format!(
                    "File {} has no download URL",
                    file_reference
                ))
            })?;

        debug!(reference = file_reference, size = ?file.size, "Resolved Slack file metadata");

        Ok(SourceFileMetadata {
            download_path,
            reported_size: file.size,
            file_name: file.name,
            mime_hint: file.mimetype,
        })
    }

    async fn download(&self, download_path: &str) -> Result<Download, PlatformError> {
        let response = self
            .client
            .get(download_path)
            .bearer_auth(&self.bot_token)
            .send()
            .await
            .map_err(PlatformError::from)?;

        match response.status().as_u16() {
            404 => return Err(PlatformError::NotFound(download_path.to_string())),
            401 | 403 => {
                return Err(PlatformError::Unauthorized(format!(
                    "Download refused with status: {}",
                    response.status()
                )))
            }
            _ => {}
        }

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Status { status, body });
        }

        // Slack answers an unauthorised private download with its HTML sign-in page.
        let is_html = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"));
        if is_html {
            return Err(PlatformError::Unauthorized(
                "Download returned an HTML page instead of file content".to_string(),
            ));
        }

        Ok(Download {
            content_length: response.content_length(),
            body: Box::new(ResponseBody(response)),
        })
    }
}
