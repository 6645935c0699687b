//! Remote file retrieval.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::ProcessorConfig;
use crate::error::{ExtractError, ExtractResult};

/// Byte source for remote files.
#[async_trait]
pub trait FileSource: Send + Sync {
    /// Fetch the full content stored at `remote_path`.
    async fn download(&self, remote_path: &str) -> ExtractResult<Vec<u8>>;
}

/// Downloads files from the Telegram Bot API file endpoint.
///
/// One `GET {base}/file/bot{token}/{remote_path}` per call, no retry and
/// no caching. The token never appears in logs.
pub struct TelegramFileSource {
    client: Client,
    base_url: String,
    token: SecretString,
}

#[derive(Debug, Deserialize)]
struct GetFileResponse {
    ok: bool,
    #[serde(default)]
    result: Option<TelegramFile>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TelegramFile {
    #[serde(default)]
    file_path: Option<String>,
}

impl TelegramFileSource {
    /// Create a source with its own HTTP client.
    pub fn new(base_url: impl Into<String>, token: SecretString) -> Self {
        Self::with_client(Client::new(), base_url, token)
    }

    /// Create a source sharing an existing HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>, token: SecretString) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            token,
        }
    }

    /// Create a source from processor configuration.
    pub fn from_config(config: &ProcessorConfig) -> Self {
        Self::new(
            config.api_base_url.clone(),
            SecretString::new(config.bot_token.expose_secret().clone()),
        )
    }

    fn file_url(&self, remote_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.base_url,
            self.token.expose_secret(),
            remote_path.trim_start_matches('/')
        )
    }

    /// Resolve a Telegram `file_id` to the remote path used by [`FileSource::download`].
    pub async fn resolve_file_path(&self, file_id: &str) -> ExtractResult<String> {
        let url = format!("{}/bot{}/getFile", self.base_url, self.token.expose_secret());

        let response = self
            .client
            .get(&url)
            .query(&[("file_id", file_id)])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(file_id, error = %e.without_url(), "getFile request failed");
                ExtractError::DownloadFailed
            })?;

        if !response.status().is_success() {
            tracing::error!(file_id, status = %response.status(), "getFile returned non-success status");
            return Err(ExtractError::DownloadFailed);
        }

        let body: GetFileResponse = response.json().await.map_err(|e| {
            tracing::error!(file_id, error = %e.without_url(), "getFile response was not valid JSON");
            ExtractError::DownloadFailed
        })?;

        if !body.ok {
            tracing::error!(
                file_id,
                description = body.description.as_deref().unwrap_or(""),
                "getFile rejected"
            );
            return Err(ExtractError::DownloadFailed);
        }

        body.result.and_then(|f| f.file_path).ok_or_else(|| {
            tracing::error!(file_id, "getFile response has no file_path");
            ExtractError::DownloadFailed
        })
    }
}

#[async_trait]
impl FileSource for TelegramFileSource {
    async fn download(&self, remote_path: &str) -> ExtractResult<Vec<u8>> {
        let response = self
            .client
            .get(self.file_url(remote_path))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(remote_path, error = %e.without_url(), "file download failed");
                ExtractError::DownloadFailed
            })?;

        // Redirects reqwest did not follow (300, 304, ...) land here too.
        if !response.status().is_success() {
            tracing::error!(remote_path, status = %response.status(), "file download returned non-success status");
            return Err(ExtractError::DownloadFailed);
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!(remote_path, error = %e.without_url(), "reading download body failed");
            ExtractError::DownloadFailed
        })?;

        tracing::debug!(remote_path, size = bytes.len(), "downloaded file");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_template() {
        let source = TelegramFileSource::new(
            "https://api.telegram.org/",
            SecretString::new("123:ABC".to_string()),
        );
        assert_eq!(
            source.file_url("documents/file_7.pdf"),
            "https://api.telegram.org/file/bot123:ABC/documents/file_7.pdf"
        );
        assert_eq!(
            source.file_url("/photos/p.jpg"),
            "https://api.telegram.org/file/bot123:ABC/photos/p.jpg"
        );
    }

    #[test]
    fn test_from_config_uses_base_url() {
        let config = ProcessorConfig::new("t0k").with_api_base_url("http://localhost:9000");
        let source = TelegramFileSource::from_config(&config);
        assert_eq!(source.file_url("a.txt"), "http://localhost:9000/file/bott0k/a.txt");
    }

    #[tokio::test]
    async fn test_connection_error_is_download_failed() {
        // Port 9 (discard) on localhost is not expected to serve HTTP.
        let source = TelegramFileSource::new("http://127.0.0.1:9", SecretString::new("t".to_string()));
        let result = source.download("x.txt").await;
        assert!(matches!(result, Err(ExtractError::DownloadFailed)));
    }
}
