//! Legacy `.doc` extraction through an Apache Tika server.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use tracing::debug;

use crate::extraction::{ExtractionError, TextSource};

const CONTENT_KEY: &str = "X-TIKA:content";

/// Sends the raw file to Tika's recursive-metadata endpoint and keeps the text body.
pub struct TikaSource {
    client: Client,
    endpoint: String,
}

impl TikaSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ExtractionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractionError::Conversion(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/rmeta/text", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl TextSource for TikaSource {
    async fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|source| ExtractionError::Io {
                path: path.display().to_string(),
                source,
            })?;

        debug!("Sending {} bytes to {}", data.len(), self.endpoint);

        let response = self
            .client
            .put(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .body(data)
            .send()
            .await
            .map_err(|e| ExtractionError::Conversion(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Conversion(format!(
                "server returned {status}: {body}"
            )));
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| ExtractionError::Conversion(format!("unreadable response: {e}")))?;

        Ok(content_from_rmeta(&parsed))
    }
}

/// Text content of the top-level document. Missing content is an empty string.
fn content_from_rmeta(parsed: &Value) -> String {
    let document = match parsed {
        Value::Array(items) => items.first(),
        other => Some(other),
    };

    document
        .and_then(|d| d.get(CONTENT_KEY))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
