//! Static widget assets served next to the donation API.
//!
//! The translations document is a JSON object keyed by language code; each
//! value is the message set for that language.

use serde_json::Value;
use tracing::debug;

use crate::api::ApiError;

#[derive(Debug, Clone)]
pub struct TranslationsClient {
    http: reqwest::Client,
    url: String,
}

impl TranslationsClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), url)
    }

    pub fn with_http(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Fetch the whole translations document.
    pub async fn fetch(&self) -> Result<Value, ApiError> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("translations: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
            });
        }

        let doc: Value = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("translations: {e}")))?;
        debug!(url = %self.url, "translations fetched");
        Ok(doc)
    }

    /// Message set for `language`, or `None` when the document has no such
    /// language.
    pub async fn fetch_language(&self, language: &str) -> Result<Option<Value>, ApiError> {
        let mut doc = self.fetch().await?;
        Ok(doc.get_mut(language).map(Value::take))
    }
}
