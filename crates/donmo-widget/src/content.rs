//! Localized widget content.
//!
//! The message set for one language is loaded once per `build()` from a
//! [`ContentProvider`], then the caller's [`MessageOverrides`] are applied.
//! After that the content never changes for the life of the widget.

use std::fmt;

use donmo_client::{ApiError, TranslationsClient};
use donmo_config::MessageOverrides;
use serde::{Deserialize, Serialize};

/// Titles of the funds shown under the donation box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundTitles {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub prytula_fund: Option<String>,
    #[serde(default)]
    pub come_back_alive: Option<String>,
    #[serde(default)]
    pub united24: Option<String>,
}

/// Message set for one language, keyed like the translations document.
///
/// A `None` field means the document does not define that message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentData {
    #[serde(default)]
    pub roundup_message: Option<String>,
    #[serde(default)]
    pub thank_message: Option<String>,
    #[serde(default)]
    pub integration_title: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub cancel_donation_message: Option<String>,
    #[serde(default)]
    pub contribution_message: Option<String>,
    #[serde(default)]
    pub with_love: Option<String>,
    #[serde(default)]
    pub funds: FundTitles,
}

impl ContentData {
    /// Apply caller overrides.
    ///
    /// An override only replaces a message the loaded set already defines;
    /// it never introduces a key the language does not have.
    pub fn with_overrides(mut self, overrides: &MessageOverrides) -> Self {
        for (key, text) in overrides.entries() {
            let slot = match key {
                "roundupMessage" => &mut self.roundup_message,
                "thankMessage" => &mut self.thank_message,
                "integrationTitle" => &mut self.integration_title,
                "errorMessage" => &mut self.error_message,
                _ => continue,
            };
            if slot.is_some() {
                *slot = Some(text.to_string());
            }
        }
        self
    }

    pub fn roundup_message(&self) -> &str {
        self.roundup_message.as_deref().unwrap_or_default()
    }

    pub fn thank_message(&self) -> &str {
        self.thank_message.as_deref().unwrap_or_default()
    }

    pub fn error_message(&self) -> &str {
        self.error_message.as_deref().unwrap_or_default()
    }

    pub fn cancel_donation_message(&self) -> Option<&str> {
        self.cancel_donation_message.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The translations document could not be fetched.
    Fetch(ApiError),
    /// The document has no message set for the requested language.
    UnknownLanguage(String),
    /// The message set does not have the expected shape.
    Decode(String),
}

impl fmt::Display for ContentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentError::Fetch(e) => write!(f, "content fetch failed: {e}"),
            ContentError::UnknownLanguage(lang) => {
                write!(f, "no translations for language '{lang}'")
            }
            ContentError::Decode(msg) => write!(f, "content decode failed: {msg}"),
        }
    }
}

impl std::error::Error for ContentError {}

// ---------------------------------------------------------------------------
// Providers
// ---------------------------------------------------------------------------

/// Source of localized content.
#[async_trait::async_trait]
pub trait ContentProvider: Send + Sync {
    async fn load(&self, language: &str) -> Result<ContentData, ContentError>;
}

/// Loads content from the hosted translations document.
#[derive(Debug, Clone)]
pub struct HttpContentProvider {
    client: TranslationsClient,
}

impl HttpContentProvider {
    pub fn new(client: TranslationsClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl ContentProvider for HttpContentProvider {
    async fn load(&self, language: &str) -> Result<ContentData, ContentError> {
        let set = self
            .client
            .fetch_language(language)
            .await
            .map_err(ContentError::Fetch)?
            .ok_or_else(|| ContentError::UnknownLanguage(language.to_string()))?;
        serde_json::from_value(set).map_err(|e| ContentError::Decode(e.to_string()))
    }
}

/// Content bundled with the host, the same for every language.
#[derive(Debug, Clone, Default)]
pub struct StaticContentProvider {
    content: ContentData,
}

impl StaticContentProvider {
    pub fn new(content: ContentData) -> Self {
        Self { content }
    }
}

#[async_trait::async_trait]
impl ContentProvider for StaticContentProvider {
    async fn load(&self, _language: &str) -> Result<ContentData, ContentError> {
        Ok(self.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ContentData {
        ContentData {
            roundup_message: Some("Round up".to_string()),
            thank_message: Some("Thank you".to_string()),
            error_message: Some("Error".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn override_replaces_existing_message() {
        let overrides = MessageOverrides {
            thank_message: Some("Дякуємо!".to_string()),
            ..Default::default()
        };
        let c = base().with_overrides(&overrides);
        assert_eq!(c.thank_message(), "Дякуємо!");
        assert_eq!(c.roundup_message(), "Round up");
    }

    #[test]
    fn override_never_adds_missing_key() {
        let overrides = MessageOverrides {
            integration_title: Some("Help".to_string()),
            ..Default::default()
        };
        let c = base().with_overrides(&overrides);
        assert_eq!(c.integration_title, None);
    }

    #[test]
    fn decodes_translation_document_shape() {
        let v = serde_json::json!({
            "roundupMessage": "Round up",
            "cancelDonationMessage": "Click to cancel",
            "funds": {"title": "Funds", "united24": "United24"}
        });
        let c: ContentData = serde_json::from_value(v).unwrap();
        assert_eq!(c.cancel_donation_message(), Some("Click to cancel"));
        assert_eq!(c.funds.united24.as_deref(), Some("United24"));
        assert_eq!(c.error_message(), "");
    }
}
