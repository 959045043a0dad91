use std::time::Duration;

use anyhow::{bail, Context, Result};
use donmo_schemas::Amount;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::secrets::{read_str_at, ResolvedSecrets};

pub const DEFAULT_LANGUAGE: &str = "uk";

/// How long the error message stays on the button before the view reverts.
pub const DEFAULT_ERROR_REVERT: Duration = Duration::from_millis(2500);

const DEFAULT_DONATION: Amount = Amount::from_cents(1);

/// Caller-supplied replacements for localized messages.
///
/// Keys match the translation document (`roundupMessage`, ...). An override
/// only replaces a message the translation document already defines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageOverrides {
    #[serde(default)]
    pub roundup_message: Option<String>,
    #[serde(default)]
    pub thank_message: Option<String>,
    #[serde(default)]
    pub integration_title: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl MessageOverrides {
    /// Non-empty overrides as `(translation key, text)` pairs.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("roundupMessage", &self.roundup_message),
            ("thankMessage", &self.thank_message),
            ("integrationTitle", &self.integration_title),
            ("errorMessage", &self.error_message),
        ]
        .into_iter()
        .filter_map(|(k, v)| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| (k, s))
        })
        .collect()
    }
}

/// Immutable configuration for one widget instance.
#[derive(Clone, PartialEq, Eq)]
pub struct WidgetConfig {
    public_key: String,
    order_id: String,
    language: String,
    is_backend_based: bool,
    api_url: String,
    translations_url: Option<String>,
    default_donation: Amount,
    error_revert: Duration,
    overrides: MessageOverrides,
}

impl std::fmt::Debug for WidgetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetConfig")
            .field("public_key", &"<REDACTED>")
            .field("order_id", &self.order_id)
            .field("language", &self.language)
            .field("is_backend_based", &self.is_backend_based)
            .field("api_url", &self.api_url)
            .field("translations_url", &self.translations_url)
            .field("default_donation", &self.default_donation)
            .field("error_revert", &self.error_revert)
            .field("overrides", &self.overrides)
            .finish()
    }
}

impl WidgetConfig {
    pub fn new(
        public_key: impl Into<String>,
        order_id: impl Into<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            public_key: public_key.into(),
            order_id: order_id.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            is_backend_based: false,
            api_url: api_url.into(),
            translations_url: None,
            default_donation: DEFAULT_DONATION,
            error_revert: DEFAULT_ERROR_REVERT,
            overrides: MessageOverrides::default(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// When set, the host's own backend creates and cancels donation
    /// records; the widget only calls the cart callbacks.
    pub fn backend_based(mut self, is_backend_based: bool) -> Self {
        self.is_backend_based = is_backend_based;
        self
    }

    pub fn with_translations_url(mut self, url: impl Into<String>) -> Self {
        self.translations_url = Some(url.into());
        self
    }

    pub fn with_default_donation(mut self, amount: Amount) -> Self {
        self.default_donation = amount;
        self
    }

    pub fn with_error_revert(mut self, delay: Duration) -> Self {
        self.error_revert = delay;
        self
    }

    pub fn with_overrides(mut self, overrides: MessageOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Build from a loaded (layered) config and resolved secrets.
    ///
    /// Reads exactly the pointers listed in [`crate::CONSUMED_POINTERS`].
    pub fn from_config_json(config: &Value, secrets: &ResolvedSecrets) -> Result<Self> {
        let Some(order_id) = read_str_at(config, "/widget/order_id") else {
            bail!("CONFIG_MISSING: /widget/order_id is required");
        };
        let Some(api_url) = read_str_at(config, "/api/base_url") else {
            bail!("CONFIG_MISSING: /api/base_url is required");
        };

        let mut cfg = WidgetConfig::new(secrets.public_key.clone(), order_id, api_url);

        if let Some(language) = read_str_at(config, "/widget/language") {
            cfg = cfg.with_language(language);
        }
        if let Some(url) = read_str_at(config, "/api/translations_url") {
            cfg = cfg.with_translations_url(url);
        }
        if let Some(v) = config.pointer("/widget/is_backend_based") {
            let Some(flag) = v.as_bool() else {
                bail!("CONFIG_INVALID: /widget/is_backend_based must be a boolean");
            };
            cfg = cfg.backend_based(flag);
        }
        if let Some(v) = config.pointer("/widget/default_donation") {
            let amount: Amount = serde_json::from_value(v.clone())
                .context("CONFIG_INVALID: /widget/default_donation")?;
            if !amount.is_positive() {
                bail!("CONFIG_INVALID: /widget/default_donation must be > 0");
            }
            cfg = cfg.with_default_donation(amount);
        }
        if let Some(v) = config.pointer("/widget/error_revert_ms") {
            let Some(ms) = v.as_u64() else {
                bail!("CONFIG_INVALID: /widget/error_revert_ms must be a non-negative integer");
            };
            cfg = cfg.with_error_revert(Duration::from_millis(ms));
        }
        if let Some(v) = config.pointer("/messages") {
            let overrides: MessageOverrides =
                serde_json::from_value(v.clone()).context("CONFIG_INVALID: /messages")?;
            cfg = cfg.with_overrides(overrides);
        }

        Ok(cfg)
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_backend_based(&self) -> bool {
        self.is_backend_based
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn translations_url(&self) -> Option<&str> {
        self.translations_url.as_deref()
    }

    pub fn default_donation(&self) -> Amount {
        self.default_donation
    }

    pub fn error_revert(&self) -> Duration {
        self.error_revert
    }

    pub fn overrides(&self) -> &MessageOverrides {
        &self.overrides
    }
}
