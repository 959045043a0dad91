//! Runtime secret resolution.
//!
//! # Contract
//! - Config YAML stores only **env var NAMES** (e.g. `"DONMO_PUBLIC_KEY"`).
//! - Callers invoke [`resolve_secrets`] once at startup and pass the
//!   returned [`ResolvedSecrets`] into constructors.
//! - `Debug` redacts values. Error messages name the variable, never the
//!   value.

use anyhow::{bail, Result};
use serde_json::Value;

/// Env var consulted when `/keys_env/public_key` is absent.
pub const DEFAULT_PUBLIC_KEY_ENV: &str = "DONMO_PUBLIC_KEY";

/// Secrets resolved from the environment for one widget session.
#[derive(Clone)]
pub struct ResolvedSecrets {
    /// Merchant public key sent as the `pk` header on every API call.
    pub public_key: String,
}

impl std::fmt::Debug for ResolvedSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedSecrets")
            .field("public_key", &"<REDACTED>")
            .finish()
    }
}

/// Read a non-empty, trimmed string value at `pointer`.
pub(crate) fn read_str_at(config: &Value, pointer: &str) -> Option<String> {
    let s = config.pointer(pointer)?.as_str()?;
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn resolve_env(var_name: &str) -> Option<String> {
    match std::env::var(var_name) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}

/// Name of the env var holding the public key.
pub fn public_key_env_name(config_json: &Value) -> String {
    read_str_at(config_json, "/keys_env/public_key")
        .unwrap_or_else(|| DEFAULT_PUBLIC_KEY_ENV.to_string())
}

/// Resolve secrets from the process environment.
///
/// # Errors
/// SECRETS_MISSING with the env var NAME when the public key is unset or
/// blank.
pub fn resolve_secrets(config_json: &Value) -> Result<ResolvedSecrets> {
    resolve_secrets_with(config_json, resolve_env)
}

/// Same as [`resolve_secrets`] with an injectable lookup, so tests do not
/// have to mutate the process environment.
pub fn resolve_secrets_with<F>(config_json: &Value, lookup: F) -> Result<ResolvedSecrets>
where
    F: Fn(&str) -> Option<String>,
{
    let var = public_key_env_name(config_json);
    let public_key = lookup(&var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match public_key {
        Some(public_key) => Ok(ResolvedSecrets { public_key }),
        None => bail!(
            "SECRETS_MISSING: required env var '{}' (public key) is not set or empty",
            var
        ),
    }
}
