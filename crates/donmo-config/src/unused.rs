//! Detects config keys that nothing reads.
//!
//! A typo like `widget/langauge` would otherwise be silently ignored and the
//! widget would fall back to its default language.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::Value;

use crate::leaves::leaves;

/// Pointers read by [`crate::WidgetConfig::from_config_json`] and
/// [`crate::secrets::resolve_secrets`]. A pointer covers its whole subtree.
pub const CONSUMED_POINTERS: &[&str] = &[
    "/widget/order_id",
    "/widget/language",
    "/widget/is_backend_based",
    "/widget/default_donation",
    "/widget/error_revert_ms",
    "/api/base_url",
    "/api/translations_url",
    "/keys_env/public_key",
    "/messages",
];

/// How many unused pointers a `Fail` error lists.
const ERROR_LIST_LIMIT: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusedKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnusedKeyReport {
    /// Sorted copy of [`CONSUMED_POINTERS`].
    pub consumed_prefixes: Vec<String>,
    /// Sorted, unique.
    pub unused_leaf_pointers: Vec<String>,
}

impl UnusedKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unused_leaf_pointers.is_empty()
    }
}

/// Lists every leaf of `config_json` outside [`CONSUMED_POINTERS`].
///
/// Under `Fail` a non-empty list becomes a `CONFIG_UNUSED_KEYS` error.
pub fn report_unused_keys(config_json: &Value, policy: UnusedKeyPolicy) -> Result<UnusedKeyReport> {
    let mut consumed_prefixes: Vec<String> =
        CONSUMED_POINTERS.iter().map(|p| p.to_string()).collect();
    consumed_prefixes.sort();

    let mut unused: Vec<String> = leaves(config_json)
        .into_iter()
        .map(|(pointer, _)| pointer)
        .filter(|leaf| !CONSUMED_POINTERS.iter().any(|read| covers(read, leaf)))
        .collect();
    unused.sort();
    unused.dedup();

    if policy == UnusedKeyPolicy::Fail && !unused.is_empty() {
        let shown: Vec<&str> = unused
            .iter()
            .take(ERROR_LIST_LIMIT)
            .map(String::as_str)
            .collect();
        bail!(
            "CONFIG_UNUSED_KEYS: nothing reads {} config key(s): {}",
            unused.len(),
            shown.join(", ")
        );
    }

    Ok(UnusedKeyReport {
        consumed_prefixes,
        unused_leaf_pointers: unused,
    })
}

/// `/a/b` covers `/a/b` and `/a/b/c`, not `/a/bc`.
fn covers(read: &str, leaf: &str) -> bool {
    leaf.strip_prefix(read)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn covers_stops_at_token_boundary() {
        assert!(covers("/messages", "/messages/thankMessage"));
        assert!(covers("/widget/language", "/widget/language"));
        assert!(!covers("/widget/lang", "/widget/language"));
    }

    #[test]
    fn fail_error_lists_at_most_the_limit() {
        let extra: serde_json::Map<String, Value> = (0..20)
            .map(|i| (format!("k{i:02}"), json!(i)))
            .collect();
        let err = report_unused_keys(&json!({ "extra": extra }), UnusedKeyPolicy::Fail)
            .unwrap_err()
            .to_string();
        assert!(err.contains("20 config key(s)"), "got: {err}");
        assert!(err.contains("/extra/k11"), "got: {err}");
        assert!(!err.contains("/extra/k12"), "got: {err}");
    }
}
