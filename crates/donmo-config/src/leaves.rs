//! Leaf addressing for config trees.
//!
//! Every scalar in the merged config is addressed by its JSON pointer
//! (RFC 6901), e.g. `/messages/thankMessage` or `/hooks/0/token`.

use anyhow::{bail, Result};
use serde_json::Value;

/// Literal prefixes of keys and tokens that must never live in a config file.
const CREDENTIAL_PREFIXES: &[&str] = &[
    "pk_live",
    "pk_test",
    "sk_live",
    "sk_test",
    "sk-",
    "ghp_",
    "AKIA",
    "-----BEGIN",
];

/// Strings shorter than this are never treated as credentials.
const MIN_CREDENTIAL_LEN: usize = 8;

/// All scalar leaves of `doc` with their pointers, in document order.
pub(crate) fn leaves(doc: &Value) -> Vec<(String, &Value)> {
    let mut out = Vec::new();
    walk(doc, String::new(), &mut out);
    out
}

fn walk<'a>(node: &'a Value, at: String, out: &mut Vec<(String, &'a Value)>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, format!("{at}/{}", escape(key)), out);
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                walk(child, format!("{at}/{idx}"), out);
            }
        }
        scalar if at.is_empty() => out.push(("/".to_string(), scalar)),
        scalar => out.push((at, scalar)),
    }
}

fn escape(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Fails with `CONFIG_SECRET_DETECTED` on the first credential-looking
/// string. The error names the pointer, never the value.
pub(crate) fn reject_credential_literals(doc: &Value) -> Result<()> {
    for (pointer, value) in leaves(doc) {
        if value.as_str().is_some_and(is_credential_like) {
            bail!("CONFIG_SECRET_DETECTED: {pointer} holds a credential literal (value redacted)");
        }
    }
    Ok(())
}

fn is_credential_like(s: &str) -> bool {
    let s = s.trim();
    s.len() >= MIN_CREDENTIAL_LEN && CREDENTIAL_PREFIXES.iter().any(|p| s.starts_with(p))
}
