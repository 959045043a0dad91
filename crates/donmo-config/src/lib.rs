//! donmo-config
//!
//! Turns one or more YAML files into the [`WidgetConfig`] a checkout page
//! hands to the round-up widget.
//!
//! Loading happens in three steps. The files are overlaid left to right,
//! the result is checked for pasted credentials, and the merged tree is
//! written out as key-sorted compact JSON whose SHA-256 becomes the
//! `config_hash` printed in session logs. The public key never appears in a
//! file: `/keys_env/public_key` names the environment variable that holds
//! it, see [`secrets::resolve_secrets`].

mod leaves;
pub mod secrets;
mod unused;
mod widget;

pub use unused::{report_unused_keys, UnusedKeyPolicy, UnusedKeyReport, CONSUMED_POINTERS};
pub use widget::{MessageOverrides, WidgetConfig, DEFAULT_ERROR_REVERT, DEFAULT_LANGUAGE};

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde_json::map::Entry;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// A merged configuration together with its fingerprint.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Hex SHA-256 of `canonical_json`.
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

/// Read and overlay YAML files. Later paths win.
pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let docs = paths
        .iter()
        .map(|path| {
            std::fs::read_to_string(path).with_context(|| format!("read config file: {path}"))
        })
        .collect::<Result<Vec<String>>>()?;
    let docs: Vec<&str> = docs.iter().map(String::as_str).collect();
    load_layered_yaml_from_strings(&docs)
}

/// Same as [`load_layered_yaml`] for documents already in memory.
pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = Value::Object(Map::new());
    for (layer, raw) in yaml_docs.iter().enumerate() {
        let doc: serde_yaml::Value =
            serde_yaml::from_str(raw).with_context(|| format!("config layer {layer}: bad yaml"))?;
        let doc = serde_json::to_value(doc)
            .with_context(|| format!("config layer {layer}: not representable as json"))?;
        overlay(&mut merged, doc);
    }

    leaves::reject_credential_literals(&merged)?;

    let canonical_json =
        serde_json::to_string(&with_sorted_keys(merged.clone())).context("encode config")?;
    let config_hash = hex::encode(Sha256::digest(canonical_json.as_bytes()));
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Mappings merge key by key; anything else in `top` replaces `base`.
fn overlay(base: &mut Value, top: Value) {
    match (base, top) {
        (Value::Object(base), Value::Object(top)) => {
            for (key, value) in top {
                match base.entry(key) {
                    Entry::Occupied(mut slot) => overlay(slot.get_mut(), value),
                    Entry::Vacant(slot) => {
                        slot.insert(value);
                    }
                }
            }
        }
        (slot, top) => *slot = top,
    }
}

/// Key order must not depend on serde_json's `preserve_order` feature.
fn with_sorted_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, with_sorted_keys(v)))
                .collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(with_sorted_keys).collect()),
        scalar => scalar,
    }
}
