//! Command handlers for the `donmo` harness.
//!
//! Shared config loading lives here; command-specific logic lives in the
//! submodules.

pub mod api;
pub mod session;

use anyhow::{Context, Result};
use donmo_config::{LoadedConfig, UnusedKeyPolicy, WidgetConfig};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn load(paths: &[String]) -> Result<LoadedConfig> {
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    donmo_config::load_layered_yaml(&path_refs)
}

/// Load layered config, report unused keys, resolve the public key and
/// build the widget config.
pub fn load_widget_config(paths: &[String]) -> Result<WidgetConfig> {
    let loaded = load(paths)?;

    let report = donmo_config::report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    if !report.is_clean() {
        warn!(
            unused = ?report.unused_leaf_pointers,
            "CONFIG_UNUSED_KEYS: config keys nothing reads"
        );
    }

    let secrets = donmo_config::secrets::resolve_secrets(&loaded.config_json)?;
    let cfg = WidgetConfig::from_config_json(&loaded.config_json, &secrets)
        .context("widget config")?;
    info!(
        config_hash = %loaded.config_hash,
        order_id = %cfg.order_id(),
        "config loaded"
    );
    Ok(cfg)
}

pub fn config_hash(paths: &[String]) -> Result<()> {
    let loaded = load(paths)?;
    println!("config_hash={}", loaded.config_hash);
    println!("{}", loaded.canonical_json);
    Ok(())
}
