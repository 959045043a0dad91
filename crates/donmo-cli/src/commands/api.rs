//! One-shot donation API calls.

use anyhow::{Context, Result};
use donmo_client::{DonationApi, HttpDonationClient};
use donmo_config::WidgetConfig;
use donmo_schemas::Amount;

use super::load_widget_config;

pub fn client(cfg: &WidgetConfig) -> Result<HttpDonationClient> {
    HttpDonationClient::new(cfg.api_url(), cfg.public_key()).context("donation api client")
}

pub async fn quote(config_paths: &[String], order_amount: Amount) -> Result<()> {
    let cfg = load_widget_config(config_paths)?;
    let quote = client(&cfg)?
        .quote(order_amount)
        .await
        .with_context(|| format!("quote for {order_amount}"))?;
    println!("order_amount={order_amount}");
    println!("donation={}", quote.donation_amount);
    println!("currency={}", quote.currency_symbol);
    Ok(())
}

pub async fn check(config_paths: &[String]) -> Result<()> {
    let cfg = load_widget_config(config_paths)?;
    let recorded = client(&cfg)?
        .check(cfg.order_id())
        .await
        .with_context(|| format!("check order {}", cfg.order_id()))?;
    println!("order_id={}", cfg.order_id());
    match recorded {
        Some(amount) => println!("recorded={amount}"),
        None => println!("recorded=none"),
    }
    Ok(())
}
