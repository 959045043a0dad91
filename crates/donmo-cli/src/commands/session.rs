//! Simulated checkout page.
//!
//! The cart lives in a JSON file so consecutive runs behave like page
//! reloads: a donation added in one run is the "existing donation" of the
//! next. Rendering calls are printed as `view:` lines on stdout.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::{Context, Result};
use donmo_client::TranslationsClient;
use donmo_schemas::{Amount, DonationRecord};
use donmo_widget::{
    CartStore, ContentData, ContentProvider, DonationView, DonmoRoundup, FundTitles, HostError,
    HttpContentProvider, StaticContentProvider, VisualState,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{api::client, load_widget_config};

pub struct SessionArgs {
    pub config_paths: Vec<String>,
    pub cart_path: String,
    pub goods_total: Option<Amount>,
    pub click: bool,
}

pub async fn run(args: SessionArgs) -> Result<()> {
    let cfg = load_widget_config(&args.config_paths)?;

    let cart = JsonFileCart::open(&args.cart_path)?;
    if let Some(total) = args.goods_total {
        cart.set_goods_total(total)?;
    }

    let content: Arc<dyn ContentProvider> = match cfg.translations_url() {
        Some(url) => Arc::new(HttpContentProvider::new(TranslationsClient::new(url))),
        None => Arc::new(StaticContentProvider::new(bundled_content())),
    };
    let revert = cfg.error_revert();
    let widget = DonmoRoundup::new(
        cfg.clone(),
        Arc::new(client(&cfg)?),
        Arc::new(cart),
        Arc::new(ConsoleView),
        content,
    );

    match widget.build().await {
        Ok(report) => info!(report = ?report, "widget built"),
        Err(e) => warn!(error = %e, "build did not complete cleanly"),
    }

    if args.click {
        let outcome = widget.click().await;
        println!("click={outcome:?}");
    }

    if widget.snapshot().await.showing_error {
        tokio::time::sleep(revert + Duration::from_millis(50)).await;
    }

    let state = widget.snapshot().await;
    println!(
        "{}",
        serde_json::to_string_pretty(&state).context("serialize widget state")?
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Cart file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartFile {
    #[serde(default)]
    pub goods_total: Amount,
    #[serde(default)]
    pub donation: Option<Amount>,
}

/// Cart persisted to a JSON file after every change.
pub struct JsonFileCart {
    path: PathBuf,
    state: Mutex<CartFile>,
}

impl JsonFileCart {
    /// Load the cart file, or start an empty cart if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("read cart file: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parse cart file: {}", path.display()))?
        } else {
            CartFile::default()
        };
        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn set_goods_total(&self, goods_total: Amount) -> Result<()> {
        let mut st = self.lock();
        st.goods_total = goods_total;
        persist(&self.path, &st)
    }

    fn lock(&self) -> MutexGuard<'_, CartFile> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn update(&self, donation: Option<Amount>) -> Result<(), HostError> {
        let mut st = self.lock();
        let mut next = st.clone();
        next.donation = donation;
        persist(&self.path, &next).map_err(|e| HostError::new(format!("{e:#}")))?;
        *st = next;
        Ok(())
    }
}

fn persist(path: &Path, cart: &CartFile) -> Result<()> {
    let raw = serde_json::to_string_pretty(cart).context("serialize cart")?;
    std::fs::write(path, raw).with_context(|| format!("write cart file: {}", path.display()))
}

#[async_trait::async_trait]
impl CartStore for JsonFileCart {
    async fn existing_donation(&self) -> Option<Amount> {
        self.lock().donation
    }

    async fn grand_total(&self) -> Amount {
        let st = self.lock();
        st.goods_total + st.donation.unwrap_or_default()
    }

    async fn add_donation(&self, record: &DonationRecord) -> Result<(), HostError> {
        self.update(Some(record.donation_amount))
    }

    async fn remove_donation(&self) -> Result<(), HostError> {
        self.update(None)
    }
}

// ---------------------------------------------------------------------------
// Console view
// ---------------------------------------------------------------------------

pub struct ConsoleView;

impl DonationView for ConsoleView {
    fn render_content(&self, content: &ContentData) {
        if let Some(title) = &content.integration_title {
            println!("view: title={title}");
        }
    }

    fn set_amount(&self, amount: &str) {
        println!("view: amount={amount}");
    }

    fn set_currency(&self, symbol: &str) {
        println!("view: currency={symbol}");
    }

    fn set_button_text(&self, text: &str) {
        println!("view: button={text}");
    }

    fn set_button_title(&self, title: Option<&str>) {
        println!("view: hint={}", title.unwrap_or("-"));
    }

    fn set_visual_state(&self, state: VisualState) {
        println!("view: visual={state:?}");
    }

    fn set_button_enabled(&self, enabled: bool) {
        println!("view: enabled={enabled}");
    }

    fn set_busy(&self, busy: bool) {
        println!("view: busy={busy}");
    }
}

/// English copy used when no translations URL is configured.
fn bundled_content() -> ContentData {
    ContentData {
        roundup_message: Some("Round up for Ukraine".to_string()),
        thank_message: Some("Thank you!".to_string()),
        integration_title: Some("Round up your order".to_string()),
        error_message: Some("Something went wrong".to_string()),
        cancel_donation_message: Some("Click to cancel the donation".to_string()),
        contribution_message: Some("Your contribution goes to".to_string()),
        with_love: Some("With love".to_string()),
        funds: FundTitles {
            title: Some("Funds".to_string()),
            prytula_fund: Some("Serhiy Prytula Charity Foundation".to_string()),
            come_back_alive: Some("Come Back Alive".to_string()),
            united24: Some("United24".to_string()),
        },
    }
}
