//! donmo-testkit
//!
//! Deterministic fakes for driving `DonmoRoundup` in tests: a scripted
//! backend, an in-memory cart and a view that records what it is told.
//! No network, no randomness; time is the Tokio clock, so tests pause it.

mod backend;
mod cart;
mod view;

use std::sync::Arc;
use std::time::Duration;

pub use backend::{ApiCall, ApiOp, ScriptedDonationApi};
pub use cart::{CartCall, InMemoryCart};
pub use view::{RecordingView, Screen, ViewOp};

use donmo_config::{WidgetConfig, DEFAULT_ERROR_REVERT};
use donmo_widget::{ContentData, DonmoRoundup, FundTitles, StaticContentProvider};

pub const ORDER_ID: &str = "order-1001";

pub const ROUNDUP: &str = "Round up";
pub const THANKS: &str = "Thank you!";
pub const OOPS: &str = "Something went wrong";
pub const CANCEL_HINT: &str = "Click to cancel";

/// Error-view duration the harness runs with (the production default).
pub const REVERT: Duration = DEFAULT_ERROR_REVERT;

pub fn sample_content() -> ContentData {
    ContentData {
        roundup_message: Some(ROUNDUP.to_string()),
        thank_message: Some(THANKS.to_string()),
        integration_title: Some("Support Ukraine".to_string()),
        error_message: Some(OOPS.to_string()),
        cancel_donation_message: Some(CANCEL_HINT.to_string()),
        contribution_message: Some("Your contribution".to_string()),
        with_love: Some("With love".to_string()),
        funds: FundTitles {
            title: Some("Funds".to_string()),
            prytula_fund: Some("Prytula Foundation".to_string()),
            come_back_alive: Some("Come Back Alive".to_string()),
            united24: Some("United24".to_string()),
        },
    }
}

pub fn test_config() -> WidgetConfig {
    WidgetConfig::new("test-public-key", ORDER_ID, "http://donmo.invalid/api")
}

/// A widget wired to fakes, with handles to each fake.
pub struct Harness {
    pub api: Arc<ScriptedDonationApi>,
    pub cart: Arc<InMemoryCart>,
    pub view: Arc<RecordingView>,
    pub widget: DonmoRoundup,
}

impl Harness {
    pub fn new(api: ScriptedDonationApi, cart: InMemoryCart) -> Self {
        Self::with_config(test_config(), api, cart)
    }

    pub fn with_config(config: WidgetConfig, api: ScriptedDonationApi, cart: InMemoryCart) -> Self {
        let api = Arc::new(api);
        let cart = Arc::new(cart);
        let view = Arc::new(RecordingView::new());
        let widget = DonmoRoundup::new(
            config,
            api.clone(),
            cart.clone(),
            view.clone(),
            Arc::new(StaticContentProvider::new(sample_content())),
        );
        Self {
            api,
            cart,
            view,
            widget,
        }
    }
}
