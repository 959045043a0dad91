//! View that records every rendering call.

use std::sync::{Mutex, MutexGuard};

use donmo_widget::{ContentData, DonationView, VisualState};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewOp {
    RenderContent,
    Amount(String),
    Currency(String),
    ButtonText(String),
    ButtonTitle(Option<String>),
    Visual(VisualState),
    Enabled(bool),
    Busy(bool),
}

/// What the shopper would currently see.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    pub amount: String,
    pub currency: String,
    pub button_text: String,
    pub button_title: Option<String>,
    pub visual: VisualState,
    pub enabled: bool,
    pub busy: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            amount: String::new(),
            currency: String::new(),
            button_text: String::new(),
            button_title: None,
            visual: VisualState::Neutral,
            enabled: true,
            busy: false,
        }
    }
}

#[derive(Default)]
struct Recorded {
    ops: Vec<ViewOp>,
    screen: Screen,
}

#[derive(Default)]
pub struct RecordingView {
    inner: Mutex<Recorded>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> Vec<ViewOp> {
        self.lock().ops.clone()
    }

    pub fn screen(&self) -> Screen {
        self.lock().screen.clone()
    }

    /// Every amount shown, in order.
    pub fn amounts(&self) -> Vec<String> {
        self.lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                ViewOp::Amount(a) => Some(a.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().ops.clear();
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, op: ViewOp, apply: impl FnOnce(&mut Screen)) {
        let mut r = self.lock();
        r.ops.push(op);
        apply(&mut r.screen);
    }
}

impl DonationView for RecordingView {
    fn render_content(&self, _content: &ContentData) {
        self.record(ViewOp::RenderContent, |_| {});
    }

    fn set_amount(&self, amount: &str) {
        self.record(ViewOp::Amount(amount.to_string()), |s| {
            s.amount = amount.to_string()
        });
    }

    fn set_currency(&self, symbol: &str) {
        self.record(ViewOp::Currency(symbol.to_string()), |s| {
            s.currency = symbol.to_string()
        });
    }

    fn set_button_text(&self, text: &str) {
        self.record(ViewOp::ButtonText(text.to_string()), |s| {
            s.button_text = text.to_string()
        });
    }

    fn set_button_title(&self, title: Option<&str>) {
        let title = title.map(str::to_string);
        self.record(ViewOp::ButtonTitle(title.clone()), |s| s.button_title = title);
    }

    fn set_visual_state(&self, state: VisualState) {
        self.record(ViewOp::Visual(state), |s| s.visual = state);
    }

    fn set_button_enabled(&self, enabled: bool) {
        self.record(ViewOp::Enabled(enabled), |s| s.enabled = enabled);
    }

    fn set_busy(&self, busy: bool) {
        self.record(ViewOp::Busy(busy), |s| s.busy = busy);
    }
}
