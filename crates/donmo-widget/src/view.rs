//! Rendering hooks.
//!
//! The engine drives the view through these side-effecting calls and never
//! reads anything back. How they are drawn (DOM, terminal, test recorder) is
//! the implementor's business.

use crate::content::ContentData;

/// Look of the donation box and button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    /// No confirmed donation: plain box, round-up prompt.
    Neutral,
    /// Donation confirmed: checkmarks, highlighted box, thank-you text.
    Success,
}

pub trait DonationView: Send + Sync {
    /// Static copy (headings, fund titles) rendered once after content loads.
    fn render_content(&self, content: &ContentData);

    /// Donation amount, already formatted with two decimals.
    fn set_amount(&self, amount: &str);

    fn set_currency(&self, symbol: &str);

    fn set_button_text(&self, text: &str);

    /// Hover hint on the button; `None` clears it.
    fn set_button_title(&self, title: Option<&str>);

    fn set_visual_state(&self, state: VisualState);

    fn set_button_enabled(&self, enabled: bool);

    /// Loading indicator while a click is being processed.
    fn set_busy(&self, busy: bool);
}
