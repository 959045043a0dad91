use donmo_schemas::Amount;
use serde::{Deserialize, Serialize};

/// Which amount to ask the backend to quote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteBasis {
    /// No donation in the cart: quote the whole order total.
    FullOrder { order_total: Amount },
    /// A donation is already in the cart (and already part of the total):
    /// quote what is left once it is taken out.
    Remaining {
        remaining: Amount,
        cart_donation: Amount,
    },
}

impl QuoteBasis {
    /// The amount sent to the quote endpoint.
    pub fn amount(&self) -> Amount {
        match self {
            QuoteBasis::FullOrder { order_total } => *order_total,
            QuoteBasis::Remaining { remaining, .. } => *remaining,
        }
    }

    pub fn cart_donation(&self) -> Option<Amount> {
        match self {
            QuoteBasis::FullOrder { .. } => None,
            QuoteBasis::Remaining { cart_donation, .. } => Some(*cart_donation),
        }
    }
}

/// What `refresh` must do with a fresh quote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshDecision {
    /// Show the quote as an unconfirmed suggestion.
    Suggest { amount: Amount, currency: String },
    /// The cart donation is already the right one: show it as confirmed.
    AlreadyRoundedUp { amount: Amount, currency: String },
    /// The cart donation no longer matches the order total. Cancel it, then
    /// show the fresh quote as a suggestion.
    ReplaceStale {
        stale: Amount,
        suggestion: Amount,
        currency: String,
    },
}

/// What to do about a cart/backend disagreement.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SyncAction {
    InSync,
    /// Backend holds a record the cart does not know about.
    CancelOrphanedRecord { recorded: Amount },
    /// Cart holds a donation the backend is missing or records differently.
    RecreateFromCart {
        cart: Amount,
        recorded: Option<Amount>,
    },
}

/// Evidence for a sync decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub action: SyncAction,
    pub cart: Option<Amount>,
    pub recorded: Option<Amount>,
}

impl SyncReport {
    pub fn is_in_sync(&self) -> bool {
        self.action == SyncAction::InSync
    }
}
