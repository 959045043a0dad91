//! donmo-schemas
//!
//! Wire and data types shared by the donation client, the reconciliation
//! logic and the widget engine. Field names follow the donation API's JSON
//! (`camelCase`).

mod amount;

pub use amount::{Amount, AmountParseError, MICROS_SCALE};

use serde::{Deserialize, Serialize};

/// The donation a shopper attaches to an order.
///
/// Sent as the body of the create call and handed to the host cart's
/// add-donation callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRecord {
    pub donation_amount: Amount,
    pub order_id: String,
}

impl DonationRecord {
    pub fn new(donation_amount: Amount, order_id: impl Into<String>) -> Self {
        Self {
            donation_amount,
            order_id: order_id.into(),
        }
    }
}

/// Suggested donation for an order amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub donation_amount: Amount,
    #[serde(default)]
    pub currency_symbol: String,
}

/// Body of `GET /check/<orderId>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub data: Option<CheckData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckData {
    #[serde(default)]
    pub donation_amount: Option<Amount>,
}

impl CheckResponse {
    /// The backend's recorded amount; a missing, null or zero amount all
    /// mean "no record".
    pub fn recorded_amount(&self) -> Option<Amount> {
        self.data
            .as_ref()
            .and_then(|d| d.donation_amount)
            .and_then(Amount::non_zero)
    }
}

/// Body returned by the create and cancel calls.
///
/// The API reports its outcome in the body, not the HTTP status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<u16>,
}

impl StatusResponse {
    /// Create succeeds only on an explicit `200`.
    pub fn create_accepted(&self) -> bool {
        self.status == Some(200)
    }

    /// Cancel fails only on an explicit `500`.
    pub fn cancel_accepted(&self) -> bool {
        self.status != Some(500)
    }
}
