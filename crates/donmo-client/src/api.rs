//! Donation API boundary.
//!
//! This module defines only the trait and its error type. The reqwest
//! implementation lives in `http.rs`; in-memory fakes live in
//! `donmo-testkit`.

use std::fmt;

use donmo_schemas::{Amount, DonationRecord, Quote};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a [`DonationApi`] implementation may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (connect, TLS, timeout, ...).
    Transport(String),
    /// A response arrived but its status says the operation failed.
    ///
    /// For create/cancel this is the `status` field of the JSON body; for
    /// quote/check it is the HTTP status line.
    Rejected { status: u16 },
    /// The response payload could not be decoded.
    Decode(String),
    /// The configured base URL cannot address the endpoint.
    InvalidUrl(String),
}

impl ApiError {
    /// `true` when the backend answered and said no, as opposed to the call
    /// not getting through.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "transport error: {msg}"),
            ApiError::Rejected { status } => write!(f, "donation api rejected: status={status}"),
            ApiError::Decode(msg) => write!(f, "decode error: {msg}"),
            ApiError::InvalidUrl(msg) => write!(f, "invalid url: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Remote donation operations.
///
/// Object-safe so the engine can hold an `Arc<dyn DonationApi>`. No retries
/// at this layer: a failed call surfaces immediately.
#[async_trait::async_trait]
pub trait DonationApi: Send + Sync {
    /// Suggested donation for `order_amount`.
    async fn quote(&self, order_amount: Amount) -> Result<Quote, ApiError>;

    /// The amount currently recorded for `order_id`, if any.
    async fn check(&self, order_id: &str) -> Result<Option<Amount>, ApiError>;

    /// Create (or replace) the record for `record.order_id`.
    async fn create(&self, record: &DonationRecord) -> Result<(), ApiError>;

    /// Remove the record for `order_id`.
    async fn cancel(&self, order_id: &str) -> Result<(), ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_stable() {
        assert_eq!(
            ApiError::Rejected { status: 500 }.to_string(),
            "donation api rejected: status=500"
        );
        assert_eq!(
            ApiError::Transport("connection refused".to_string()).to_string(),
            "transport error: connection refused"
        );
    }

    #[test]
    fn only_rejected_is_rejection() {
        assert!(ApiError::Rejected { status: 404 }.is_rejection());
        assert!(!ApiError::Decode("eof".to_string()).is_rejection());
    }
}
