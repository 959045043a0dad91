//! Host-page collaborators.
//!
//! The shop owns the cart. The widget reads the cart's donation and the
//! order total through [`CartStore`] and asks the shop to add or remove the
//! donation line; it never edits the cart directly.

use std::fmt;

use donmo_schemas::{Amount, DonationRecord};

/// Failure reported by a host cart callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError(pub String);

impl HostError {
    pub fn new(msg: impl Into<String>) -> Self {
        HostError(msg.into())
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "host callback failed: {}", self.0)
    }
}

impl std::error::Error for HostError {}

/// The shopper's cart as exposed by the host page.
#[async_trait::async_trait]
pub trait CartStore: Send + Sync {
    /// Donation currently in the cart. `None` and zero both mean "none".
    async fn existing_donation(&self) -> Option<Amount>;

    /// Order total, including any donation already in the cart.
    async fn grand_total(&self) -> Amount;

    /// Put the donation into the cart.
    async fn add_donation(&self, record: &DonationRecord) -> Result<(), HostError>;

    /// Take the donation out of the cart.
    async fn remove_donation(&self) -> Result<(), HostError>;
}
