//! donmo-reconcile
//!
//! Reconciliation decisions for the round-up widget.
//!
//! Three sources of truth must converge for an order: the host cart's
//! donation, the backend's donation record and the displayed amount.
//!
//! - Cart empty → quote the full order total and suggest it.
//! - Cart donation equals the quote for the remaining total → already
//!   rounded up, leave everything alone.
//! - Cart donation differs → it is stale: cancel it first, then suggest the
//!   fresh quote.
//! - Backend record disagrees with the cart → the cart wins.
//!
//! Deterministic, pure logic. No IO. No API calls.

mod engine;
mod types;

pub use engine::{decide_refresh, quote_basis, reconcile_backend};
pub use types::*;
