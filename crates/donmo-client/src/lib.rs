//! donmo-client
//!
//! Remote Donation Client: the four donation API operations (quote, check,
//! create, cancel) behind the [`DonationApi`] trait, plus a fetcher for the
//! translations document.
//!
//! This crate does **not** make reconciliation decisions and does not retry.

pub mod api;
pub mod assets;
pub mod http;

pub use api::{ApiError, DonationApi};
pub use assets::TranslationsClient;
pub use http::HttpDonationClient;
