//! donmo-widget
//!
//! Round-up donation widget engine.
//!
//! [`DonmoRoundup`] keeps three things consistent for one order: the donation
//! line in the host's cart, the donation record on the backend and what the
//! widget shows. The host provides the cart ([`CartStore`]), the rendering
//! hooks ([`DonationView`]) and the localized copy ([`ContentProvider`]); the
//! backend is reached through [`donmo_client::DonationApi`].
//!
//! Decisions are delegated to `donmo-reconcile`; this crate owns the IO,
//! the session state and the error overlay.

mod content;
mod host;
mod outcome;
mod state;
mod timer;
mod view;
mod widget;

pub use content::{
    ContentData, ContentError, ContentProvider, FundTitles, HttpContentProvider,
    StaticContentProvider,
};
pub use host::{CartStore, HostError};
pub use outcome::{ActionFailure, ClickOutcome, RefreshReport, SyncOutcome, WidgetError};
pub use state::{DonationState, PhaseEvent, TransitionError, WidgetPhase};
pub use timer::RevertTimer;
pub use view::{DonationView, VisualState};
pub use widget::DonmoRoundup;
