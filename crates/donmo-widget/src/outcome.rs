//! Results threaded through the engine.
//!
//! The shopper sees one error overlay whatever went wrong; these types keep
//! the provenance for logs and callers.

use std::fmt;

use donmo_client::ApiError;
use donmo_reconcile::RefreshDecision;

use crate::content::ContentError;
use crate::host::HostError;

/// Why a create or cancel did not go through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionFailure {
    /// The request never got a usable answer.
    Transport(String),
    /// The backend answered with a failure status.
    BackendRejection { status: u16 },
    /// The host cart callback failed.
    HostCallback(String),
}

impl ActionFailure {
    /// Short tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ActionFailure::Transport(_) => "transport",
            ActionFailure::BackendRejection { .. } => "backend_rejection",
            ActionFailure::HostCallback(_) => "host_callback",
        }
    }
}

impl From<ApiError> for ActionFailure {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Rejected { status } => ActionFailure::BackendRejection { status },
            other => ActionFailure::Transport(other.to_string()),
        }
    }
}

impl From<HostError> for ActionFailure {
    fn from(e: HostError) -> Self {
        ActionFailure::HostCallback(e.0)
    }
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionFailure::Transport(msg) => write!(f, "transport failure: {msg}"),
            ActionFailure::BackendRejection { status } => {
                write!(f, "backend rejected the request: status={status}")
            }
            ActionFailure::HostCallback(msg) => write!(f, "host callback failed: {msg}"),
        }
    }
}

impl std::error::Error for ActionFailure {}

/// Result of the best-effort cart/backend reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    InSync,
    CancelledOrphan,
    Recreated,
    /// The check call or the corrective create/cancel failed.
    Failed(ActionFailure),
}

/// What a refresh did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshReport {
    /// `build()` has not completed; nothing happened.
    NotLoaded,
    Reconciled {
        decision: RefreshDecision,
        /// Failure of the stale-donation cancel, when one was needed.
        stale_cancel: Option<ActionFailure>,
        /// `None` when the widget is backend-based.
        sync: Option<SyncOutcome>,
    },
}

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    Created,
    Removed,
    Failed(ActionFailure),
    /// Another chain holds the widget; the click was dropped.
    Busy,
    NotLoaded,
}

/// Errors returned by the widget's lifecycle methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    AlreadyBuilt,
    NotBuilt,
    Content(ContentError),
    /// The quote for a refresh could not be obtained.
    Quote(ApiError),
    Action(ActionFailure),
}

impl fmt::Display for WidgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetError::AlreadyBuilt => write!(f, "widget is already built"),
            WidgetError::NotBuilt => write!(f, "widget is not built"),
            WidgetError::Content(e) => write!(f, "{e}"),
            WidgetError::Quote(e) => write!(f, "quote failed: {e}"),
            WidgetError::Action(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for WidgetError {}

impl From<ActionFailure> for WidgetError {
    fn from(e: ActionFailure) -> Self {
        WidgetError::Action(e)
    }
}
