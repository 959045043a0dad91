//! `DonmoRoundup`: the reconciliation engine behind one widget instance.
//!
//! Every entry point runs under a single session lock, so one chain
//! (build, refresh, click, sync) owns the state at a time. Inner steps take
//! the held `&mut Session` and never lock again.

use std::sync::Arc;

use donmo_client::DonationApi;
use donmo_config::WidgetConfig;
use donmo_reconcile::{decide_refresh, quote_basis, reconcile_backend, RefreshDecision, SyncAction};
use donmo_schemas::{Amount, DonationRecord};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::content::{ContentData, ContentProvider};
use crate::host::CartStore;
use crate::outcome::{ActionFailure, ClickOutcome, RefreshReport, SyncOutcome, WidgetError};
use crate::state::{DonationState, PhaseEvent, WidgetPhase};
use crate::timer::RevertTimer;
use crate::view::{DonationView, VisualState};

/// Round-up donation widget bound to one order.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct DonmoRoundup {
    inner: Arc<Inner>,
}

struct Inner {
    config: WidgetConfig,
    api: Arc<dyn DonationApi>,
    cart: Arc<dyn CartStore>,
    view: Arc<dyn DonationView>,
    content: Arc<dyn ContentProvider>,
    session: Mutex<Session>,
    revert: RevertTimer,
}

struct Session {
    state: DonationState,
    content: ContentData,
}

impl std::fmt::Debug for DonmoRoundup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DonmoRoundup")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl DonmoRoundup {
    pub fn new(
        config: WidgetConfig,
        api: Arc<dyn DonationApi>,
        cart: Arc<dyn CartStore>,
        view: Arc<dyn DonationView>,
        content: Arc<dyn ContentProvider>,
    ) -> Self {
        let state = DonationState::new(config.default_donation());
        Self {
            inner: Arc::new(Inner {
                config,
                api,
                cart,
                view,
                content,
                session: Mutex::new(Session {
                    state,
                    content: ContentData::default(),
                }),
                revert: RevertTimer::new(),
            }),
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    /// Copy of the current state. Waits for an in-flight chain to finish.
    pub async fn snapshot(&self) -> DonationState {
        self.inner.session.lock().await.state.clone()
    }

    /// Mount the widget: load content, show the default donation, then
    /// refresh against the cart.
    ///
    /// Errors from the initial refresh are returned, but the widget stays
    /// built.
    pub async fn build(&self) -> Result<RefreshReport, WidgetError> {
        let inner = &self.inner;
        let mut session = inner.session.lock().await;
        if session.state.phase() != WidgetPhase::Uninitialized {
            return Err(WidgetError::AlreadyBuilt);
        }

        let language = inner.config.language();
        let content = inner
            .content
            .load(language)
            .await
            .map_err(|e| {
                warn!(order_id = %inner.config.order_id(), language, error = %e, "content load failed");
                WidgetError::Content(e)
            })?
            .with_overrides(inner.config.overrides());

        inner.view.render_content(&content);
        session.content = content;
        inner.set_donation(&mut session, inner.config.default_donation());
        inner.view.set_button_text(session.content.roundup_message());
        session.state.is_loaded = true;
        inner.transition(&mut session, PhaseEvent::Built);
        info!(
            order_id = %inner.config.order_id(),
            language,
            backend_based = inner.config.is_backend_based(),
            "widget built"
        );

        inner.refresh_locked(&mut session).await
    }

    /// Re-derive the displayed donation from the cart and, unless
    /// backend-based, reconcile the backend record.
    ///
    /// Call on first load and whenever the order total changes.
    pub async fn refresh(&self) -> Result<RefreshReport, WidgetError> {
        let mut session = self.inner.session.lock().await;
        if !session.state.is_loaded {
            debug!("refresh before build ignored");
            return Ok(RefreshReport::NotLoaded);
        }
        self.inner.refresh_locked(&mut session).await
    }

    /// Make the cart and the backend record agree. Best effort: failures
    /// come back as [`SyncOutcome::Failed`].
    pub async fn sync_with_backend(&self) -> Result<SyncOutcome, WidgetError> {
        let mut session = self.inner.session.lock().await;
        if !session.state.is_loaded {
            return Err(WidgetError::NotBuilt);
        }
        Ok(self.inner.sync_locked(&mut session).await)
    }

    pub async fn create_donation(&self) -> Result<(), WidgetError> {
        let mut session = self.inner.session.lock().await;
        if !session.state.is_loaded {
            return Err(WidgetError::NotBuilt);
        }
        Ok(self.inner.create_locked(&mut session).await?)
    }

    pub async fn remove_donation(&self) -> Result<(), WidgetError> {
        let mut session = self.inner.session.lock().await;
        if !session.state.is_loaded {
            return Err(WidgetError::NotBuilt);
        }
        Ok(self.inner.remove_locked(&mut session).await?)
    }

    /// Shopper pressed the round-up button.
    ///
    /// Toggles: removes a confirmed donation, otherwise creates one. A click
    /// that arrives while another chain runs is dropped.
    pub async fn click(&self) -> ClickOutcome {
        let inner = &self.inner;
        let Ok(mut session) = inner.session.try_lock() else {
            debug!(order_id = %inner.config.order_id(), "click while busy dropped");
            return ClickOutcome::Busy;
        };
        if !session.state.is_loaded {
            return ClickOutcome::NotLoaded;
        }

        inner.view.set_busy(true);
        let result = if session.state.is_rounded_up() {
            inner
                .remove_locked(&mut session)
                .await
                .map(|()| ClickOutcome::Removed)
        } else {
            inner
                .create_locked(&mut session)
                .await
                .map(|()| ClickOutcome::Created)
        };
        inner.view.set_busy(false);

        result.unwrap_or_else(ClickOutcome::Failed)
    }
}

// ---------------------------------------------------------------------------
// Chains (session already held)
// ---------------------------------------------------------------------------

impl Inner {
    async fn refresh_locked(
        self: &Arc<Self>,
        session: &mut Session,
    ) -> Result<RefreshReport, WidgetError> {
        let existing = self.cart.existing_donation().await;
        let order_total = self.cart.grand_total().await;
        let basis = quote_basis(order_total, existing);

        let quote = match self.api.quote(basis.amount()).await {
            Ok(q) => q,
            Err(e) => {
                warn!(
                    order_id = %self.config.order_id(),
                    amount = %basis.amount(),
                    error = %e,
                    "quote failed"
                );
                self.show_error(session);
                return Err(WidgetError::Quote(e));
            }
        };

        let decision = decide_refresh(&basis, &quote);
        let mut stale_cancel = None;
        match &decision {
            RefreshDecision::Suggest { amount, currency } => {
                self.set_donation(session, *amount);
                self.set_currency(session, currency);
                self.transition(session, PhaseEvent::Quoted);
                self.settle(session);
                self.render_neutral(session);
            }
            RefreshDecision::AlreadyRoundedUp { amount, currency } => {
                self.set_donation(session, *amount);
                self.set_currency(session, currency);
                self.transition(session, PhaseEvent::RoundedUp);
                self.settle(session);
                self.render_success(session);
            }
            RefreshDecision::ReplaceStale {
                stale,
                suggestion,
                currency,
            } => {
                info!(
                    order_id = %self.config.order_id(),
                    stale = %stale,
                    suggestion = %suggestion,
                    "cart donation is stale; replacing"
                );
                self.set_currency(session, currency);
                self.set_donation(session, *stale);
                // The stale donation must be gone before the new one shows.
                match self.remove_locked(session).await {
                    Ok(()) => {
                        self.set_donation(session, *suggestion);
                        self.transition(session, PhaseEvent::Quoted);
                    }
                    Err(failure) => {
                        // The cart still holds the stale donation. Show it as
                        // confirmed so the next click retries the removal
                        // instead of adding it again.
                        self.transition(session, PhaseEvent::RoundedUp);
                        stale_cancel = Some(failure);
                    }
                }
            }
        }

        let sync = if self.config.is_backend_based() {
            None
        } else {
            Some(self.sync_locked(session).await)
        };

        Ok(RefreshReport::Reconciled {
            decision,
            stale_cancel,
            sync,
        })
    }

    async fn sync_locked(self: &Arc<Self>, session: &mut Session) -> SyncOutcome {
        self.view.set_button_enabled(false);
        let outcome = self.sync_steps(session).await;
        self.view.set_button_enabled(true);

        match &outcome {
            SyncOutcome::InSync => {}
            SyncOutcome::CancelledOrphan | SyncOutcome::Recreated => info!(
                order_id = %self.config.order_id(),
                outcome = ?outcome,
                "backend record reconciled"
            ),
            SyncOutcome::Failed(failure) => warn!(
                order_id = %self.config.order_id(),
                kind = failure.kind(),
                error = %failure,
                "backend sync failed"
            ),
        }
        outcome
    }

    async fn sync_steps(self: &Arc<Self>, session: &mut Session) -> SyncOutcome {
        let cart = self.cart.existing_donation().await;
        let recorded = match self.api.check(self.config.order_id()).await {
            Ok(r) => r,
            Err(e) => return SyncOutcome::Failed(e.into()),
        };

        let report = reconcile_backend(cart, recorded);
        debug!(
            order_id = %self.config.order_id(),
            action = ?report.action,
            "backend sync plan"
        );
        match report.action {
            SyncAction::InSync => SyncOutcome::InSync,
            SyncAction::CancelOrphanedRecord { .. } => match self.remove_locked(session).await {
                Ok(()) => SyncOutcome::CancelledOrphan,
                Err(f) => SyncOutcome::Failed(f),
            },
            SyncAction::RecreateFromCart { cart, .. } => {
                self.set_donation(session, cart);
                match self.create_locked(session).await {
                    Ok(()) => SyncOutcome::Recreated,
                    Err(f) => SyncOutcome::Failed(f),
                }
            }
        }
    }

    async fn create_locked(self: &Arc<Self>, session: &mut Session) -> Result<(), ActionFailure> {
        let record = DonationRecord::new(session.state.current_donation, self.config.order_id());

        let result = async {
            if !self.config.is_backend_based() {
                self.api.create(&record).await?;
            }
            self.cart.add_donation(&record).await?;
            Ok::<(), ActionFailure>(())
        }
        .await;

        match result {
            Ok(()) => {
                self.transition(session, PhaseEvent::RoundedUp);
                self.settle(session);
                self.render_success(session);
                info!(
                    order_id = %record.order_id,
                    amount = %record.donation_amount,
                    "donation created"
                );
                Ok(())
            }
            Err(failure) => {
                warn!(
                    order_id = %record.order_id,
                    amount = %record.donation_amount,
                    kind = failure.kind(),
                    error = %failure,
                    "donation create failed"
                );
                self.show_error(session);
                Err(failure)
            }
        }
    }

    async fn remove_locked(self: &Arc<Self>, session: &mut Session) -> Result<(), ActionFailure> {
        let order_id = self.config.order_id();

        let result = async {
            if !self.config.is_backend_based() {
                self.api.cancel(order_id).await?;
            }
            self.cart.remove_donation().await?;
            Ok::<(), ActionFailure>(())
        }
        .await;

        match result {
            Ok(()) => {
                self.transition(session, PhaseEvent::Cancelled);
                self.settle(session);
                self.render_neutral(session);
                info!(order_id, "donation removed");
                Ok(())
            }
            Err(failure) => {
                warn!(
                    order_id,
                    kind = failure.kind(),
                    error = %failure,
                    "donation remove failed"
                );
                self.show_error(session);
                Err(failure)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// View helpers
// ---------------------------------------------------------------------------

impl Inner {
    fn transition(&self, session: &mut Session, event: PhaseEvent) {
        if let Err(e) = session.state.apply(event) {
            warn!(order_id = %self.config.order_id(), error = %e, "transition rejected");
        }
    }

    /// Zero or negative falls back to the configured default.
    fn set_donation(&self, session: &mut Session, amount: Amount) {
        let amount = amount
            .non_zero()
            .unwrap_or_else(|| self.config.default_donation());
        session.state.current_donation = amount;
        self.view.set_amount(&amount.to_string());
    }

    fn set_currency(&self, session: &mut Session, symbol: &str) {
        session.state.currency_symbol = symbol.to_string();
        self.view.set_currency(symbol);
    }

    fn render_neutral(&self, session: &Session) {
        self.view.set_button_text(session.content.roundup_message());
        self.view.set_visual_state(VisualState::Neutral);
        self.view.set_button_title(None);
        self.view.set_button_enabled(true);
    }

    fn render_success(&self, session: &Session) {
        self.view.set_visual_state(VisualState::Success);
        self.view.set_button_text(session.content.thank_message());
        self.view
            .set_button_title(session.content.cancel_donation_message());
    }

    fn render_phase(&self, session: &Session) {
        if session.state.is_rounded_up() {
            self.render_success(session);
        } else {
            self.render_neutral(session);
        }
    }

    /// A state change went through: drop any error overlay.
    fn settle(&self, session: &mut Session) {
        self.revert.cancel();
        session.state.showing_error = false;
    }

    /// Show the error overlay and schedule its revert, replacing any
    /// revert already pending.
    fn show_error(self: &Arc<Self>, session: &mut Session) {
        session.state.showing_error = true;
        self.view.set_button_text(session.content.error_message());

        let weak = Arc::downgrade(self);
        self.revert.arm(self.config.error_revert(), async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut session = inner.session.lock().await;
            inner.revert_error(&mut session);
        });
    }

    fn revert_error(&self, session: &mut Session) {
        if !session.state.showing_error {
            return;
        }
        session.state.showing_error = false;
        self.render_phase(session);
        let current = session.state.current_donation;
        self.set_donation(session, current);
        debug!(order_id = %self.config.order_id(), "error view reverted");
    }
}
