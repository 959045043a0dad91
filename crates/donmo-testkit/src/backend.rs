//! Deterministic in-memory donation backend.
//!
//! Holds at most one donation record (the widget is bound to one order),
//! logs every call, and fails any operation on request. No network I/O.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use donmo_client::{ApiError, DonationApi};
use donmo_schemas::{Amount, DonationRecord, Quote, MICROS_SCALE};

/// Which backend operation an injected failure applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiOp {
    Quote,
    Check,
    Create,
    Cancel,
}

/// One call as the backend received it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApiCall {
    Quote(Amount),
    Check(String),
    Create(DonationRecord),
    Cancel(String),
}

impl ApiCall {
    pub fn op(&self) -> ApiOp {
        match self {
            ApiCall::Quote(_) => ApiOp::Quote,
            ApiCall::Check(_) => ApiOp::Check,
            ApiCall::Create(_) => ApiOp::Create,
            ApiCall::Cancel(_) => ApiOp::Cancel,
        }
    }
}

#[derive(Default)]
struct BackendState {
    currency: String,
    quotes: HashMap<Amount, Amount>,
    record: Option<Amount>,
    failures: HashMap<ApiOp, ApiError>,
    calls: Vec<ApiCall>,
}

/// Scripted [`DonationApi`].
///
/// Quotes come from [`quote_for`](Self::quote_for) entries; an amount with
/// no entry is quoted up to the next whole unit (a full unit when the
/// amount is already whole).
pub struct ScriptedDonationApi {
    state: Mutex<BackendState>,
    latency: Duration,
}

impl Default for ScriptedDonationApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedDonationApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BackendState {
                currency: "$".to_string(),
                ..Default::default()
            }),
            latency: Duration::ZERO,
        }
    }

    /// Every call sleeps this long before answering (on the Tokio clock).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_currency(self, symbol: &str) -> Self {
        self.lock().currency = symbol.to_string();
        self
    }

    /// Answer a quote for `order_amount` with `donation`.
    pub fn quote_for(self, order_amount: Amount, donation: Amount) -> Self {
        self.lock().quotes.insert(order_amount, donation);
        self
    }

    pub fn with_record(self, amount: Amount) -> Self {
        self.set_record(Some(amount));
        self
    }

    pub fn set_record(&self, amount: Option<Amount>) {
        self.lock().record = amount;
    }

    pub fn record(&self) -> Option<Amount> {
        self.lock().record
    }

    /// Fail every `op` call with `err` until [`heal`](Self::heal).
    pub fn fail(&self, op: ApiOp, err: ApiError) {
        self.lock().failures.insert(op, err);
    }

    pub fn heal(&self, op: ApiOp) {
        self.lock().failures.remove(&op);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub fn count(&self, op: ApiOp) -> usize {
        self.lock().calls.iter().filter(|c| c.op() == op).count()
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn enter(&self, call: ApiCall) -> Result<(), ApiError> {
        let op = call.op();
        {
            let mut st = self.lock();
            st.calls.push(call);
            if let Some(err) = st.failures.get(&op) {
                return Err(err.clone());
            }
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(())
    }
}

/// Distance to the next whole unit; a full unit when already whole.
fn round_up_to_unit(amount: Amount) -> Amount {
    let rem = amount.micros().rem_euclid(MICROS_SCALE);
    Amount::from_micros(MICROS_SCALE - rem)
}

#[async_trait::async_trait]
impl DonationApi for ScriptedDonationApi {
    async fn quote(&self, order_amount: Amount) -> Result<Quote, ApiError> {
        self.enter(ApiCall::Quote(order_amount)).await?;
        let st = self.lock();
        let donation = st
            .quotes
            .get(&order_amount)
            .copied()
            .unwrap_or_else(|| round_up_to_unit(order_amount));
        Ok(Quote {
            donation_amount: donation,
            currency_symbol: st.currency.clone(),
        })
    }

    async fn check(&self, order_id: &str) -> Result<Option<Amount>, ApiError> {
        self.enter(ApiCall::Check(order_id.to_string())).await?;
        Ok(self.lock().record.and_then(Amount::non_zero))
    }

    async fn create(&self, record: &DonationRecord) -> Result<(), ApiError> {
        self.enter(ApiCall::Create(record.clone())).await?;
        self.lock().record = Some(record.donation_amount);
        Ok(())
    }

    async fn cancel(&self, order_id: &str) -> Result<(), ApiError> {
        self.enter(ApiCall::Cancel(order_id.to_string())).await?;
        self.lock().record = None;
        Ok(())
    }
}
