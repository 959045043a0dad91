//! In-memory host cart.

use std::sync::{Mutex, MutexGuard};

use donmo_schemas::{Amount, DonationRecord};
use donmo_widget::{CartStore, HostError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CartCall {
    Add(DonationRecord),
    Remove,
}

#[derive(Default)]
struct CartState {
    goods_total: Amount,
    donation: Option<Amount>,
    fail_add: Option<HostError>,
    fail_remove: Option<HostError>,
    calls: Vec<CartCall>,
}

/// Cart whose grand total is the goods total plus the donation line.
#[derive(Default)]
pub struct InMemoryCart {
    state: Mutex<CartState>,
}

impl InMemoryCart {
    pub fn new(goods_total: Amount) -> Self {
        let cart = Self::default();
        cart.lock().goods_total = goods_total;
        cart
    }

    pub fn with_donation(self, amount: Amount) -> Self {
        self.lock().donation = Some(amount);
        self
    }

    /// The shopper changed the order; the donation line stays.
    pub fn set_goods_total(&self, goods_total: Amount) {
        self.lock().goods_total = goods_total;
    }

    pub fn donation(&self) -> Option<Amount> {
        self.lock().donation
    }

    pub fn fail_add(&self, err: Option<HostError>) {
        self.lock().fail_add = err;
    }

    pub fn fail_remove(&self, err: Option<HostError>) {
        self.lock().fail_remove = err;
    }

    pub fn calls(&self) -> Vec<CartCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl CartStore for InMemoryCart {
    async fn existing_donation(&self) -> Option<Amount> {
        self.lock().donation
    }

    async fn grand_total(&self) -> Amount {
        let st = self.lock();
        st.goods_total + st.donation.unwrap_or_default()
    }

    async fn add_donation(&self, record: &DonationRecord) -> Result<(), HostError> {
        let mut st = self.lock();
        st.calls.push(CartCall::Add(record.clone()));
        if let Some(err) = &st.fail_add {
            return Err(err.clone());
        }
        st.donation = Some(record.donation_amount);
        Ok(())
    }

    async fn remove_donation(&self) -> Result<(), HostError> {
        let mut st = self.lock();
        st.calls.push(CartCall::Remove);
        if let Some(err) = &st.fail_remove {
            return Err(err.clone());
        }
        st.donation = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn grand_total_saturates_near_max() {
        let cart = InMemoryCart::new(Amount::from_micros(i64::MAX))
            .with_donation(Amount::from_cents(123));
        assert_eq!(cart.grand_total().await, Amount::from_micros(i64::MAX));
    }
}
