//! Scenario: backend record follows the cart
//!
//! # Invariant under test
//! After a refresh the backend record matches the cart: an orphaned record
//! is cancelled, a missing or different one is recreated from the cart.
//! Sync failures are reported, never raised, and the button is enabled
//! again whatever happened.

use donmo_client::ApiError;
use donmo_schemas::{Amount, DonationRecord};
use donmo_testkit::{
    test_config, ApiOp, CartCall, Harness, InMemoryCart, ScriptedDonationApi, ViewOp, ORDER_ID,
};
use donmo_widget::{ActionFailure, ClickOutcome, RefreshReport, SyncOutcome, WidgetPhase};

fn sync_of(report: RefreshReport) -> Option<SyncOutcome> {
    match report {
        RefreshReport::Reconciled { sync, .. } => sync,
        RefreshReport::NotLoaded => None,
    }
}

#[tokio::test(start_paused = true)]
async fn orphaned_record_is_cancelled() {
    let h = Harness::new(
        ScriptedDonationApi::new().with_record(Amount::from_cents(200)),
        InMemoryCart::new(Amount::from_cents(10_000)),
    );

    let report = h.widget.build().await.unwrap();
    assert_eq!(sync_of(report), Some(SyncOutcome::CancelledOrphan));
    assert_eq!(h.api.record(), None);
    assert_eq!(h.cart.calls(), vec![CartCall::Remove]);
}

#[tokio::test(start_paused = true)]
async fn missing_record_is_recreated_from_cart() {
    let h = Harness::new(
        ScriptedDonationApi::new().quote_for(Amount::from_cents(9_877), Amount::from_cents(123)),
        InMemoryCart::new(Amount::from_cents(9_877)).with_donation(Amount::from_cents(123)),
    );

    let report = h.widget.build().await.unwrap();
    assert_eq!(sync_of(report), Some(SyncOutcome::Recreated));
    assert_eq!(h.api.record(), Some(Amount::from_cents(123)));
    assert_eq!(
        h.cart.calls(),
        vec![CartCall::Add(DonationRecord::new(
            Amount::from_cents(123),
            ORDER_ID
        ))]
    );
    assert_eq!(h.widget.snapshot().await.phase(), WidgetPhase::Confirmed);
}

#[tokio::test(start_paused = true)]
async fn different_record_is_replaced_with_cart_amount() {
    let h = Harness::new(
        ScriptedDonationApi::new()
            .quote_for(Amount::from_cents(9_877), Amount::from_cents(123))
            .with_record(Amount::from_cents(500)),
        InMemoryCart::new(Amount::from_cents(9_877)).with_donation(Amount::from_cents(123)),
    );

    let report = h.widget.build().await.unwrap();
    assert_eq!(sync_of(report), Some(SyncOutcome::Recreated));
    assert_eq!(h.api.record(), Some(Amount::from_cents(123)));
    assert_eq!(h.view.screen().amount, "1.23");
}

#[tokio::test(start_paused = true)]
async fn check_failure_is_reported_and_button_reenabled() {
    let h = Harness::new(
        ScriptedDonationApi::new(),
        InMemoryCart::new(Amount::from_cents(10_000)),
    );
    h.api.fail(ApiOp::Check, ApiError::Transport("timeout".to_string()));

    let report = h.widget.build().await.unwrap();
    assert!(matches!(
        sync_of(report),
        Some(SyncOutcome::Failed(ActionFailure::Transport(_)))
    ));

    let enabled: Vec<bool> = h
        .view
        .ops()
        .into_iter()
        .filter_map(|op| match op {
            ViewOp::Enabled(e) => Some(e),
            _ => None,
        })
        .collect();
    assert_eq!(enabled.last(), Some(&true));
    assert!(enabled.contains(&false), "control is disabled during sync");
    assert!(h.view.screen().enabled);
}

#[tokio::test(start_paused = true)]
async fn failed_recreate_is_reported() {
    let h = Harness::new(
        ScriptedDonationApi::new().quote_for(Amount::from_cents(9_877), Amount::from_cents(123)),
        InMemoryCart::new(Amount::from_cents(9_877)).with_donation(Amount::from_cents(123)),
    );
    h.api.fail(ApiOp::Create, ApiError::Rejected { status: 400 });

    let report = h.widget.build().await.unwrap();
    assert_eq!(
        sync_of(report),
        Some(SyncOutcome::Failed(ActionFailure::BackendRejection {
            status: 400
        }))
    );
    assert!(h.cart.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn explicit_sync_after_host_failure_cancels_orphan() {
    let h = Harness::new(
        ScriptedDonationApi::new().quote_for(Amount::from_cents(10_000), Amount::from_cents(123)),
        InMemoryCart::new(Amount::from_cents(10_000)),
    );
    h.widget.build().await.unwrap();

    // Backend accepted the donation but the host could not add it.
    h.cart.fail_add(Some(donmo_widget::HostError::new("cart locked")));
    assert!(matches!(h.widget.click().await, ClickOutcome::Failed(_)));
    assert_eq!(h.api.record(), Some(Amount::from_cents(123)));

    assert_eq!(
        h.widget.sync_with_backend().await,
        Ok(SyncOutcome::CancelledOrphan)
    );
    assert_eq!(h.api.record(), None);
}

#[tokio::test(start_paused = true)]
async fn backend_based_actions_only_touch_the_cart() {
    let h = Harness::with_config(
        test_config().backend_based(true),
        ScriptedDonationApi::new().quote_for(Amount::from_cents(10_000), Amount::from_cents(123)),
        InMemoryCart::new(Amount::from_cents(10_000)),
    );
    h.widget.build().await.unwrap();

    assert_eq!(h.widget.click().await, ClickOutcome::Created);
    assert_eq!(h.widget.click().await, ClickOutcome::Removed);

    assert_eq!(h.api.count(ApiOp::Create), 0);
    assert_eq!(h.api.count(ApiOp::Cancel), 0);
    assert_eq!(h.api.count(ApiOp::Check), 0);
    assert_eq!(h.cart.calls().len(), 2);
}
