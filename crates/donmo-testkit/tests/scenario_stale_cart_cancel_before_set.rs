//! Scenario: stale cart donation is cancelled before the new one shows
//!
//! # Invariant under test
//! A cart donation that no longer matches the quote for the order is
//! removed (backend cancel, then cart callback) before the fresh quote is
//! displayed. If the removal fails the fresh quote is never displayed, the
//! error overlay is shown, and the widget treats the stale donation as
//! confirmed so the next click retries the removal rather than adding it
//! again.

use donmo_client::ApiError;
use donmo_reconcile::RefreshDecision;
use donmo_schemas::Amount;
use donmo_testkit::{
    ApiCall, ApiOp, CartCall, Harness, InMemoryCart, ScriptedDonationApi, ViewOp, OOPS, ORDER_ID,
    REVERT, ROUNDUP, THANKS,
};
use donmo_widget::{
    ActionFailure, ClickOutcome, RefreshReport, SyncOutcome, VisualState, WidgetPhase,
};
use std::time::Duration;

/// Goods grew to 150.40 while the cart still carries the 1.23 donation
/// quoted for the old total. The default quote for 150.40 is 0.60.
fn harness() -> Harness {
    Harness::new(
        ScriptedDonationApi::new().with_record(Amount::from_cents(123)),
        InMemoryCart::new(Amount::from_cents(15_040)).with_donation(Amount::from_cents(123)),
    )
}

#[tokio::test(start_paused = true)]
async fn stale_donation_is_replaced_by_fresh_suggestion() {
    let h = harness();

    let report = h.widget.build().await.unwrap();
    assert_eq!(
        report,
        RefreshReport::Reconciled {
            decision: RefreshDecision::ReplaceStale {
                stale: Amount::from_cents(123),
                suggestion: Amount::from_cents(60),
                currency: "$".to_string(),
            },
            stale_cancel: None,
            sync: Some(SyncOutcome::InSync),
        }
    );

    assert_eq!(
        h.api.calls(),
        vec![
            ApiCall::Quote(Amount::from_cents(15_040)),
            ApiCall::Cancel(ORDER_ID.to_string()),
            ApiCall::Check(ORDER_ID.to_string()),
        ]
    );
    assert_eq!(h.cart.calls(), vec![CartCall::Remove]);
    assert_eq!(h.cart.donation(), None);
    assert_eq!(h.api.record(), None);

    let screen = h.view.screen();
    assert_eq!(screen.amount, "0.60");
    assert_eq!(screen.button_text, ROUNDUP);
    assert_eq!(screen.visual, VisualState::Neutral);

    let state = h.widget.snapshot().await;
    assert_eq!(state.phase(), WidgetPhase::Pending);
    assert_eq!(state.current_donation, Amount::from_cents(60));
}

#[tokio::test(start_paused = true)]
async fn suggestion_is_shown_only_after_removal_rendered() {
    let h = harness();
    h.widget.build().await.unwrap();

    // The neutral view from the removal precedes the fresh amount.
    let ops = h.view.ops();
    let neutral = ops
        .iter()
        .rposition(|op| *op == ViewOp::Visual(VisualState::Neutral))
        .unwrap();
    let fresh = ops
        .iter()
        .position(|op| *op == ViewOp::Amount("0.60".to_string()))
        .unwrap();
    assert!(neutral < fresh, "ops: {ops:?}");
}

#[tokio::test(start_paused = true)]
async fn failed_cancel_never_shows_the_fresh_quote() {
    let h = harness();
    h.api.fail(ApiOp::Cancel, ApiError::Rejected { status: 500 });

    let report = h.widget.build().await.unwrap();
    let RefreshReport::Reconciled {
        stale_cancel, sync, ..
    } = report
    else {
        panic!("widget was built");
    };
    assert_eq!(
        stale_cancel,
        Some(ActionFailure::BackendRejection { status: 500 })
    );
    // Cart and backend still agree on the stale amount.
    assert_eq!(sync, Some(SyncOutcome::InSync));

    assert!(!h.view.amounts().contains(&"0.60".to_string()));
    assert!(h.cart.calls().is_empty(), "host remove must follow a successful cancel");
    assert_eq!(h.cart.donation(), Some(Amount::from_cents(123)));
    assert_eq!(h.view.screen().button_text, OOPS);

    let state = h.widget.snapshot().await;
    assert_eq!(state.phase(), WidgetPhase::Confirmed);
    assert!(state.is_rounded_up());
    assert_eq!(state.current_donation, Amount::from_cents(123));

    tokio::time::sleep(REVERT + Duration::from_millis(1)).await;
    let screen = h.view.screen();
    assert_eq!(screen.button_text, THANKS);
    assert_eq!(screen.visual, VisualState::Success);
    assert_eq!(screen.amount, "1.23");
}

#[tokio::test(start_paused = true)]
async fn click_after_failed_stale_cancel_retries_removal() {
    let h = harness();
    h.api.fail(ApiOp::Cancel, ApiError::Rejected { status: 500 });
    h.widget.build().await.unwrap();
    tokio::time::sleep(REVERT + Duration::from_millis(1)).await;

    h.api.heal(ApiOp::Cancel);
    assert_eq!(h.widget.click().await, ClickOutcome::Removed);

    // The stale amount is never added back to the cart.
    assert_eq!(h.cart.calls(), vec![CartCall::Remove]);
    assert_eq!(h.cart.donation(), None);
    assert_eq!(h.api.record(), None);
    assert_eq!(h.api.count(ApiOp::Create), 0);

    let state = h.widget.snapshot().await;
    assert_eq!(state.phase(), WidgetPhase::Idle);

    let report = h.widget.refresh().await.unwrap();
    let RefreshReport::Reconciled { decision, .. } = report else {
        panic!("widget was built");
    };
    assert_eq!(
        decision,
        RefreshDecision::Suggest {
            amount: Amount::from_cents(60),
            currency: "$".to_string(),
        }
    );
    assert_eq!(h.view.screen().amount, "0.60");
}

#[tokio::test(start_paused = true)]
async fn order_change_after_round_up_replaces_donation() {
    let h = Harness::new(
        ScriptedDonationApi::new().quote_for(Amount::from_cents(9_877), Amount::from_cents(123)),
        InMemoryCart::new(Amount::from_cents(9_877)),
    );
    h.widget.build().await.unwrap();
    assert_eq!(h.widget.click().await, donmo_widget::ClickOutcome::Created);

    // Shopper adds an item; the page refreshes the widget.
    h.cart.set_goods_total(Amount::from_cents(12_050));
    let report = h.widget.refresh().await.unwrap();
    assert!(matches!(
        report,
        RefreshReport::Reconciled {
            decision: RefreshDecision::ReplaceStale { .. },
            stale_cancel: None,
            ..
        }
    ));

    assert_eq!(h.cart.donation(), None);
    assert_eq!(h.view.screen().amount, "0.50");
    assert!(!h.widget.snapshot().await.is_rounded_up());
}
