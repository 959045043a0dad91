use donmo_schemas::{Amount, Quote};

use crate::{QuoteBasis, RefreshDecision, SyncAction, SyncReport};

/// Pick the amount to quote.
///
/// A zero or negative cart donation counts as none. The remaining total is
/// floored at zero: a cart donation larger than the order total cannot
/// produce a negative quote request.
pub fn quote_basis(order_total: Amount, cart_donation: Option<Amount>) -> QuoteBasis {
    match cart_donation.and_then(Amount::non_zero) {
        None => QuoteBasis::FullOrder { order_total },
        Some(cart_donation) => QuoteBasis::Remaining {
            remaining: order_total.saturating_sub_floor_zero(cart_donation),
            cart_donation,
        },
    }
}

/// Decide what a refresh does with the quote obtained for `basis`.
///
/// Comparison is exact on fixed-point micros.
pub fn decide_refresh(basis: &QuoteBasis, quote: &Quote) -> RefreshDecision {
    let currency = quote.currency_symbol.clone();
    match basis.cart_donation() {
        None => RefreshDecision::Suggest {
            amount: quote.donation_amount,
            currency,
        },
        Some(existing) if existing == quote.donation_amount => {
            RefreshDecision::AlreadyRoundedUp {
                amount: existing,
                currency,
            }
        }
        Some(stale) => RefreshDecision::ReplaceStale {
            stale,
            suggestion: quote.donation_amount,
            currency,
        },
    }
}

/// Reconcile the cart's donation against the backend record.
///
/// The cart is the source of truth for whether a donation should exist and
/// for its amount.
pub fn reconcile_backend(cart: Option<Amount>, recorded: Option<Amount>) -> SyncReport {
    let cart = cart.and_then(Amount::non_zero);
    let recorded = recorded.and_then(Amount::non_zero);

    let action = match (cart, recorded) {
        (None, Some(recorded)) => SyncAction::CancelOrphanedRecord { recorded },
        (Some(c), r) if r != Some(c) => SyncAction::RecreateFromCart {
            cart: c,
            recorded: r,
        },
        _ => SyncAction::InSync,
    };

    SyncReport {
        action,
        cart,
        recorded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(cents: i64) -> Quote {
        Quote {
            donation_amount: Amount::from_cents(cents),
            currency_symbol: "$".to_string(),
        }
    }

    #[test]
    fn zero_cart_is_full_order() {
        let b = quote_basis(Amount::from_cents(10_000), Some(Amount::ZERO));
        assert_eq!(
            b,
            QuoteBasis::FullOrder {
                order_total: Amount::from_cents(10_000)
            }
        );
    }

    #[test]
    fn remaining_floors_at_zero() {
        let b = quote_basis(Amount::from_cents(100), Some(Amount::from_cents(500)));
        assert_eq!(b.amount(), Amount::ZERO);
        assert_eq!(b.cart_donation(), Some(Amount::from_cents(500)));
    }

    #[test]
    fn decide_refresh_covers_all_branches() {
        let full = quote_basis(Amount::from_cents(10_000), None);
        assert!(matches!(
            decide_refresh(&full, &quote(123)),
            RefreshDecision::Suggest { .. }
        ));

        let remaining = quote_basis(Amount::from_cents(10_000), Some(Amount::from_cents(123)));
        assert!(matches!(
            decide_refresh(&remaining, &quote(123)),
            RefreshDecision::AlreadyRoundedUp { .. }
        ));
        assert!(matches!(
            decide_refresh(&remaining, &quote(77)),
            RefreshDecision::ReplaceStale { .. }
        ));
    }

    #[test]
    fn both_empty_is_in_sync() {
        assert!(reconcile_backend(None, None).is_in_sync());
        assert!(reconcile_backend(Some(Amount::ZERO), Some(Amount::ZERO)).is_in_sync());
    }
}
