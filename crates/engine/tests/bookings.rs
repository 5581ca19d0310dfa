use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    ApprovalStatus, BookingStatus, CancelledBy, CreateBookingCmd, Engine, EngineError, EventKind,
    FeeCollection, NewListingCmd, PaymentStatus, Policy, RecordingSink, SettlementMode,
    TransactionKind, User, UserRole,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    engine_with_policy(Policy::default()).await
}

async fn engine_with_policy(policy: Policy) -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).policy(policy).build()
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, minute, 0).unwrap()
}

/// An approved listing at 100/hour with the given capacity, open 08:00-20:00.
async fn approved_listing(engine: &Engine, owner: &str, spaces: i32) -> Uuid {
    let cmd = NewListingCmd::new(owner, "Covered spot", 100, at(8, 0), at(20, 0))
        .address("12 Main St")
        .spaces(spaces)
        .total_hours(12);
    let listing_id = engine.new_listing(cmd, at(7, 0)).await.unwrap();
    engine
        .set_listing_status(listing_id, ApprovalStatus::Approved)
        .await
        .unwrap();
    listing_id
}

async fn fund(engine: &Engine, user: &str, amount: i64) {
    engine
        .credit(user, amount, TransactionKind::Credit, "top-up", at(7, 30))
        .await
        .unwrap();
}

#[tokio::test]
async fn registered_accounts_can_be_looked_up() {
    let engine = engine_with_db().await;
    engine
        .register_user(User {
            id: "driver".to_string(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
            role: UserRole::Driver,
        })
        .await
        .unwrap();

    let user = engine.user("driver").await.unwrap();
    assert_eq!(user.role, UserRole::Driver);

    let err = engine.user("nobody").await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn create_booking_reserves_spots_and_charges_upfront_fee() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 3).await;
    fund(&engine, "driver", 100).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0))
                .vehicle("4-wheeler", "TN 45 A 1234"),
            at(8, 30),
        )
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_price, 300);
    assert_eq!(booking.platform_fee, 3);
    assert_eq!(booking.price_per_hour, 100);

    let listing = engine.listing(listing_id).await.unwrap();
    assert_eq!(listing.available_spaces, 2);

    let driver = engine.wallet("driver", at(8, 31)).await.unwrap();
    assert_eq!(driver.balance, 97);
    let platform = engine.wallet("platform", at(8, 31)).await.unwrap();
    assert_eq!(platform.balance, 3);
}

#[tokio::test]
async fn create_booking_rejects_unapproved_listing() {
    let engine = engine_with_db().await;
    let cmd = NewListingCmd::new("host", "Spot", 100, at(8, 0), at(20, 0));
    let listing_id = engine.new_listing(cmd, at(7, 0)).await.unwrap();

    let err = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[tokio::test]
async fn create_booking_rejects_window_outside_availability() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 100).await;

    let err = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(6, 0), at(9, 0)),
            at(5, 0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn failed_fee_debit_rolls_back_the_reservation() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 3).await;
    // Driver wallet never funded.

    let err = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientBalance(_)));

    let listing = engine.listing(listing_id).await.unwrap();
    assert_eq!(listing.available_spaces, 3);
}

#[tokio::test]
async fn last_spot_cannot_be_booked_twice() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver-a", 100).await;
    fund(&engine, "driver-b", 100).await;

    engine
        .create_booking(
            CreateBookingCmd::new("driver-a", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    let err = engine
        .create_booking(
            CreateBookingCmd::new("driver-b", listing_id, at(9, 0), at(12, 0)),
            at(8, 31),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientCapacity(_)));
}

#[tokio::test]
async fn minimum_rental_fraction_is_enforced_when_enabled() {
    let policy = Policy {
        min_rental_fraction: Some(0.7),
        ..Policy::default()
    };
    let engine = engine_with_policy(policy).await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 1300).await;

    // 12h listing with a 0.7 floor needs at least 8.4 booked hours.
    let err = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(18, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn owner_accepts_a_pending_booking() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 100).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();

    let err = engine
        .accept_booking(booking.id, "somebody-else", at(8, 40))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    let accepted = engine
        .accept_booking(booking.id, "host", at(8, 45))
        .await
        .unwrap();
    assert_eq!(accepted.status, BookingStatus::Confirmed);
    assert!(accepted.is_confirmed_by_owner);
    assert_eq!(accepted.confirmed_at, Some(at(8, 45)));

    let err = engine
        .accept_booking(booking.id, "host", at(8, 46))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[tokio::test]
async fn payment_inside_window_activates_the_booking() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 100).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    engine
        .accept_booking(booking.id, "host", at(8, 45))
        .await
        .unwrap();

    let err = engine
        .mark_payment_completed(booking.id, 999, "upi", "pay-1", at(9, 30))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    engine
        .mark_payment_completed(booking.id, 300, "upi", "pay-1", at(9, 30))
        .await
        .unwrap();

    let paid = engine.booking(booking.id).await.unwrap();
    assert_eq!(paid.status, BookingStatus::Active);
    assert_eq!(paid.payment_status, PaymentStatus::Completed);
    assert_eq!(paid.payment_method.as_deref(), Some("upi"));
    assert_eq!(paid.payment_reference.as_deref(), Some("pay-1"));

    let err = engine
        .mark_payment_completed(booking.id, 300, "upi", "pay-2", at(9, 35))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[tokio::test]
async fn payment_before_window_keeps_the_booking_confirmed() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 100).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(10, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    engine
        .accept_booking(booking.id, "host", at(8, 45))
        .await
        .unwrap();
    engine
        .mark_payment_completed(booking.id, 200, "card", "pay-1", at(9, 0))
        .await
        .unwrap();

    let paid = engine.booking(booking.id).await.unwrap();
    assert_eq!(paid.status, BookingStatus::Confirmed);
    assert_eq!(paid.payment_status, PaymentStatus::Completed);
}

#[tokio::test]
async fn cancelling_an_unpaid_booking_releases_without_refund() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 100).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();

    let cancelled = engine
        .cancel_booking(booking.id, "driver", at(8, 40))
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by, Some(CancelledBy::Driver));
    assert_eq!(cancelled.payment_status, PaymentStatus::Pending);

    let listing = engine.listing(listing_id).await.unwrap();
    assert_eq!(listing.available_spaces, 1);

    // Upfront fee stays with the platform.
    let driver = engine.wallet("driver", at(8, 41)).await.unwrap();
    assert_eq!(driver.balance, 97);
}

#[tokio::test]
async fn cancelling_a_paid_booking_refunds_the_full_price() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 400).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    engine
        .accept_booking(booking.id, "host", at(8, 45))
        .await
        .unwrap();
    engine
        .mark_payment_completed(booking.id, 300, "upi", "pay-1", at(9, 30))
        .await
        .unwrap();

    let cancelled = engine
        .cancel_booking(booking.id, "host", at(10, 0))
        .await
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by, Some(CancelledBy::Owner));
    assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);

    // 400 funded, 3 fee out, 300 refund in.
    let driver = engine.wallet("driver", at(10, 1)).await.unwrap();
    assert_eq!(driver.balance, 697);

    let listing = engine.listing(listing_id).await.unwrap();
    assert_eq!(listing.available_spaces, 1);

    let err = engine
        .cancel_booking(booking.id, "driver", at(10, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[tokio::test]
async fn strangers_cannot_cancel() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 100).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    let err = engine
        .cancel_booking(booking.id, "intruder", at(8, 40))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));
}

#[tokio::test]
async fn completion_credits_the_host_and_is_idempotent() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 400).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    engine
        .accept_booking(booking.id, "host", at(8, 45))
        .await
        .unwrap();
    engine
        .mark_payment_completed(booking.id, 300, "cash", "pay-1", at(9, 30))
        .await
        .unwrap();

    assert!(engine.complete_booking(booking.id, at(12, 30)).await.unwrap());

    let done = engine.booking(booking.id).await.unwrap();
    assert_eq!(done.status, BookingStatus::Completed);
    assert_eq!(done.completed_at, Some(at(12, 30)));

    let listing = engine.listing(listing_id).await.unwrap();
    assert_eq!(listing.available_spaces, 1);
    assert_eq!(listing.total_bookings, 1);

    // Upfront fee policy: the host keeps the full price.
    let host = engine.wallet("host", at(12, 31)).await.unwrap();
    assert_eq!(host.balance, 300);

    // Completing again is a no-op, not a second payout.
    assert!(!engine.complete_booking(booking.id, at(12, 35)).await.unwrap());
    let host = engine.wallet("host", at(12, 36)).await.unwrap();
    assert_eq!(host.balance, 300);
    let listing = engine.listing(listing_id).await.unwrap();
    assert_eq!(listing.available_spaces, 1);
    assert_eq!(listing.total_bookings, 1);
}

#[tokio::test]
async fn pending_and_cancelled_bookings_cannot_complete() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 100).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    let err = engine
        .complete_booking(booking.id, at(12, 30))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));

    engine
        .cancel_booking(booking.id, "driver", at(8, 40))
        .await
        .unwrap();
    let err = engine
        .complete_booking(booking.id, at(12, 30))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidState(_)));
}

#[tokio::test]
async fn ledger_settlement_moves_money_at_payment_time() {
    let policy = Policy {
        fee_rate_bps: 500,
        fee_collection: FeeCollection::OnSettlement,
        settlement: SettlementMode::LedgerOnPayment,
        ..Policy::default()
    };
    let engine = engine_with_policy(policy).await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 1000).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    assert_eq!(booking.total_price, 300);
    assert_eq!(booking.platform_fee, 15);

    // No upfront fee under this policy.
    let driver = engine.wallet("driver", at(8, 31)).await.unwrap();
    assert_eq!(driver.balance, 1000);

    engine
        .accept_booking(booking.id, "host", at(8, 45))
        .await
        .unwrap();
    engine
        .mark_payment_completed(booking.id, 300, "wallet", "pay-1", at(9, 30))
        .await
        .unwrap();

    let driver = engine.wallet("driver", at(9, 31)).await.unwrap();
    assert_eq!(driver.balance, 700);
    let host = engine.wallet("host", at(9, 31)).await.unwrap();
    assert_eq!(host.balance, 285);
    let platform = engine.wallet("platform", at(9, 31)).await.unwrap();
    assert_eq!(platform.balance, 15);

    // Completion moves no further money.
    assert!(engine.complete_booking(booking.id, at(12, 30)).await.unwrap());
    let host = engine.wallet("host", at(12, 31)).await.unwrap();
    assert_eq!(host.balance, 285);

    // Exactly one earning entry across payment, completion and sweeps.
    engine.run_lifecycle_sweep(at(13, 0)).await.unwrap();
    let earnings = engine
        .wallet_transactions("host", None)
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.kind == TransactionKind::Earning)
        .count();
    assert_eq!(earnings, 1);
}

#[tokio::test]
async fn cancelling_a_paid_booking_conserves_money_under_ledger_settlement() {
    let policy = Policy {
        fee_rate_bps: 500,
        fee_collection: FeeCollection::OnSettlement,
        settlement: SettlementMode::LedgerOnPayment,
        ..Policy::default()
    };
    let engine = engine_with_policy(policy).await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 1000).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    engine
        .accept_booking(booking.id, "host", at(8, 45))
        .await
        .unwrap();
    engine
        .mark_payment_completed(booking.id, 300, "wallet", "pay-1", at(9, 30))
        .await
        .unwrap();

    // Payment spread 300 across host (285) and platform (15); cancellation
    // must pull the full 300 back out of those wallets, not mint it.
    engine
        .cancel_booking(booking.id, "driver", at(10, 0))
        .await
        .unwrap();

    let driver = engine.wallet("driver", at(10, 1)).await.unwrap();
    let host = engine.wallet("host", at(10, 1)).await.unwrap();
    let platform = engine.wallet("platform", at(10, 1)).await.unwrap();
    assert_eq!(driver.balance, 1000);
    assert_eq!(host.balance, 0);
    assert_eq!(platform.balance, 0);
    assert_eq!(driver.balance + host.balance + platform.balance, 1000);
}

#[tokio::test]
async fn failed_refund_is_retryable_after_cancellation() {
    let policy = Policy {
        fee_rate_bps: 500,
        fee_collection: FeeCollection::OnSettlement,
        settlement: SettlementMode::LedgerOnPayment,
        ..Policy::default()
    };
    let engine = engine_with_policy(policy).await;
    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 1000).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    engine
        .accept_booking(booking.id, "host", at(8, 45))
        .await
        .unwrap();
    engine
        .mark_payment_completed(booking.id, 300, "wallet", "pay-1", at(9, 30))
        .await
        .unwrap();

    // The host empties their wallet, so the payout reversal cannot be funded.
    engine.withdraw("host", 285, at(9, 45)).await.unwrap();

    let err = engine
        .cancel_booking(booking.id, "driver", at(10, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientBalance(_)));

    // The cancellation committed but the refund did not: nothing was paid
    // out and the booking still records the payment as owed back.
    let current = engine.booking(booking.id).await.unwrap();
    assert_eq!(current.status, BookingStatus::Cancelled);
    assert_eq!(current.payment_status, PaymentStatus::Completed);
    let driver = engine.wallet("driver", at(10, 1)).await.unwrap();
    assert_eq!(driver.balance, 700);
    let listing = engine.listing(listing_id).await.unwrap();
    assert_eq!(listing.available_spaces, 1);

    // Once the host is funded again, re-invoking finishes the refund.
    engine
        .credit("host", 285, TransactionKind::Credit, "top-up", at(10, 5))
        .await
        .unwrap();
    let cancelled = engine
        .cancel_booking(booking.id, "driver", at(10, 10))
        .await
        .unwrap();
    assert_eq!(cancelled.payment_status, PaymentStatus::Refunded);

    let driver = engine.wallet("driver", at(10, 11)).await.unwrap();
    assert_eq!(driver.balance, 1000);
    let refunds = engine
        .wallet_transactions("driver", None)
        .await
        .unwrap()
        .into_iter()
        .filter(|e| e.kind == TransactionKind::Refund)
        .count();
    assert_eq!(refunds, 1);

    // The spots were not released a second time on the retry.
    let listing = engine.listing(listing_id).await.unwrap();
    assert_eq!(listing.available_spaces, 1);
}

#[tokio::test]
async fn lifecycle_emits_events_to_the_sink() {
    let sink = Arc::new(RecordingSink::new());
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db)
        .events(sink.clone())
        .build();

    let listing_id = approved_listing(&engine, "host", 1).await;
    fund(&engine, "driver", 400).await;

    let booking = engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    engine
        .accept_booking(booking.id, "host", at(8, 45))
        .await
        .unwrap();
    engine
        .mark_payment_completed(booking.id, 300, "upi", "pay-1", at(9, 30))
        .await
        .unwrap();
    engine.complete_booking(booking.id, at(12, 30)).await.unwrap();

    assert_eq!(sink.count(EventKind::BookingRequested), 1);
    assert_eq!(sink.count(EventKind::BookingConfirmed), 1);
    assert_eq!(sink.count(EventKind::BookingPaymentCompleted), 1);
    assert_eq!(sink.count(EventKind::BookingCompleted), 1);
    assert_eq!(sink.count(EventKind::BookingCancelled), 0);
}

#[tokio::test]
async fn booking_queries_by_party_and_listing() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 3).await;
    fund(&engine, "driver-a", 100).await;
    fund(&engine, "driver-b", 100).await;

    let first = engine
        .create_booking(
            CreateBookingCmd::new("driver-a", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();
    let second = engine
        .create_booking(
            CreateBookingCmd::new("driver-b", listing_id, at(13, 0), at(15, 0)),
            at(8, 35),
        )
        .await
        .unwrap();

    let mine = engine.bookings_for_driver("driver-a", None).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, first.id);

    let incoming = engine.bookings_for_owner("host", None).await.unwrap();
    assert_eq!(incoming.len(), 2);
    // Newest first.
    assert_eq!(incoming[0].id, second.id);

    let on_listing = engine
        .bookings_for_listing(listing_id, None)
        .await
        .unwrap();
    assert_eq!(on_listing.len(), 2);

    engine
        .cancel_booking(first.id, "driver-a", at(8, 40))
        .await
        .unwrap();
    let still_pending = engine
        .bookings_for_owner("host", Some(BookingStatus::Pending))
        .await
        .unwrap();
    assert_eq!(still_pending.len(), 1);
    assert_eq!(still_pending[0].id, second.id);
}

#[tokio::test]
async fn releasing_beyond_capacity_is_an_invariant_violation() {
    let engine = engine_with_db().await;
    let listing_id = approved_listing(&engine, "host", 2).await;

    engine.reserve_spots(listing_id, 1).await.unwrap();
    engine.release_spots(listing_id, 1).await.unwrap();

    // All spots are free again; another release must not clamp silently.
    let err = engine.release_spots(listing_id, 1).await.unwrap_err();
    assert!(matches!(err, EngineError::InvariantViolation(_)));

    let listing = engine.listing(listing_id).await.unwrap();
    assert_eq!(listing.available_spaces, 2);
}
