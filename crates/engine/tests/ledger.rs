use chrono::{DateTime, TimeZone, Utc};
use sea_orm::Database;

use engine::{
    ApprovalStatus, BookingStatus, CreateBookingCmd, Engine, EngineError, NewListingCmd,
    PaymentConfirmedCmd, PaymentStatus, Policy, TransactionKind,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder()
        .database(db)
        .policy(Policy::default())
        .build()
}

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, minute, 0).unwrap()
}

#[tokio::test]
async fn wallet_is_created_lazily_and_empty() {
    let engine = engine_with_db().await;

    let wallet = engine.wallet("alice", at(9, 0)).await.unwrap();
    assert_eq!(wallet.balance, 0);
    assert_eq!(wallet.total_credited, 0);
    assert_eq!(wallet.total_debited, 0);

    let entries = engine.wallet_transactions("alice", None).await.unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn credit_and_debit_append_signed_entries_with_balance_after() {
    let engine = engine_with_db().await;

    engine
        .credit("alice", 500, TransactionKind::Credit, "top-up", at(9, 0))
        .await
        .unwrap();
    engine
        .debit("alice", 200, TransactionKind::Debit, "purchase", at(10, 0))
        .await
        .unwrap();

    let wallet = engine.wallet("alice", at(10, 1)).await.unwrap();
    assert_eq!(wallet.balance, 300);
    assert_eq!(wallet.total_credited, 500);
    assert_eq!(wallet.total_debited, 200);

    let entries = engine.wallet_transactions("alice", None).await.unwrap();
    assert_eq!(entries.len(), 2);
    // Newest first.
    assert_eq!(entries[0].amount, -200);
    assert_eq!(entries[0].balance_after, 300);
    assert_eq!(entries[0].kind, TransactionKind::Debit);
    assert_eq!(entries[1].amount, 500);
    assert_eq!(entries[1].balance_after, 500);

    // Balance equals the sum of signed ledger amounts.
    let sum: i64 = entries.iter().map(|e| e.amount).sum();
    assert_eq!(sum, wallet.balance);
}

#[tokio::test]
async fn overdraft_is_rejected_and_leaves_no_trace() {
    let engine = engine_with_db().await;
    engine
        .credit("alice", 100, TransactionKind::Credit, "top-up", at(9, 0))
        .await
        .unwrap();

    let err = engine
        .debit("alice", 101, TransactionKind::Debit, "too much", at(9, 30))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InsufficientBalance(_)));

    let wallet = engine.wallet("alice", at(9, 31)).await.unwrap();
    assert_eq!(wallet.balance, 100);
    assert_eq!(wallet.total_debited, 0);
    let entries = engine.wallet_transactions("alice", None).await.unwrap();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let engine = engine_with_db().await;

    let err = engine
        .credit("alice", 0, TransactionKind::Credit, "nothing", at(9, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let err = engine
        .debit("alice", -5, TransactionKind::Debit, "negative", at(9, 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn withdrawal_debits_with_its_own_kind() {
    let engine = engine_with_db().await;
    engine
        .credit("host", 800, TransactionKind::Earning, "earning", at(9, 0))
        .await
        .unwrap();

    let entry = engine.withdraw("host", 500, at(10, 0)).await.unwrap();
    assert_eq!(entry.amount, -500);
    assert_eq!(entry.kind, TransactionKind::Withdrawal);
    assert_eq!(entry.balance_after, 300);

    let err = engine.withdraw("host", 301, at(10, 5)).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientBalance(_)));
}

#[tokio::test]
async fn transaction_listing_honors_the_limit() {
    let engine = engine_with_db().await;
    for i in 0..5 {
        engine
            .credit("alice", 10, TransactionKind::Credit, "top-up", at(9, i))
            .await
            .unwrap();
    }

    let entries = engine.wallet_transactions("alice", Some(2)).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].balance_after, 50);
    assert_eq!(entries[1].balance_after, 40);
}

#[tokio::test]
async fn confirmed_top_up_credits_the_wallet() {
    let engine = engine_with_db().await;

    engine
        .payment_confirmed(
            PaymentConfirmedCmd::top_up("alice", 250, "upi", "order-77"),
            at(9, 0),
        )
        .await
        .unwrap();

    let wallet = engine.wallet("alice", at(9, 1)).await.unwrap();
    assert_eq!(wallet.balance, 250);
    let entries = engine.wallet_transactions("alice", None).await.unwrap();
    assert_eq!(entries[0].kind, TransactionKind::Credit);
    assert!(entries[0].description.contains("upi"));
}

#[tokio::test]
async fn confirmed_settlement_pays_the_booking() {
    let engine = engine_with_db().await;
    let cmd = NewListingCmd::new("host", "Spot", 100, at(8, 0), at(20, 0)).total_hours(12);
    let listing_id = engine.new_listing(cmd, at(7, 0)).await.unwrap();
    engine
        .set_listing_status(listing_id, ApprovalStatus::Approved)
        .await
        .unwrap();
    engine
        .credit("driver", 100, TransactionKind::Credit, "top-up", at(8, 0))
        .await
        .unwrap();

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
        .payment_confirmed(
            PaymentConfirmedCmd::settlement(booking.id, 300, "upi", "order-12"),
            at(9, 30),
        )
        .await
        .unwrap();

    let paid = engine.booking(booking.id).await.unwrap();
    assert_eq!(paid.payment_status, PaymentStatus::Completed);
    assert_eq!(paid.status, BookingStatus::Active);
    assert_eq!(paid.payment_reference.as_deref(), Some("order-12"));
}

#[tokio::test]
async fn fee_transfer_conserves_money_across_wallets() {
    let engine = engine_with_db().await;
    let cmd = NewListingCmd::new("host", "Spot", 100, at(8, 0), at(20, 0)).total_hours(12);
    let listing_id = engine.new_listing(cmd, at(7, 0)).await.unwrap();
    engine
        .set_listing_status(listing_id, ApprovalStatus::Approved)
        .await
        .unwrap();
    engine
        .credit("driver", 500, TransactionKind::Credit, "top-up", at(8, 0))
        .await
        .unwrap();

    engine
        .create_booking(
            CreateBookingCmd::new("driver", listing_id, at(9, 0), at(12, 0)),
            at(8, 30),
        )
        .await
        .unwrap();

    let driver = engine.wallet("driver", at(8, 31)).await.unwrap();
    let platform = engine.wallet("platform", at(8, 31)).await.unwrap();
    assert_eq!(driver.balance + platform.balance, 500);

    // Both legs of the fee transfer are on the ledger.
    let fee_out = engine.wallet_transactions("driver", Some(1)).await.unwrap();
    assert_eq!(fee_out[0].amount, -3);
    assert_eq!(fee_out[0].kind, TransactionKind::PlatformFee);
    let fee_in = engine
        .wallet_transactions("platform", Some(1))
        .await
        .unwrap();
    assert_eq!(fee_in[0].amount, 3);
    assert_eq!(fee_in[0].kind, TransactionKind::PlatformFee);
}
