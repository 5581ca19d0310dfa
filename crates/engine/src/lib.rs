//! Core of the Kerbside parking marketplace: the booking lifecycle state
//! machine, the per-listing availability counter, and the wallet ledger that
//! moves money in lockstep with booking state changes.
//!
//! The engine owns a [`sea_orm::DatabaseConnection`] and expresses every
//! mutation as a short, atomic, status-guarded update; callers (HTTP layer,
//! payment layer, scheduler) live outside this crate and talk to it through
//! the `Engine` methods and command structs.

pub use bookings::{Booking, BookingStatus, CancelledBy, PaymentStatus};
pub use commands::{CreateBookingCmd, NewListingCmd, PaymentConfirmedCmd, PaymentPurpose};
pub use error::EngineError;
pub use events::{DomainEvent, EventKind, EventSink, RecordingSink, TracingSink};
pub use listings::{ApprovalStatus, Listing};
pub use ops::{Engine, EngineBuilder, SweepReport};
pub use policy::{FeeCollection, Policy, SettlementMode};
pub use users::{User, UserRole};
pub use wallet_transactions::{TransactionKind, WalletTransaction};
pub use wallets::Wallet;

mod bookings;
mod commands;
mod error;
mod events;
pub mod fees;
mod listings;
mod ops;
mod policy;
mod users;
mod util;
mod wallet_transactions;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
