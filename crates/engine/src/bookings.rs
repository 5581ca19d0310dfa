//! Booking primitives.
//!
//! A `Booking` reserves `number_of_spots` units of a listing's capacity for a
//! time window and carries the money amounts computed at creation. Its status
//! is a finite state machine:
//!
//! ```text
//! pending -> confirmed -> active -> completed
//!     \----------\----------\----> cancelled
//! ```
//!
//! `completed` and `cancelled` are terminal. The reservation held on the
//! listing is released exactly once, on whichever terminal path the booking
//! takes.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// No transition leaves a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Cancellation is legal from every non-terminal status.
    pub fn can_cancel(self) -> bool {
        !self.is_terminal()
    }
}

impl TryFrom<&str> for BookingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::Validation(format!(
                "invalid booking status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Refunded => "refunded",
        }
    }
}

impl TryFrom<&str> for PaymentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "refunded" => Ok(Self::Refunded),
            other => Err(EngineError::Validation(format!(
                "invalid payment status: {other}"
            ))),
        }
    }
}

/// Which party cancelled a booking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelledBy {
    Driver,
    Owner,
    Admin,
}

impl CancelledBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Driver => "driver",
            Self::Owner => "owner",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for CancelledBy {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "driver" => Ok(Self::Driver),
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            other => Err(EngineError::Validation(format!(
                "invalid cancelled_by: {other}"
            ))),
        }
    }
}

/// A reservation of spots on a listing for a time window.
#[derive(Clone, Debug, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub driver_id: String,
    pub owner_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub number_of_spots: i32,
    /// Listing price at creation time; never re-read from the listing.
    pub price_per_hour: i64,
    pub total_price: i64,
    pub platform_fee: i64,
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_reference: Option<String>,
    pub payment_method: Option<String>,
    pub is_confirmed_by_owner: bool,
    pub cancelled_by: Option<CancelledBy>,
    /// Set once the reservation has been given back to the listing, on
    /// whichever terminal path the booking took.
    pub spots_released: bool,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub payment_completed_at: Option<DateTime<Utc>>,
    /// Set when the host payout question for this booking has been decided,
    /// so the payout runs at most once across sweeps and retries.
    pub settled_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        listing_id: Uuid,
        driver_id: String,
        owner_id: String,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        number_of_spots: i32,
        price_per_hour: i64,
        total_price: i64,
        platform_fee: i64,
        vehicle_type: String,
        vehicle_number: String,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if end_time <= start_time {
            return Err(EngineError::Validation(
                "end_time must be after start_time".to_string(),
            ));
        }
        if number_of_spots < 1 {
            return Err(EngineError::Validation(
                "number_of_spots must be >= 1".to_string(),
            ));
        }
        if total_price < 0 || platform_fee < 0 {
            return Err(EngineError::Validation(
                "amounts must not be negative".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            listing_id,
            driver_id,
            owner_id,
            start_time,
            end_time,
            number_of_spots,
            price_per_hour,
            total_price,
            platform_fee,
            vehicle_type,
            vehicle_number,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_reference: None,
            payment_method: None,
            is_confirmed_by_owner: false,
            cancelled_by: None,
            spots_released: false,
            created_at,
            confirmed_at: None,
            payment_completed_at: None,
            settled_at: None,
            cancelled_at: None,
            completed_at: None,
        })
    }

    /// True when `now` falls inside the booked window.
    pub fn window_contains(&self, now: DateTime<Utc>) -> bool {
        self.start_time <= now && now <= self.end_time
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub listing_id: String,
    pub driver_id: String,
    pub owner_id: String,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    pub number_of_spots: i32,
    pub price_per_hour: i64,
    pub total_price: i64,
    pub platform_fee: i64,
    pub vehicle_type: String,
    pub vehicle_number: String,
    pub status: String,
    pub payment_status: String,
    pub payment_reference: Option<String>,
    pub payment_method: Option<String>,
    pub is_confirmed_by_owner: bool,
    pub cancelled_by: Option<String>,
    pub spots_released: bool,
    pub created_at: DateTimeUtc,
    pub confirmed_at: Option<DateTimeUtc>,
    pub payment_completed_at: Option<DateTimeUtc>,
    pub settled_at: Option<DateTimeUtc>,
    pub cancelled_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::listings::Entity",
        from = "Column::ListingId",
        to = "super::listings::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Listings,
}

impl Related<super::listings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Listings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Booking> for ActiveModel {
    fn from(value: &Booking) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            listing_id: ActiveValue::Set(value.listing_id.to_string()),
            driver_id: ActiveValue::Set(value.driver_id.clone()),
            owner_id: ActiveValue::Set(value.owner_id.clone()),
            start_time: ActiveValue::Set(value.start_time),
            end_time: ActiveValue::Set(value.end_time),
            number_of_spots: ActiveValue::Set(value.number_of_spots),
            price_per_hour: ActiveValue::Set(value.price_per_hour),
            total_price: ActiveValue::Set(value.total_price),
            platform_fee: ActiveValue::Set(value.platform_fee),
            vehicle_type: ActiveValue::Set(value.vehicle_type.clone()),
            vehicle_number: ActiveValue::Set(value.vehicle_number.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            payment_status: ActiveValue::Set(value.payment_status.as_str().to_string()),
            payment_reference: ActiveValue::Set(value.payment_reference.clone()),
            payment_method: ActiveValue::Set(value.payment_method.clone()),
            is_confirmed_by_owner: ActiveValue::Set(value.is_confirmed_by_owner),
            cancelled_by: ActiveValue::Set(value.cancelled_by.map(|c| c.as_str().to_string())),
            spots_released: ActiveValue::Set(value.spots_released),
            created_at: ActiveValue::Set(value.created_at),
            confirmed_at: ActiveValue::Set(value.confirmed_at),
            payment_completed_at: ActiveValue::Set(value.payment_completed_at),
            settled_at: ActiveValue::Set(value.settled_at),
            cancelled_at: ActiveValue::Set(value.cancelled_at),
            completed_at: ActiveValue::Set(value.completed_at),
        }
    }
}

impl TryFrom<Model> for Booking {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "booking")?,
            listing_id: parse_uuid(&model.listing_id, "listing")?,
            driver_id: model.driver_id,
            owner_id: model.owner_id,
            start_time: model.start_time,
            end_time: model.end_time,
            number_of_spots: model.number_of_spots,
            price_per_hour: model.price_per_hour,
            total_price: model.total_price,
            platform_fee: model.platform_fee,
            vehicle_type: model.vehicle_type,
            vehicle_number: model.vehicle_number,
            status: BookingStatus::try_from(model.status.as_str())?,
            payment_status: PaymentStatus::try_from(model.payment_status.as_str())?,
            payment_reference: model.payment_reference,
            payment_method: model.payment_method,
            is_confirmed_by_owner: model.is_confirmed_by_owner,
            cancelled_by: model
                .cancelled_by
                .as_deref()
                .map(CancelledBy::try_from)
                .transpose()?,
            spots_released: model.spots_released,
            created_at: model.created_at,
            confirmed_at: model.confirmed_at,
            payment_completed_at: model.payment_completed_at,
            settled_at: model.settled_at,
            cancelled_at: model.cancelled_at,
            completed_at: model.completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn new_booking_defaults() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let booking = Booking::new(
            Uuid::new_v4(),
            "driver".to_string(),
            "host".to_string(),
            start,
            end,
            1,
            100,
            300,
            3,
            "4-wheeler".to_string(),
            "TN 45 A 1234".to_string(),
            start,
        )
        .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert!(!booking.is_confirmed_by_owner);
        assert!(booking.window_contains(start));
        assert!(!booking.window_contains(end + chrono::Duration::seconds(1)));
    }

    #[test]
    fn rejects_zero_spots() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let err = Booking::new(
            Uuid::new_v4(),
            "driver".to_string(),
            "host".to_string(),
            start,
            end,
            0,
            100,
            300,
            3,
            String::new(),
            String::new(),
            start,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn terminal_statuses() {
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Active.can_cancel());
        assert!(!BookingStatus::Completed.can_cancel());
    }
}
