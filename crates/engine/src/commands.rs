//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Create a booking request.
#[derive(Clone, Debug)]
pub struct CreateBookingCmd {
    pub driver_id: String,
    pub listing_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub number_of_spots: i32,
    pub vehicle_type: Option<String>,
    pub vehicle_number: Option<String>,
}

impl CreateBookingCmd {
    #[must_use]
    pub fn new(
        driver_id: impl Into<String>,
        listing_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            driver_id: driver_id.into(),
            listing_id,
            start_time,
            end_time,
            number_of_spots: 1,
            vehicle_type: None,
            vehicle_number: None,
        }
    }

    #[must_use]
    pub fn spots(mut self, number_of_spots: i32) -> Self {
        self.number_of_spots = number_of_spots;
        self
    }

    #[must_use]
    pub fn vehicle(
        mut self,
        vehicle_type: impl Into<String>,
        vehicle_number: impl Into<String>,
    ) -> Self {
        self.vehicle_type = Some(vehicle_type.into());
        self.vehicle_number = Some(vehicle_number.into());
        self
    }
}

/// Create a listing.
#[derive(Clone, Debug)]
pub struct NewListingCmd {
    pub owner_id: String,
    pub title: String,
    pub address: String,
    pub vehicle_type: String,
    pub price_per_hour: i64,
    pub total_spaces: i32,
    pub total_hours: i64,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
}

impl NewListingCmd {
    #[must_use]
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        price_per_hour: i64,
        available_from: DateTime<Utc>,
        available_to: DateTime<Utc>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            title: title.into(),
            address: String::new(),
            vehicle_type: "4-wheeler".to_string(),
            price_per_hour,
            total_spaces: 1,
            total_hours: ((available_to - available_from).num_seconds() / 3600).max(1),
            available_from,
            available_to,
        }
    }

    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    #[must_use]
    pub fn vehicle_type(mut self, vehicle_type: impl Into<String>) -> Self {
        self.vehicle_type = vehicle_type.into();
        self
    }

    #[must_use]
    pub fn spaces(mut self, total_spaces: i32) -> Self {
        self.total_spaces = total_spaces;
        self
    }

    #[must_use]
    pub fn total_hours(mut self, total_hours: i64) -> Self {
        self.total_hours = total_hours;
        self
    }
}

/// What a confirmed external payment was for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentPurpose {
    /// Top up a user's wallet.
    WalletTopUp { user_id: String },
    /// Settle a booking's rental price.
    BookingSettlement { booking_id: Uuid },
}

/// An external payment of `amount` for `purpose` has been confirmed.
///
/// This is the only shape in which payment-gateway outcomes reach the
/// engine; gateway integration itself lives outside this crate.
#[derive(Clone, Debug)]
pub struct PaymentConfirmedCmd {
    pub purpose: PaymentPurpose,
    pub amount: i64,
    pub method: String,
    pub reference: String,
}

impl PaymentConfirmedCmd {
    #[must_use]
    pub fn top_up(
        user_id: impl Into<String>,
        amount: i64,
        method: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            purpose: PaymentPurpose::WalletTopUp {
                user_id: user_id.into(),
            },
            amount,
            method: method.into(),
            reference: reference.into(),
        }
    }

    #[must_use]
    pub fn settlement(
        booking_id: Uuid,
        amount: i64,
        method: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            purpose: PaymentPurpose::BookingSettlement { booking_id },
            amount,
            method: method.into(),
            reference: reference.into(),
        }
    }
}
