//! Fee & refund calculator.
//!
//! Pure, side-effect-free money math. All amounts are whole currency units;
//! rounding happens once at each computation boundary (never accumulated in
//! fractional form) so the exact charged amounts are reproducible across
//! retries.

use chrono::{DateTime, Utc};

use crate::{Booking, PaymentStatus};

/// Exact booked duration in hours.
pub fn duration_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_seconds() as f64 / 3600.0
}

/// Total rental price: `round(price_per_hour × hours × spots)`.
pub fn compute_cost(price_per_hour: i64, duration_hours: f64, number_of_spots: i32) -> i64 {
    (price_per_hour as f64 * duration_hours * f64::from(number_of_spots)).round() as i64
}

/// Platform fee: `round(total_price × fee_rate_bps / 10_000)`.
pub fn platform_fee(total_price: i64, fee_rate_bps: u32) -> i64 {
    (total_price as f64 * f64::from(fee_rate_bps) / 10_000.0).round() as i64
}

/// What the host receives once the platform fee has been deducted.
pub fn host_payout(total_price: i64, platform_fee: i64) -> i64 {
    total_price - platform_fee
}

/// Refund owed to the driver on cancellation: the full `total_price` when
/// payment completed, nothing otherwise. The upfront platform fee, where
/// charged, is not refunded.
pub fn refund_amount(booking: &Booking) -> i64 {
    if booking.payment_status == PaymentStatus::Completed {
        booking.total_price
    } else {
        0
    }
}
