use chrono::{DateTime, Utc};

use sea_orm::{QueryFilter, prelude::*, sea_query::Expr};

use crate::{Booking, BookingStatus, EngineError, ResultEngine, bookings};

use super::Engine;

/// What one lifecycle sweep did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Confirmed bookings whose window opened and that became `active`.
    pub promoted: u64,
    /// Bookings whose window ended and that became `completed`.
    pub completed: u64,
}

impl Engine {
    /// Advance time-driven booking transitions.
    ///
    /// Intended to run periodically from a scheduler. Idempotent: each row
    /// moves at most once because every transition is a status-guarded
    /// update, and a booking cancelled or completed between the scan and the
    /// transition is simply skipped. Failures on one booking are logged and
    /// do not stop the sweep.
    pub async fn run_lifecycle_sweep(&self, now: DateTime<Utc>) -> ResultEngine<SweepReport> {
        let mut report = SweepReport::default();

        report.promoted = bookings::Entity::update_many()
            .col_expr(
                bookings::Column::Status,
                Expr::value(BookingStatus::Active.as_str()),
            )
            .filter(bookings::Column::Status.eq(BookingStatus::Confirmed.as_str()))
            .filter(bookings::Column::StartTime.lte(now))
            .filter(bookings::Column::EndTime.gte(now))
            .exec(&self.database)
            .await?
            .rows_affected;

        let expired = bookings::Entity::find()
            .filter(bookings::Column::Status.is_in([
                BookingStatus::Confirmed.as_str(),
                BookingStatus::Active.as_str(),
            ]))
            .filter(bookings::Column::EndTime.lt(now))
            .all(&self.database)
            .await?;

        for model in expired {
            let booking = Booking::try_from(model)?;
            match self.complete_booking(booking.id, now).await {
                Ok(true) => report.completed += 1,
                // Lost a race against a cancel or another completion.
                Ok(false) | Err(EngineError::InvalidState(_)) => {}
                Err(err) => {
                    tracing::warn!(booking_id = %booking.id, %err, "lifecycle sweep skipped booking");
                }
            }
        }

        if report.promoted > 0 || report.completed > 0 {
            tracing::info!(
                promoted = report.promoted,
                completed = report.completed,
                "lifecycle sweep"
            );
        }
        Ok(report)
    }
}
