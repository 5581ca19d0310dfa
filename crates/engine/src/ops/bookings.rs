use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    Booking, BookingStatus, CancelledBy, CreateBookingCmd, EngineError, EventKind, FeeCollection,
    PaymentStatus, ResultEngine, SettlementMode, TransactionKind, bookings, fees, listings,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a booking request against a listing.
    ///
    /// Runs as a sequence of small atomic steps rather than one long
    /// transaction: reserve the spots, charge the upfront platform fee where
    /// the policy says so, then insert the `pending` booking row. Each later
    /// step failing undoes the earlier ones in reverse order, so no spot or
    /// fee stays held for a booking that never came to exist.
    pub async fn create_booking(
        &self,
        cmd: CreateBookingCmd,
        now: DateTime<Utc>,
    ) -> ResultEngine<Booking> {
        let listing = self.listing(cmd.listing_id).await?;
        if !matches!(listing.approval_status, crate::ApprovalStatus::Approved) {
            return Err(EngineError::InvalidState(format!(
                "listing {} is not approved for booking",
                listing.id
            )));
        }
        if cmd.start_time < now {
            return Err(EngineError::Validation(
                "start_time must not be in the past".to_string(),
            ));
        }
        if cmd.start_time < listing.available_from || cmd.end_time > listing.available_to {
            return Err(EngineError::Validation(
                "booking window falls outside the listing's availability".to_string(),
            ));
        }
        let hours = fees::duration_hours(cmd.start_time, cmd.end_time);
        if let Some(min_hours) = self.policy().min_rental_hours(listing.total_hours)
            && hours < min_hours
        {
            return Err(EngineError::Validation(format!(
                "booking must cover at least {min_hours} hours"
            )));
        }
        let total_price = fees::compute_cost(listing.price_per_hour, hours, cmd.number_of_spots);
        let platform_fee = fees::platform_fee(total_price, self.policy().fee_rate_bps);
        let booking = Booking::new(
            listing.id,
            cmd.driver_id,
            listing.owner_id.clone(),
            cmd.start_time,
            cmd.end_time,
            cmd.number_of_spots,
            listing.price_per_hour,
            total_price,
            platform_fee,
            cmd.vehicle_type.unwrap_or_else(|| listing.vehicle_type.clone()),
            cmd.vehicle_number.unwrap_or_default(),
            now,
        )?;

        self.reserve_spots_on(&self.database, listing.id, booking.number_of_spots)
            .await?;

        let fee_charged = self.policy().fee_collection == FeeCollection::Upfront
            && booking.platform_fee > 0;
        if fee_charged
            && let Err(err) = self
                .transfer_platform_fee(&booking.driver_id, booking.platform_fee, booking.id, now)
                .await
        {
            self.compensate_release(listing.id, booking.number_of_spots)
                .await;
            return Err(err);
        }

        let insert: ResultEngine<()> = with_tx!(self, |db_tx| {
            let model: bookings::ActiveModel = (&booking).into();
            model.insert(&db_tx).await?;
            Ok(())
        });
        if let Err(err) = insert {
            if fee_charged {
                self.compensate_fee(&booking.driver_id, booking.platform_fee, booking.id, now)
                    .await;
            }
            self.compensate_release(listing.id, booking.number_of_spots)
                .await;
            return Err(err);
        }

        self.emit(
            &booking.owner_id,
            EventKind::BookingRequested,
            serde_json::json!({
                "booking_id": booking.id,
                "listing_id": booking.listing_id,
                "driver_id": booking.driver_id,
                "total_price": booking.total_price,
            }),
        );
        Ok(booking)
    }

    /// Host accepts a pending booking request.
    pub async fn accept_booking(
        &self,
        booking_id: Uuid,
        owner_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Booking> {
        let booking = self.booking(booking_id).await?;
        if booking.owner_id != owner_id {
            return Err(EngineError::Unauthorized(format!(
                "{owner_id} does not own the listing of booking {booking_id}"
            )));
        }
        let rows = bookings::Entity::update_many()
            .col_expr(
                bookings::Column::Status,
                Expr::value(BookingStatus::Confirmed.as_str()),
            )
            .col_expr(bookings::Column::IsConfirmedByOwner, Expr::value(true))
            .col_expr(bookings::Column::ConfirmedAt, Expr::value(Some(now)))
            .filter(bookings::Column::Id.eq(booking_id.to_string()))
            .filter(bookings::Column::Status.eq(BookingStatus::Pending.as_str()))
            .exec(&self.database)
            .await?
            .rows_affected;
        if rows == 0 {
            let current = self.booking(booking_id).await?;
            return Err(EngineError::InvalidState(format!(
                "booking {booking_id} is {} and cannot be accepted",
                current.status.as_str()
            )));
        }
        self.emit(
            &booking.driver_id,
            EventKind::BookingConfirmed,
            serde_json::json!({ "booking_id": booking_id }),
        );
        self.booking(booking_id).await
    }

    /// Record that the driver paid the rental price of a confirmed booking.
    ///
    /// With a ledger settlement policy this is also where the money moves:
    /// the driver's wallet is debited and the host's credited inside the same
    /// transaction that flips the payment status. If `now` already falls
    /// inside the booked window, the booking becomes `active` immediately;
    /// otherwise the lifecycle sweep promotes it when the window opens.
    pub async fn mark_payment_completed(
        &self,
        booking_id: Uuid,
        amount: i64,
        method: &str,
        reference: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let booking = self.booking(booking_id).await?;
        if amount != booking.total_price {
            return Err(EngineError::Validation(format!(
                "payment of {amount} does not match booking price {}",
                booking.total_price
            )));
        }
        let next_status = if booking.window_contains(now) {
            BookingStatus::Active
        } else {
            BookingStatus::Confirmed
        };

        let result: ResultEngine<()> = with_tx!(self, |db_tx| {
            let mut update = bookings::Entity::update_many()
                .col_expr(
                    bookings::Column::PaymentStatus,
                    Expr::value(PaymentStatus::Completed.as_str()),
                )
                .col_expr(bookings::Column::Status, Expr::value(next_status.as_str()))
                .col_expr(
                    bookings::Column::PaymentMethod,
                    Expr::value(Some(method.to_string())),
                )
                .col_expr(
                    bookings::Column::PaymentReference,
                    Expr::value(Some(reference.to_string())),
                )
                .col_expr(
                    bookings::Column::PaymentCompletedAt,
                    Expr::value(Some(now)),
                );
            if self.policy().settlement == SettlementMode::LedgerOnPayment {
                update = update.col_expr(bookings::Column::SettledAt, Expr::value(Some(now)));
            }
            let rows = update
                .filter(bookings::Column::Id.eq(booking_id.to_string()))
                .filter(bookings::Column::Status.eq(BookingStatus::Confirmed.as_str()))
                .filter(bookings::Column::PaymentStatus.eq(PaymentStatus::Pending.as_str()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            if rows == 0 {
                return Err(EngineError::InvalidState(format!(
                    "booking {booking_id} is not awaiting payment"
                )));
            }

            if self.policy().settlement == SettlementMode::LedgerOnPayment {
                let description = format!("payment for booking {booking_id}");
                self.debit_tx(
                    &db_tx,
                    &booking.driver_id,
                    booking.total_price,
                    TransactionKind::Debit,
                    &description,
                    now,
                )
                .await?;
                self.settle_host_tx(&db_tx, &booking, now).await?;
            }
            Ok(())
        });
        result?;

        self.emit(
            &booking.owner_id,
            EventKind::BookingPaymentCompleted,
            serde_json::json!({
                "booking_id": booking_id,
                "amount": amount,
                "method": method,
            }),
        );
        Ok(())
    }

    /// Cancel a booking from any non-terminal status.
    ///
    /// The status flip is the commit point: whichever caller wins that
    /// conditional update is the one that releases the spots and issues the
    /// refund, so both happen exactly once even under racing cancellations.
    /// Should a step after the flip fail, re-invoking with the same booking
    /// id finishes whatever is still owed.
    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        caller_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<Booking> {
        let booking = self.booking(booking_id).await?;
        let cancelled_by = if caller_id == booking.driver_id {
            CancelledBy::Driver
        } else if caller_id == booking.owner_id {
            CancelledBy::Owner
        } else if caller_id == self.policy().platform_account {
            CancelledBy::Admin
        } else {
            return Err(EngineError::Unauthorized(format!(
                "{caller_id} is not a party to booking {booking_id}"
            )));
        };

        let rows = bookings::Entity::update_many()
            .col_expr(
                bookings::Column::Status,
                Expr::value(BookingStatus::Cancelled.as_str()),
            )
            .col_expr(
                bookings::Column::CancelledBy,
                Expr::value(Some(cancelled_by.as_str().to_string())),
            )
            .col_expr(bookings::Column::CancelledAt, Expr::value(Some(now)))
            .filter(bookings::Column::Id.eq(booking_id.to_string()))
            .filter(bookings::Column::Status.is_in([
                BookingStatus::Pending.as_str(),
                BookingStatus::Confirmed.as_str(),
                BookingStatus::Active.as_str(),
            ]))
            .exec(&self.database)
            .await?
            .rows_affected;
        if rows == 0 {
            let current = self.booking(booking_id).await?;
            let unfinished = current.payment_status == PaymentStatus::Completed
                || !current.spots_released;
            if current.status == BookingStatus::Cancelled && unfinished {
                // An earlier cancellation flipped the status but failed part
                // way through; finish its release and refund.
                self.release_for_booking(&current, false).await?;
                self.refund_if_paid(&current, now).await?;
                return self.booking(booking_id).await;
            }
            return Err(EngineError::InvalidState(format!(
                "booking {booking_id} is already {}",
                current.status.as_str()
            )));
        }

        self.release_for_booking(&booking, false).await?;
        self.refund_if_paid(&booking, now).await?;

        for party in [&booking.driver_id, &booking.owner_id] {
            self.emit(
                party,
                EventKind::BookingCancelled,
                serde_json::json!({
                    "booking_id": booking_id,
                    "cancelled_by": cancelled_by.as_str(),
                }),
            );
        }
        self.booking(booking_id).await
    }

    /// Close out a booking whose window has ended.
    ///
    /// Returns `Ok(false)` when the booking was already completed, so the
    /// lifecycle sweep and a manual caller can race without double-crediting
    /// the host or double-releasing the spots. A completed booking whose
    /// release or payout failed earlier gets those finished on re-invocation.
    /// Completing a cancelled booking is an error.
    pub async fn complete_booking(
        &self,
        booking_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<bool> {
        let booking = self.booking(booking_id).await?;
        match booking.status {
            BookingStatus::Completed => {
                self.finish_completion(&booking, now).await?;
                return Ok(false);
            }
            BookingStatus::Cancelled => {
                return Err(EngineError::InvalidState(format!(
                    "booking {booking_id} was cancelled"
                )));
            }
            BookingStatus::Pending => {
                return Err(EngineError::InvalidState(format!(
                    "booking {booking_id} was never confirmed"
                )));
            }
            BookingStatus::Confirmed | BookingStatus::Active => {}
        }

        let rows = bookings::Entity::update_many()
            .col_expr(
                bookings::Column::Status,
                Expr::value(BookingStatus::Completed.as_str()),
            )
            .col_expr(bookings::Column::CompletedAt, Expr::value(Some(now)))
            .filter(bookings::Column::Id.eq(booking_id.to_string()))
            .filter(bookings::Column::Status.is_in([
                BookingStatus::Confirmed.as_str(),
                BookingStatus::Active.as_str(),
            ]))
            .exec(&self.database)
            .await?
            .rows_affected;
        if rows == 0 {
            let current = self.booking(booking_id).await?;
            return match current.status {
                BookingStatus::Completed => {
                    self.finish_completion(&current, now).await?;
                    Ok(false)
                }
                other => Err(EngineError::InvalidState(format!(
                    "booking {booking_id} is {}",
                    other.as_str()
                ))),
            };
        }

        self.finish_completion(&booking, now).await?;

        self.emit(
            &booking.owner_id,
            EventKind::BookingCompleted,
            serde_json::json!({
                "booking_id": booking_id,
                "payout": self.host_payout_for(&booking),
            }),
        );
        Ok(true)
    }

    /// Return a booking snapshot from DB.
    pub async fn booking(&self, booking_id: Uuid) -> ResultEngine<Booking> {
        let model = bookings::Entity::find_by_id(booking_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("booking {booking_id}")))?;
        Booking::try_from(model)
    }

    /// A driver's bookings, newest first, optionally narrowed to one status.
    pub async fn bookings_for_driver(
        &self,
        driver_id: &str,
        status: Option<BookingStatus>,
    ) -> ResultEngine<Vec<Booking>> {
        self.bookings_where(bookings::Column::DriverId.eq(driver_id), status)
            .await
    }

    /// A host's incoming bookings across all their listings, newest first.
    pub async fn bookings_for_owner(
        &self,
        owner_id: &str,
        status: Option<BookingStatus>,
    ) -> ResultEngine<Vec<Booking>> {
        self.bookings_where(bookings::Column::OwnerId.eq(owner_id), status)
            .await
    }

    /// All bookings on one listing, newest first.
    pub async fn bookings_for_listing(
        &self,
        listing_id: Uuid,
        status: Option<BookingStatus>,
    ) -> ResultEngine<Vec<Booking>> {
        self.bookings_where(
            bookings::Column::ListingId.eq(listing_id.to_string()),
            status,
        )
        .await
    }

    async fn bookings_where(
        &self,
        condition: sea_orm::sea_query::SimpleExpr,
        status: Option<BookingStatus>,
    ) -> ResultEngine<Vec<Booking>> {
        let mut query = bookings::Entity::find()
            .filter(condition)
            .order_by_desc(bookings::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(bookings::Column::Status.eq(status.as_str()));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(Booking::try_from).collect()
    }

    /// What the host receives for this booking under the active policy.
    fn host_payout_for(&self, booking: &Booking) -> i64 {
        let fee = match self.policy().fee_collection {
            FeeCollection::OnSettlement => booking.platform_fee,
            FeeCollection::Upfront => 0,
        };
        fees::host_payout(booking.total_price, fee)
    }

    /// Credit the host their payout, plus the platform its fee when the fee
    /// is collected at settlement.
    async fn settle_host_tx<C: ConnectionTrait>(
        &self,
        conn: &C,
        booking: &Booking,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let payout = self.host_payout_for(booking);
        if payout > 0 {
            let description = format!("earning from booking {}", booking.id);
            self.credit_tx(
                conn,
                &booking.owner_id,
                payout,
                TransactionKind::Earning,
                &description,
                now,
            )
            .await?;
        }
        if self.policy().fee_collection == FeeCollection::OnSettlement && booking.platform_fee > 0 {
            let platform = self.policy().platform_account.clone();
            let description = format!("platform fee for booking {}", booking.id);
            self.credit_tx(
                conn,
                &platform,
                booking.platform_fee,
                TransactionKind::PlatformFee,
                &description,
                now,
            )
            .await?;
        }
        Ok(())
    }

    /// Upfront fee: driver pays, the platform account receives, atomically.
    async fn transfer_platform_fee(
        &self,
        driver_id: &str,
        fee: i64,
        booking_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let platform = self.policy().platform_account.clone();
        with_tx!(self, |db_tx| {
            let description = format!("platform fee for booking {booking_id}");
            self.debit_tx(
                &db_tx,
                driver_id,
                fee,
                TransactionKind::PlatformFee,
                &description,
                now,
            )
            .await?;
            self.credit_tx(
                &db_tx,
                &platform,
                fee,
                TransactionKind::PlatformFee,
                &description,
                now,
            )
            .await?;
            Ok(())
        })
    }

    /// Refund the upfront fee when a later creation step failed.
    async fn compensate_fee(
        &self,
        driver_id: &str,
        fee: i64,
        booking_id: Uuid,
        now: DateTime<Utc>,
    ) {
        if let Err(err) = self.reverse_platform_fee(driver_id, fee, booking_id, now).await {
            tracing::error!(%booking_id, %err, "fee compensation failed, ledger needs repair");
        }
    }

    async fn reverse_platform_fee(
        &self,
        driver_id: &str,
        fee: i64,
        booking_id: Uuid,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        let platform = self.policy().platform_account.clone();
        with_tx!(self, |db_tx| {
            let description = format!("fee reversal for failed booking {booking_id}");
            self.debit_tx(
                &db_tx,
                &platform,
                fee,
                TransactionKind::PlatformFee,
                &description,
                now,
            )
            .await?;
            self.credit_tx(
                &db_tx,
                driver_id,
                fee,
                TransactionKind::Refund,
                &description,
                now,
            )
            .await?;
            Ok(())
        })
    }

    /// Give reserved spots back when a later creation step failed.
    async fn compensate_release(&self, listing_id: Uuid, spots: i32) {
        if let Err(err) = self
            .release_spots_on(&self.database, listing_id, spots)
            .await
        {
            tracing::error!(%listing_id, spots, %err, "spot compensation failed, counter needs repair");
        }
    }

    /// Give the booking's reservation back to the listing, at most once.
    ///
    /// The `spots_released` flip rides in the same transaction as the counter
    /// update, so a retry after a mid-cancel or mid-completion failure can
    /// call this again without releasing twice. Completion also bumps the
    /// listing's completed-booking counter here.
    async fn release_for_booking(
        &self,
        booking: &Booking,
        count_completion: bool,
    ) -> ResultEngine<()> {
        let spots = booking.number_of_spots;
        with_tx!(self, |db_tx| {
            let rows = bookings::Entity::update_many()
                .col_expr(bookings::Column::SpotsReleased, Expr::value(true))
                .filter(bookings::Column::Id.eq(booking.id.to_string()))
                .filter(bookings::Column::SpotsReleased.eq(false))
                .exec(&db_tx)
                .await?
                .rows_affected;
            if rows == 0 {
                return Ok(());
            }
            let mut update = listings::Entity::update_many().col_expr(
                listings::Column::AvailableSpaces,
                Expr::col(listings::Column::AvailableSpaces).add(spots),
            );
            if count_completion {
                update = update.col_expr(
                    listings::Column::TotalBookings,
                    Expr::col(listings::Column::TotalBookings).add(1),
                );
            }
            let released = update
                .filter(listings::Column::Id.eq(booking.listing_id.to_string()))
                .filter(
                    Expr::expr(Expr::col(listings::Column::AvailableSpaces).add(spots))
                        .lte(Expr::col(listings::Column::TotalSpaces)),
                )
                .exec(&db_tx)
                .await?
                .rows_affected;
            if released == 0 {
                return Err(EngineError::InvariantViolation(format!(
                    "releasing {spots} spots on listing {} would exceed capacity",
                    booking.listing_id
                )));
            }
            Ok(())
        })
    }

    /// Refund a paid booking, at most once.
    ///
    /// The `completed -> refunded` flip rides in the same transaction as the
    /// wallet moves and doubles as the guard: it reads the payment status the
    /// database holds now, not a snapshot, and a retry after a failed refund
    /// finds the flip undone and runs the whole refund again.
    async fn refund_if_paid(&self, booking: &Booking, now: DateTime<Utc>) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let rows = bookings::Entity::update_many()
                .col_expr(
                    bookings::Column::PaymentStatus,
                    Expr::value(PaymentStatus::Refunded.as_str()),
                )
                .filter(bookings::Column::Id.eq(booking.id.to_string()))
                .filter(bookings::Column::PaymentStatus.eq(PaymentStatus::Completed.as_str()))
                .exec(&db_tx)
                .await?
                .rows_affected;
            if rows == 0 {
                return Ok(());
            }
            if booking.total_price > 0 {
                let description = format!("refund for cancelled booking {}", booking.id);
                self.credit_tx(
                    &db_tx,
                    &booking.driver_id,
                    booking.total_price,
                    TransactionKind::Refund,
                    &description,
                    now,
                )
                .await?;
            }
            if booking.total_price > 0
                && self.policy().settlement == SettlementMode::LedgerOnPayment
            {
                let reversal = format!("payout reversal for cancelled booking {}", booking.id);
                let payout = self.host_payout_for(booking);
                if payout > 0 {
                    self.debit_tx(
                        &db_tx,
                        &booking.owner_id,
                        payout,
                        TransactionKind::Debit,
                        &reversal,
                        now,
                    )
                    .await?;
                }
                if self.policy().fee_collection == FeeCollection::OnSettlement
                    && booking.platform_fee > 0
                {
                    let platform = self.policy().platform_account.clone();
                    self.debit_tx(
                        &db_tx,
                        &platform,
                        booking.platform_fee,
                        TransactionKind::Debit,
                        &reversal,
                        now,
                    )
                    .await?;
                }
            }
            Ok(())
        })
    }

    /// Run the post-completion steps, each at most once: give the spots back
    /// and, when the ledger settles at completion, pay the host.
    async fn finish_completion(&self, booking: &Booking, now: DateTime<Utc>) -> ResultEngine<()> {
        if !booking.spots_released {
            self.release_for_booking(booking, true).await?;
        }
        if booking.settled_at.is_none() {
            self.ensure_settled(booking, now).await?;
        }
        Ok(())
    }

    /// Decide the host payout exactly once. The `settled_at` stamp is the
    /// guard; under ledger-on-payment settlement it was already set when the
    /// payment moved the money, so completion moves nothing further.
    async fn ensure_settled(&self, booking: &Booking, now: DateTime<Utc>) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let rows = bookings::Entity::update_many()
                .col_expr(bookings::Column::SettledAt, Expr::value(Some(now)))
                .filter(bookings::Column::Id.eq(booking.id.to_string()))
                .filter(bookings::Column::SettledAt.is_null())
                .exec(&db_tx)
                .await?
                .rows_affected;
            if rows == 1 && self.policy().settlement == SettlementMode::OffLedger {
                self.settle_host_tx(&db_tx, booking, now).await?;
            }
            Ok(())
        })
    }
}
