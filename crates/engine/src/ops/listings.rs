use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{ApprovalStatus, EngineError, Listing, NewListingCmd, ResultEngine, listings};

use super::{Engine, with_tx};

impl Engine {
    /// Publish a new listing. It starts `pending` and is not bookable until
    /// an admin approves it.
    pub async fn new_listing(
        &self,
        cmd: NewListingCmd,
        now: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let listing = Listing::new(
            cmd.owner_id,
            cmd.title,
            cmd.address,
            cmd.vehicle_type,
            cmd.price_per_hour,
            cmd.total_spaces,
            cmd.total_hours,
            cmd.available_from,
            cmd.available_to,
            now,
        )?;
        let listing_id = listing.id;
        with_tx!(self, |db_tx| {
            let model: listings::ActiveModel = (&listing).into();
            model.insert(&db_tx).await?;
            Ok(listing_id)
        })
    }

    /// Admin moderation: approve, reject or deactivate a listing.
    pub async fn set_listing_status(
        &self,
        listing_id: Uuid,
        status: ApprovalStatus,
    ) -> ResultEngine<()> {
        let rows = listings::Entity::update_many()
            .col_expr(
                listings::Column::ApprovalStatus,
                Expr::value(status.as_str()),
            )
            .filter(listings::Column::Id.eq(listing_id.to_string()))
            .exec(&self.database)
            .await?
            .rows_affected;
        if rows == 0 {
            return Err(EngineError::NotFound(format!("listing {listing_id}")));
        }
        Ok(())
    }

    /// Return a listing snapshot from DB.
    pub async fn listing(&self, listing_id: Uuid) -> ResultEngine<Listing> {
        let model = listings::Entity::find_by_id(listing_id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("listing {listing_id}")))?;
        Listing::try_from(model)
    }

    /// All listings of one host, newest first.
    pub async fn listings_for_owner(&self, owner_id: &str) -> ResultEngine<Vec<Listing>> {
        let models = listings::Entity::find()
            .filter(listings::Column::OwnerId.eq(owner_id))
            .order_by_desc(listings::Column::CreatedAt)
            .all(&self.database)
            .await?;
        models.into_iter().map(Listing::try_from).collect()
    }

    /// Atomically take `spots` units of a listing's capacity.
    pub async fn reserve_spots(&self, listing_id: Uuid, spots: i32) -> ResultEngine<()> {
        self.reserve_spots_on(&self.database, listing_id, spots)
            .await
    }

    /// Give `spots` units back to a listing.
    pub async fn release_spots(&self, listing_id: Uuid, spots: i32) -> ResultEngine<()> {
        self.release_spots_on(&self.database, listing_id, spots)
            .await
    }

    /// A single conditional `UPDATE` carries the capacity and approval
    /// checks, so two concurrent reservations for the last spot cannot both
    /// succeed. Zero rows affected is disambiguated by a re-read.
    pub(crate) async fn reserve_spots_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        listing_id: Uuid,
        spots: i32,
    ) -> ResultEngine<()> {
        if spots < 1 {
            return Err(EngineError::Validation("spots must be >= 1".to_string()));
        }
        let rows = listings::Entity::update_many()
            .col_expr(
                listings::Column::AvailableSpaces,
                Expr::col(listings::Column::AvailableSpaces).sub(spots),
            )
            .filter(listings::Column::Id.eq(listing_id.to_string()))
            .filter(listings::Column::AvailableSpaces.gte(spots))
            .filter(listings::Column::ApprovalStatus.eq(ApprovalStatus::Approved.as_str()))
            .exec(conn)
            .await?
            .rows_affected;
        if rows == 0 {
            let model = listings::Entity::find_by_id(listing_id.to_string())
                .one(conn)
                .await?
                .ok_or_else(|| EngineError::NotFound(format!("listing {listing_id}")))?;
            if model.approval_status != ApprovalStatus::Approved.as_str() {
                return Err(EngineError::InvalidState(format!(
                    "listing {listing_id} is not approved for booking"
                )));
            }
            return Err(EngineError::InsufficientCapacity(format!(
                "listing {listing_id} has fewer than {spots} free spots"
            )));
        }
        Ok(())
    }

    /// The guard `available + spots <= total` rides on the same `UPDATE`;
    /// releasing beyond capacity means a booking was released twice, which is
    /// a bug worth failing loudly on rather than clamping over.
    pub(crate) async fn release_spots_on<C: ConnectionTrait>(
        &self,
        conn: &C,
        listing_id: Uuid,
        spots: i32,
    ) -> ResultEngine<()> {
        if spots < 1 {
            return Err(EngineError::Validation("spots must be >= 1".to_string()));
        }
        let rows = listings::Entity::update_many()
            .col_expr(
                listings::Column::AvailableSpaces,
                Expr::col(listings::Column::AvailableSpaces).add(spots),
            )
            .filter(listings::Column::Id.eq(listing_id.to_string()))
            .filter(
                Expr::expr(Expr::col(listings::Column::AvailableSpaces).add(spots))
                    .lte(Expr::col(listings::Column::TotalSpaces)),
            )
            .exec(conn)
            .await?
            .rows_affected;
        if rows == 0 {
            let exists = listings::Entity::find_by_id(listing_id.to_string())
                .one(conn)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::InvariantViolation(format!(
                    "releasing {spots} spots on listing {listing_id} would exceed capacity"
                )));
            }
            return Err(EngineError::NotFound(format!("listing {listing_id}")));
        }
        Ok(())
    }
}
