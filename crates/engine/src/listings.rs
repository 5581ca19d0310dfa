//! Parking listing primitives.
//!
//! A `Listing` is a parking space offered by a host: capacity, price, and an
//! availability window. `available_spaces` is the availability counter; it is
//! mutated exclusively through `Engine::reserve_spots`/`Engine::release_spots`
//! and never written directly by request handlers.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, util::parse_uuid};

/// Admin approval state of a listing. Only `approved` listings are bookable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Inactive,
}

impl ApprovalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Inactive => "inactive",
        }
    }
}

impl TryFrom<&str> for ApprovalStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "inactive" => Ok(Self::Inactive),
            other => Err(EngineError::Validation(format!(
                "invalid approval status: {other}"
            ))),
        }
    }
}

/// A parking space listed by a host.
#[derive(Clone, Debug, PartialEq)]
pub struct Listing {
    /// Stable identifier, generated once and persisted.
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub address: String,
    pub vehicle_type: String,
    /// Price per hour in whole currency units, snapshotted onto bookings at
    /// creation so historical pricing stays stable.
    pub price_per_hour: i64,
    pub total_spaces: i32,
    pub available_spaces: i32,
    /// Total hours the host intends to rent out; basis for the
    /// minimum-rental policy where that policy is enabled.
    pub total_hours: i64,
    pub available_from: DateTime<Utc>,
    pub available_to: DateTime<Utc>,
    pub approval_status: ApprovalStatus,
    pub total_bookings: i64,
    pub created_at: DateTime<Utc>,
}

impl Listing {
    pub fn new(
        owner_id: String,
        title: String,
        address: String,
        vehicle_type: String,
        price_per_hour: i64,
        total_spaces: i32,
        total_hours: i64,
        available_from: DateTime<Utc>,
        available_to: DateTime<Utc>,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if price_per_hour <= 0 {
            return Err(EngineError::Validation(
                "price_per_hour must be > 0".to_string(),
            ));
        }
        if total_spaces < 1 {
            return Err(EngineError::Validation(
                "total_spaces must be >= 1".to_string(),
            ));
        }
        if available_to <= available_from {
            return Err(EngineError::Validation(
                "available_to must be after available_from".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            owner_id,
            title,
            address,
            vehicle_type,
            price_per_hour,
            total_spaces,
            available_spaces: total_spaces,
            total_hours,
            available_from,
            available_to,
            approval_status: ApprovalStatus::Pending,
            total_bookings: 0,
            created_at,
        })
    }

    /// A listing is bookable when approved and with at least one free spot.
    pub fn is_bookable(&self) -> bool {
        self.approval_status == ApprovalStatus::Approved && self.available_spaces > 0
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub address: String,
    pub vehicle_type: String,
    pub price_per_hour: i64,
    pub total_spaces: i32,
    pub available_spaces: i32,
    pub total_hours: i64,
    pub available_from: DateTimeUtc,
    pub available_to: DateTimeUtc,
    pub approval_status: String,
    pub total_bookings: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Listing> for ActiveModel {
    fn from(value: &Listing) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            owner_id: ActiveValue::Set(value.owner_id.clone()),
            title: ActiveValue::Set(value.title.clone()),
            address: ActiveValue::Set(value.address.clone()),
            vehicle_type: ActiveValue::Set(value.vehicle_type.clone()),
            price_per_hour: ActiveValue::Set(value.price_per_hour),
            total_spaces: ActiveValue::Set(value.total_spaces),
            available_spaces: ActiveValue::Set(value.available_spaces),
            total_hours: ActiveValue::Set(value.total_hours),
            available_from: ActiveValue::Set(value.available_from),
            available_to: ActiveValue::Set(value.available_to),
            approval_status: ActiveValue::Set(value.approval_status.as_str().to_string()),
            total_bookings: ActiveValue::Set(value.total_bookings),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Listing {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "listing")?,
            owner_id: model.owner_id,
            title: model.title,
            address: model.address,
            vehicle_type: model.vehicle_type,
            price_per_hour: model.price_per_hour,
            total_spaces: model.total_spaces,
            available_spaces: model.available_spaces,
            total_hours: model.total_hours,
            available_from: model.available_from,
            available_to: model.available_to,
            approval_status: ApprovalStatus::try_from(model.approval_status.as_str())?,
            total_bookings: model.total_bookings,
            created_at: model.created_at,
        })
    }
}
