//! Wallet ledger rows.
//!
//! A `WalletTransaction` is an immutable, append-only record of one balance
//! mutation. The signed `amount` (positive = credit, negative = debit) and
//! the `balance_after` snapshot make the log a tamper-evident audit trail:
//! at any point a wallet's balance equals the sum of its transaction amounts.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Credit,
    Debit,
    Refund,
    Earning,
    PlatformFee,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::Refund => "refund",
            Self::Earning => "earning",
            Self::PlatformFee => "platform_fee",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            "refund" => Ok(Self::Refund),
            "earning" => Ok(Self::Earning),
            "platform_fee" => Ok(Self::PlatformFee),
            "withdrawal" => Ok(Self::Withdrawal),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// One immutable ledger entry.
#[derive(Clone, Debug, PartialEq)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub user_id: String,
    /// Signed amount: positive credits, negative debits.
    pub amount: i64,
    pub kind: TransactionKind,
    pub description: String,
    /// Wallet balance immediately after this entry was applied.
    pub balance_after: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallet_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub wallet_id: String,
    pub user_id: String,
    pub amount: i64,
    pub kind: String,
    pub description: String,
    pub balance_after: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&WalletTransaction> for ActiveModel {
    fn from(value: &WalletTransaction) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            wallet_id: ActiveValue::Set(value.wallet_id.to_string()),
            user_id: ActiveValue::Set(value.user_id.clone()),
            amount: ActiveValue::Set(value.amount),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            description: ActiveValue::Set(value.description.clone()),
            balance_after: ActiveValue::Set(value.balance_after),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for WalletTransaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "wallet transaction")?,
            wallet_id: parse_uuid(&model.wallet_id, "wallet")?,
            user_id: model.user_id,
            amount: model.amount,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            description: model.description,
            balance_after: model.balance_after,
            created_at: model.created_at,
        })
    }
}
