use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{
    ConnectionTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    EngineError, EventKind, PaymentConfirmedCmd, PaymentPurpose, ResultEngine, TransactionKind,
    Wallet, WalletTransaction, wallet_transactions, wallets,
};

use super::{Engine, with_tx};

impl Engine {
    /// Return a user's wallet, creating an empty one on first reference.
    pub async fn wallet(&self, user_id: &str, now: DateTime<Utc>) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.ensure_wallet(&db_tx, user_id, now).await?;
            Wallet::try_from(model)
        })
    }

    /// The wallet's ledger, newest entry first.
    pub async fn wallet_transactions(
        &self,
        user_id: &str,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<WalletTransaction>> {
        let mut query = wallet_transactions::Entity::find()
            .filter(wallet_transactions::Column::UserId.eq(user_id))
            .order_by_desc(wallet_transactions::Column::CreatedAt);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(WalletTransaction::try_from).collect()
    }

    /// Add money to a wallet and append the matching ledger entry.
    pub async fn credit(
        &self,
        user_id: &str,
        amount: i64,
        kind: TransactionKind,
        description: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<WalletTransaction> {
        let entry: ResultEngine<WalletTransaction> = with_tx!(self, |db_tx| {
            self.credit_tx(&db_tx, user_id, amount, kind, description, now)
                .await
        });
        let entry = entry?;
        self.emit(
            user_id,
            EventKind::WalletCredited,
            serde_json::json!({
                "amount": entry.amount,
                "kind": entry.kind.as_str(),
                "balance_after": entry.balance_after,
            }),
        );
        Ok(entry)
    }

    /// Take money out of a wallet and append the matching ledger entry.
    /// Fails with `InsufficientBalance` when the balance cannot cover it.
    pub async fn debit(
        &self,
        user_id: &str,
        amount: i64,
        kind: TransactionKind,
        description: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<WalletTransaction> {
        let entry: ResultEngine<WalletTransaction> = with_tx!(self, |db_tx| {
            self.debit_tx(&db_tx, user_id, amount, kind, description, now)
                .await
        });
        let entry = entry?;
        self.emit(
            user_id,
            EventKind::WalletDebited,
            serde_json::json!({
                "amount": entry.amount,
                "kind": entry.kind.as_str(),
                "balance_after": entry.balance_after,
            }),
        );
        Ok(entry)
    }

    /// Withdraw wallet funds to the user's bank. The payout itself happens
    /// outside the ledger; this records the balance leaving.
    pub async fn withdraw(
        &self,
        user_id: &str,
        amount: i64,
        now: DateTime<Utc>,
    ) -> ResultEngine<WalletTransaction> {
        self.debit(
            user_id,
            amount,
            TransactionKind::Withdrawal,
            "withdrawal to bank account",
            now,
        )
        .await
    }

    /// Apply a confirmed external payment: either a wallet top-up or a
    /// booking settlement, per the command's purpose.
    pub async fn payment_confirmed(
        &self,
        cmd: PaymentConfirmedCmd,
        now: DateTime<Utc>,
    ) -> ResultEngine<()> {
        match cmd.purpose {
            PaymentPurpose::WalletTopUp { ref user_id } => {
                let description = format!("wallet top-up via {}", cmd.method);
                self.credit(
                    user_id,
                    cmd.amount,
                    TransactionKind::Credit,
                    &description,
                    now,
                )
                .await?;
                Ok(())
            }
            PaymentPurpose::BookingSettlement { booking_id } => {
                self.mark_payment_completed(booking_id, cmd.amount, &cmd.method, &cmd.reference, now)
                    .await
            }
        }
    }

    /// Find or lazily create the wallet row for `user_id`.
    pub(crate) async fn ensure_wallet<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<wallets::Model> {
        if let Some(model) = wallets::Entity::find()
            .filter(wallets::Column::UserId.eq(user_id))
            .one(conn)
            .await?
        {
            return Ok(model);
        }
        let wallet = Wallet::new(user_id.to_string(), now);
        let model: wallets::ActiveModel = (&wallet).into();
        Ok(model.insert(conn).await?)
    }

    /// Credit inside an open transaction: balance bump and ledger append
    /// commit or roll back together.
    pub(crate) async fn credit_tx<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        amount: i64,
        kind: TransactionKind,
        description: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<WalletTransaction> {
        if amount <= 0 {
            return Err(EngineError::Validation(
                "credit amount must be > 0".to_string(),
            ));
        }
        let wallet = self.ensure_wallet(conn, user_id, now).await?;
        wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).add(amount),
            )
            .col_expr(
                wallets::Column::TotalCredited,
                Expr::col(wallets::Column::TotalCredited).add(amount),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
            .filter(wallets::Column::Id.eq(wallet.id.clone()))
            .exec(conn)
            .await?;
        self.append_entry(conn, &wallet.id, user_id, amount, kind, description, now)
            .await
    }

    /// Debit inside an open transaction. The balance check rides on the
    /// `UPDATE` itself, so concurrent debits cannot overdraw the wallet.
    pub(crate) async fn debit_tx<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        amount: i64,
        kind: TransactionKind,
        description: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<WalletTransaction> {
        if amount <= 0 {
            return Err(EngineError::Validation(
                "debit amount must be > 0".to_string(),
            ));
        }
        let wallet = self.ensure_wallet(conn, user_id, now).await?;
        let rows = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).sub(amount),
            )
            .col_expr(
                wallets::Column::TotalDebited,
                Expr::col(wallets::Column::TotalDebited).add(amount),
            )
            .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
            .filter(wallets::Column::Id.eq(wallet.id.clone()))
            .filter(wallets::Column::Balance.gte(amount))
            .exec(conn)
            .await?
            .rows_affected;
        if rows == 0 {
            return Err(EngineError::InsufficientBalance(format!(
                "wallet of {user_id} cannot cover {amount}"
            )));
        }
        self.append_entry(conn, &wallet.id, user_id, -amount, kind, description, now)
            .await
    }

    /// Re-read the freshly updated balance and append the ledger row carrying
    /// it as `balance_after`.
    async fn append_entry<C: ConnectionTrait>(
        &self,
        conn: &C,
        wallet_id: &str,
        user_id: &str,
        signed_amount: i64,
        kind: TransactionKind,
        description: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<WalletTransaction> {
        let updated = wallets::Entity::find_by_id(wallet_id.to_string())
            .one(conn)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("wallet of {user_id}")))?;
        let entry = WalletTransaction {
            id: Uuid::new_v4(),
            wallet_id: crate::util::parse_uuid(wallet_id, "wallet")?,
            user_id: user_id.to_string(),
            amount: signed_amount,
            kind,
            description: description.to_string(),
            balance_after: updated.balance,
            created_at: now,
        };
        let model: wallet_transactions::ActiveModel = (&entry).into();
        model.insert(conn).await?;
        Ok(entry)
    }
}
