//! Initial schema migration - creates all tables from scratch.
//!
//! Consolidated schema for Kerbside:
//!
//! - `users`: marketplace accounts (drivers, hosts, admins)
//! - `listings`: parking spaces with capacity and availability counters
//! - `bookings`: reservations moving through the lifecycle state machine
//! - `wallets`: one stored-value balance per user
//! - `wallet_transactions`: append-only ledger of balance mutations

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Role,
}

#[derive(Iden)]
enum Listings {
    Table,
    Id,
    OwnerId,
    Title,
    Address,
    VehicleType,
    PricePerHour,
    TotalSpaces,
    AvailableSpaces,
    TotalHours,
    AvailableFrom,
    AvailableTo,
    ApprovalStatus,
    TotalBookings,
    CreatedAt,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    ListingId,
    DriverId,
    OwnerId,
    StartTime,
    EndTime,
    NumberOfSpots,
    PricePerHour,
    TotalPrice,
    PlatformFee,
    VehicleType,
    VehicleNumber,
    Status,
    PaymentStatus,
    PaymentReference,
    PaymentMethod,
    IsConfirmedByOwner,
    CancelledBy,
    SpotsReleased,
    CreatedAt,
    ConfirmedAt,
    PaymentCompletedAt,
    SettledAt,
    CancelledAt,
    CompletedAt,
}

#[derive(Iden)]
enum Wallets {
    Table,
    Id,
    UserId,
    Balance,
    TotalCredited,
    TotalDebited,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum WalletTransactions {
    Table,
    Id,
    WalletId,
    UserId,
    Amount,
    Kind,
    Description,
    BalanceAfter,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::Phone).string())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Listings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Listings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Listings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Listings::OwnerId).string().not_null())
                    .col(ColumnDef::new(Listings::Title).string().not_null())
                    .col(ColumnDef::new(Listings::Address).string().not_null())
                    .col(ColumnDef::new(Listings::VehicleType).string().not_null())
                    .col(
                        ColumnDef::new(Listings::PricePerHour)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Listings::TotalSpaces).integer().not_null())
                    .col(
                        ColumnDef::new(Listings::AvailableSpaces)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Listings::TotalHours).big_integer().not_null())
                    .col(
                        ColumnDef::new(Listings::AvailableFrom)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Listings::AvailableTo).timestamp().not_null())
                    .col(
                        ColumnDef::new(Listings::ApprovalStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Listings::TotalBookings)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Listings::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-listings-owner_id")
                    .table(Listings::Table)
                    .col(Listings::OwnerId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Bookings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::ListingId).string().not_null())
                    .col(ColumnDef::new(Bookings::DriverId).string().not_null())
                    .col(ColumnDef::new(Bookings::OwnerId).string().not_null())
                    .col(ColumnDef::new(Bookings::StartTime).timestamp().not_null())
                    .col(ColumnDef::new(Bookings::EndTime).timestamp().not_null())
                    .col(
                        ColumnDef::new(Bookings::NumberOfSpots)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::PricePerHour)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::TotalPrice).big_integer().not_null())
                    .col(
                        ColumnDef::new(Bookings::PlatformFee)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::VehicleType).string().not_null())
                    .col(ColumnDef::new(Bookings::VehicleNumber).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::PaymentStatus)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Bookings::PaymentReference).string())
                    .col(ColumnDef::new(Bookings::PaymentMethod).string())
                    .col(
                        ColumnDef::new(Bookings::IsConfirmedByOwner)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Bookings::CancelledBy).string())
                    .col(
                        ColumnDef::new(Bookings::SpotsReleased)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Bookings::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Bookings::ConfirmedAt).timestamp())
                    .col(ColumnDef::new(Bookings::PaymentCompletedAt).timestamp())
                    .col(ColumnDef::new(Bookings::SettledAt).timestamp())
                    .col(ColumnDef::new(Bookings::CancelledAt).timestamp())
                    .col(ColumnDef::new(Bookings::CompletedAt).timestamp())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-listing_id")
                            .from(Bookings::Table, Bookings::ListingId)
                            .to(Listings::Table, Listings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-driver_id")
                    .table(Bookings::Table)
                    .col(Bookings::DriverId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-owner_id")
                    .table(Bookings::Table)
                    .col(Bookings::OwnerId)
                    .to_owned(),
            )
            .await?;

        // The lifecycle sweep scans by status and window bounds.
        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-status-end_time")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .col(Bookings::EndTime)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Wallets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Wallets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Wallets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Wallets::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Wallets::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Wallets::TotalCredited)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Wallets::TotalDebited)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Wallets::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Wallets::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wallets-user_id-unique")
                    .table(Wallets::Table)
                    .col(Wallets::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Wallet transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(WalletTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WalletTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::WalletId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::UserId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WalletTransactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(WalletTransactions::Description)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::BalanceAfter)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WalletTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-wallet_transactions-wallet_id")
                            .from(WalletTransactions::Table, WalletTransactions::WalletId)
                            .to(Wallets::Table, Wallets::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-wallet_transactions-user_id-created_at")
                    .table(WalletTransactions::Table)
                    .col(WalletTransactions::UserId)
                    .col(WalletTransactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WalletTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Wallets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Listings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
