use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_create_directory_tables::Vendors;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One row per (vendor, service) ledger key
        manager
            .create_table(
                Table::create()
                    .table(CreditBalances::Table)
                    .if_not_exists()
                    .col(pk_auto(CreditBalances::Id))
                    .col(string(CreditBalances::VendorId))
                    .col(string(CreditBalances::ServiceName))
                    .col(integer(CreditBalances::RemainingCredits).default(0))
                    .col(integer(CreditBalances::TotalPurchased).default(0))
                    .col(integer(CreditBalances::TotalUsed).default(0))
                    .col(timestamp_with_time_zone(CreditBalances::LastUpdated).not_null())
                    .col(timestamp_with_time_zone(CreditBalances::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_credit_balances_vendor")
                            .from(CreditBalances::Table, CreditBalances::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // The ensure-row upsert conflicts on this index
        manager
            .create_index(
                Index::create()
                    .name("idx_credit_balances_vendor_service")
                    .table(CreditBalances::Table)
                    .col(CreditBalances::VendorId)
                    .col(CreditBalances::ServiceName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CreditBalances::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum CreditBalances {
    Table,
    Id,
    VendorId,
    ServiceName,
    RemainingCredits,
    TotalPurchased,
    TotalUsed,
    LastUpdated,
    CreatedAt,
}
