use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_create_directory_tables::Vendors;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Credit purchases from / returns to vendors
        manager
            .create_table(
                Table::create()
                    .table(VendorTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(VendorTransactions::VendorId))
                    .col(string(VendorTransactions::ServiceName))
                    .col(string(VendorTransactions::Kind))
                    .col(integer(VendorTransactions::Credits))
                    .col(double(VendorTransactions::Amount).default(0.0))
                    .col(date(VendorTransactions::OccurredOn))
                    .col(string(VendorTransactions::Notes).default(""))
                    .col(timestamp_with_time_zone(VendorTransactions::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendor_transactions_vendor")
                            .from(VendorTransactions::Table, VendorTransactions::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vendor_transactions_vendor_service")
                    .table(VendorTransactions::Table)
                    .col(VendorTransactions::VendorId)
                    .col(VendorTransactions::ServiceName)
                    .to_owned(),
            )
            .await?;

        // General business income and expenses
        manager
            .create_table(
                Table::create()
                    .table(BusinessTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(BusinessTransactions::Kind))
                    .col(string(BusinessTransactions::Category).default(""))
                    .col(double(BusinessTransactions::Amount))
                    .col(string(BusinessTransactions::Description).default(""))
                    .col(date(BusinessTransactions::OccurredOn))
                    .col(timestamp_with_time_zone(BusinessTransactions::CreatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_business_transactions_occurred_on")
                    .table(BusinessTransactions::Table)
                    .col(BusinessTransactions::OccurredOn)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BusinessTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VendorTransactions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VendorTransactions {
    Table,
    Id,
    VendorId,
    ServiceName,
    Kind,
    Credits,
    Amount,
    OccurredOn,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BusinessTransactions {
    Table,
    Id,
    Kind,
    Category,
    Amount,
    Description,
    OccurredOn,
    CreatedAt,
}
