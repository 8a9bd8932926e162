use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_create_directory_tables::{Customers, Vendors};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(string(Subscriptions::CustomerId))
                    .col(string(Subscriptions::ServiceName))
                    .col(date(Subscriptions::StartDate))
                    .col(date(Subscriptions::ExpirationDate))
                    .col(double(Subscriptions::AmountPaid))
                    .col(integer(Subscriptions::CreditsUsed).default(0))
                    .col(string_null(Subscriptions::VendorId))
                    .col(string_null(Subscriptions::VendorServiceName))
                    .col(string_null(Subscriptions::BundleId))
                    .col(string(Subscriptions::OrderStatus).default("pending"))
                    .col(string(Subscriptions::PaymentType).default(""))
                    .col(string(Subscriptions::PaymentStatus).default("unpaid"))
                    .col(string_null(Subscriptions::TransactionRef))
                    .col(string(Subscriptions::Status).default("active"))
                    .col(string(Subscriptions::Classification).default(""))
                    .col(double(Subscriptions::DiscountAmount).default(0.0))
                    .col(string(Subscriptions::MacAddress).default(""))
                    .col(string(Subscriptions::Notes).default(""))
                    .col(timestamp_with_time_zone(Subscriptions::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Subscriptions::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_customer")
                            .from(Subscriptions::Table, Subscriptions::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_vendor")
                            .from(Subscriptions::Table, Subscriptions::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_customer")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_bundle")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::BundleId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_subscriptions_created_at")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Subscriptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Subscriptions {
    Table,
    Id,
    CustomerId,
    ServiceName,
    StartDate,
    ExpirationDate,
    AmountPaid,
    CreditsUsed,
    VendorId,
    VendorServiceName,
    BundleId,
    OrderStatus,
    PaymentType,
    PaymentStatus,
    TransactionRef,
    Status,
    Classification,
    DiscountAmount,
    MacAddress,
    Notes,
    CreatedAt,
    UpdatedAt,
}
