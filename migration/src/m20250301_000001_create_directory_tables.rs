use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Customers (subscriptions reference these)
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).string().not_null().primary_key())
                    .col(string(Customers::Name))
                    .col(string(Customers::Phone).default(""))
                    .col(string(Customers::Email).default(""))
                    .col(string(Customers::Notes).default(""))
                    .col(timestamp_with_time_zone(Customers::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Customers::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_name")
                    .table(Customers::Table)
                    .col(Customers::Name)
                    .to_owned(),
            )
            .await?;

        // Vendors (credit balances and vendor transactions reference these)
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Vendors::Id).string().not_null().primary_key())
                    .col(string(Vendors::Name))
                    .col(string(Vendors::Contact).default(""))
                    .col(string(Vendors::Notes).default(""))
                    .col(timestamp_with_time_zone(Vendors::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Vendors::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vendors_name")
                    .table(Vendors::Table)
                    .col(Vendors::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Customers {
    Table,
    Id,
    Name,
    Phone,
    Email,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Vendors {
    Table,
    Id,
    Name,
    Contact,
    Notes,
    CreatedAt,
    UpdatedAt,
}
