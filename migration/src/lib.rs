pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_directory_tables;
mod m20250301_000002_create_credit_balances;
mod m20250301_000003_create_subscriptions;
mod m20250315_000001_create_cash_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_directory_tables::Migration),
            Box::new(m20250301_000002_create_credit_balances::Migration),
            Box::new(m20250301_000003_create_subscriptions::Migration),
            Box::new(m20250315_000001_create_cash_tables::Migration),
        ]
    }
}
