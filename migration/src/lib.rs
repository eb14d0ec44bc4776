pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_profile_tables;
mod m20250301_000003_create_catalog_tables;
mod m20250301_000004_create_portfolio_tables;
mod m20250301_000005_create_works_and_quotes;
mod m20250301_000006_create_messaging_tables;
mod m20250301_000007_create_reviews_table;
mod m20250301_000008_create_analytics_tables;
mod m20250301_000009_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_profile_tables::Migration),
            Box::new(m20250301_000003_create_catalog_tables::Migration),
            Box::new(m20250301_000004_create_portfolio_tables::Migration),
            Box::new(m20250301_000005_create_works_and_quotes::Migration),
            Box::new(m20250301_000006_create_messaging_tables::Migration),
            Box::new(m20250301_000007_create_reviews_table::Migration),
            Box::new(m20250301_000008_create_analytics_tables::Migration),
            Box::new(m20250301_000009_add_indexes::Migration),
        ]
    }
}
