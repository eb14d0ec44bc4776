pub mod analytics;
pub mod clients;
pub mod freelancers;
pub mod messages;
pub mod portfolio;
pub mod quotes;
pub mod reviews;
pub mod users;
pub mod works;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Create a SeaORM database connection pool.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
