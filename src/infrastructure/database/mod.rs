pub mod entities;
pub mod migrator;
pub mod repositories;

use sea_orm::{Database, DatabaseConnection};
use tracing::info;

/// Open the database connection pool.
///
/// The URL comes from `[database].url` in the configuration, e.g.
/// "sqlite://./accounts.db?mode=rwc" or a postgres URL.
pub async fn init_database(url: &str) -> Result<DatabaseConnection, sea_orm::DbErr> {
    info!("Connecting to database: {}", url);
    let db = Database::connect(url).await?;
    info!("Database connected successfully");
    Ok(db)
}
