//! Database connection management

use popups_core::{DatabaseConfig, ServiceError, ServiceResult};
use popups_migrations::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;
use tracing::{debug, info};

pub type DbConnection = DatabaseConnection;

pub async fn establish_connection(database_url: &str) -> ServiceResult<Arc<DbConnection>> {
    establish_connection_with_config(&DatabaseConfig::new(database_url)).await
}

/// Connect with explicit pool sizing and bring the schema up to date
pub async fn establish_connection_with_config(
    config: &DatabaseConfig,
) -> ServiceResult<Arc<DbConnection>> {
    if config.url.trim().is_empty() {
        return Err(ServiceError::Configuration {
            message: "database URL must not be empty".to_string(),
        });
    }

    let (min_connections, max_connections) = config.pool_bounds();
    debug!(
        "Connecting to database (pool {}..={})",
        min_connections, max_connections
    );

    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(max_connections)
        .min_connections(min_connections)
        .sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

    // Run migrations
    Migrator::up(&db, None)
        .await
        .map_err(|e| ServiceError::Database(e.to_string()))?;

    info!("Database ready, migrations applied");
    Ok(Arc::new(db))
}
