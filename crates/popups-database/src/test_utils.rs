//! Test utilities for database integration tests
//!
//! `TestDatabase::new()` gives every test its own migrated in-memory SQLite
//! database, so tests never share state. `TestDatabase::sqlite_file()` backs a
//! real multi-connection pool with a temporary file, for tests that need
//! concurrent writers. `TestDatabase::postgres()` runs the
//! same schema inside a throwaway Postgres container for backend-specific
//! checks; it needs Docker.

use crate::{establish_connection_with_config, DbConnection};
use popups_core::DatabaseConfig;
use popups_migrations::Migrator;
use sea_orm::*;
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use testcontainers::{runners::AsyncRunner, ContainerAsync, GenericImage, ImageExt};

/// Migrated test database
pub struct TestDatabase {
    pub db: Arc<DbConnection>,
    pub database_url: String,
    /// Keeps the Postgres container alive for the lifetime of the test
    #[allow(dead_code)]
    container: Option<ContainerAsync<GenericImage>>,
    /// Directory holding a file-backed SQLite database; removed on drop
    #[allow(dead_code)]
    dir: Option<TempDir>,
}

impl TestDatabase {
    /// Fresh in-memory SQLite database with all migrations applied
    pub async fn new() -> anyhow::Result<Self> {
        let database_url = "sqlite::memory:".to_owned();

        // Every pooled connection to :memory: would get its own database
        let mut opt = ConnectOptions::new(database_url.clone());
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open in-memory database: {}", e))?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

        Ok(Self {
            db: Arc::new(db),
            database_url,
            container: None,
            dir: None,
        })
    }

    /// SQLite database in a temporary file, pooled with `max_connections`
    /// connections and migrated through the regular connection path
    pub async fn sqlite_file(max_connections: u32) -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;
        let database_url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("popups.db").display()
        );

        let mut config = DatabaseConfig::new(database_url.clone());
        config.max_connections = max_connections;
        config.min_connections = 1;
        let db = establish_connection_with_config(&config).await?;

        Ok(Self {
            db,
            database_url,
            container: None,
            dir: Some(dir),
        })
    }

    /// Dedicated Postgres container with all migrations applied
    pub async fn postgres() -> anyhow::Result<Self> {
        let db_name = "test_db";
        let username = "test_user";
        let password = "test_password";

        let postgres_container = GenericImage::new("postgres", "16-alpine")
            .with_env_var("POSTGRES_DB", db_name)
            .with_env_var("POSTGRES_USER", username)
            .with_env_var("POSTGRES_PASSWORD", password)
            .with_env_var("POSTGRES_HOST_AUTH_METHOD", "trust")
            .start()
            .await?;

        let port = postgres_container.get_host_port_ipv4(5432).await?;
        let database_url = format!(
            "postgresql://{}:{}@localhost:{}/{}",
            username, password, port, db_name
        );

        // Wait for the database to be ready
        tokio::time::sleep(Duration::from_secs(3)).await;

        let db = Self::connect_with_retry(&database_url, 10).await?;

        Migrator::up(&db, None)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

        Ok(Self {
            db: Arc::new(db),
            database_url,
            container: Some(postgres_container),
            dir: None,
        })
    }

    /// Connect to database with retry logic
    async fn connect_with_retry(
        database_url: &str,
        max_retries: u32,
    ) -> anyhow::Result<DbConnection> {
        let mut retries = max_retries;

        let mut opt = ConnectOptions::new(database_url.to_owned());
        opt.max_connections(5)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        loop {
            match Database::connect(opt.clone()).await {
                Ok(db) => return Ok(db),
                Err(e) if retries > 0 => {
                    eprintln!(
                        "Failed to connect to database (retries left: {}): {}",
                        retries, e
                    );
                    retries -= 1;
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
                Err(e) => {
                    return Err(anyhow::anyhow!(
                        "Failed to connect to database after {} retries: {}",
                        max_retries,
                        e
                    ));
                }
            }
        }
    }

    /// Shared handle for services under test
    pub fn connection_arc(&self) -> Arc<DbConnection> {
        Arc::clone(&self.db)
    }

    pub fn backend(&self) -> DatabaseBackend {
        self.db.get_database_backend()
    }

    /// Execute raw SQL for test setup
    pub async fn execute_sql(&self, sql: &str) -> anyhow::Result<ExecResult> {
        let statement = Statement::from_string(self.backend(), sql.to_owned());
        let result = self.db.execute(statement).await.map_err(anyhow::Error::from)?;
        Ok(result)
    }

    /// Query raw SQL and return results
    pub async fn query_sql(&self, sql: &str) -> anyhow::Result<Vec<QueryResult>> {
        let statement = Statement::from_string(self.backend(), sql.to_owned());
        let result = self.db.query_all(statement).await.map_err(anyhow::Error::from)?;
        Ok(result)
    }

    /// Row count of a table
    pub async fn count_rows(&self, table: &str) -> anyhow::Result<i64> {
        let rows = self
            .query_sql(&format!("SELECT COUNT(*) AS n FROM {}", table))
            .await?;
        let n = rows
            .first()
            .ok_or_else(|| anyhow::anyhow!("COUNT returned no row for {}", table))?
            .try_get::<i64>("", "n")?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_each_database_is_isolated() -> anyhow::Result<()> {
        let first = TestDatabase::new().await?;
        let second = TestDatabase::new().await?;

        first
            .execute_sql("INSERT INTO popup_types (name) VALUES ('Exit Survey')")
            .await?;

        assert_eq!(first.count_rows("popup_types").await?, 4);
        assert_eq!(second.count_rows("popup_types").await?, 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_sqlite_backend_is_reported() -> anyhow::Result<()> {
        let test_db = TestDatabase::new().await?;
        assert_eq!(test_db.backend(), DatabaseBackend::Sqlite);
        assert_eq!(test_db.database_url, "sqlite::memory:");
        Ok(())
    }

    #[tokio::test]
    async fn test_sqlite_file_pools_several_connections() -> anyhow::Result<()> {
        let test_db = TestDatabase::sqlite_file(4).await?;
        assert_eq!(test_db.backend(), DatabaseBackend::Sqlite);
        assert!(test_db.database_url.ends_with("popups.db?mode=rwc"));
        assert_eq!(test_db.count_rows("popup_types").await?, 3);
        Ok(())
    }

    #[tokio::test]
    #[ignore]
    async fn test_postgres_container_is_migrated() -> anyhow::Result<()> {
        let test_db = TestDatabase::postgres().await?;
        assert_eq!(test_db.backend(), DatabaseBackend::Postgres);
        assert_eq!(test_db.count_rows("popup_layout_types").await?, 3);
        Ok(())
    }
}
