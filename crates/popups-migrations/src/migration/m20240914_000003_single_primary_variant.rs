//! At most one primary variant per popup, enforced by a partial unique index

use sea_orm::DatabaseBackend;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // MySQL has no partial indexes; the variant service still demotes siblings there
        if manager.get_database_backend() == DatabaseBackend::MySql {
            return Ok(());
        }

        let db = manager.get_connection();
        db.execute_unprepared(
            r#"
                CREATE UNIQUE INDEX idx_popup_variants_single_primary
                ON popup_variants(popup_id)
                WHERE is_primary
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == DatabaseBackend::MySql {
            return Ok(());
        }

        let db = manager.get_connection();
        db.execute_unprepared(
            r#"
                DROP INDEX IF EXISTS idx_popup_variants_single_primary
            "#,
        )
        .await?;

        Ok(())
    }
}
