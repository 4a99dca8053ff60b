pub use sea_orm_migration::prelude::*;

mod m20240914_000001_create_popup_tables;
mod m20240914_000002_seed_lookup_types;
mod m20240914_000003_single_primary_variant;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240914_000001_create_popup_tables::Migration),
            Box::new(m20240914_000002_seed_lookup_types::Migration),
            Box::new(m20240914_000003_single_primary_variant::Migration),
        ]
    }
}
