//! Database migrations for the popups platform
//!
//! Creates the popup tables with their cascading foreign keys and seeds the
//! popup type and layout type lookup rows.

pub use sea_orm_migration::prelude::*;

mod migration;
pub use migration::Migrator;
