use clap::{Args, Subcommand};
use popups_migrations::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use tracing::info;

#[derive(Args)]
pub struct MigrateCommand {
    /// Database connection URL
    #[arg(long, env = "POPUPS_DATABASE_URL")]
    pub database_url: String,

    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand)]
pub enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Roll back the most recent migrations
    Down {
        /// Number of migrations to roll back
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Print applied and pending migrations
    Status,
}

impl MigrateCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run())
    }

    async fn run(self) -> anyhow::Result<()> {
        let mut opt = ConnectOptions::new(self.database_url.clone());
        opt.sqlx_logging(false);
        let db = Database::connect(opt).await?;

        match self.action {
            MigrateAction::Up => {
                Migrator::up(&db, None).await?;
                info!("All migrations applied");
            }
            MigrateAction::Down { steps } => {
                Migrator::down(&db, Some(steps)).await?;
                info!("Rolled back {} migration(s)", steps);
            }
            MigrateAction::Status => {
                let applied = Migrator::get_applied_migrations(&db).await?;
                let pending = Migrator::get_pending_migrations(&db).await?;
                for migration in &applied {
                    println!("applied  {}", migration.name());
                }
                for migration in &pending {
                    println!("pending  {}", migration.name());
                }
                info!(
                    "{} applied, {} pending",
                    applied.len(),
                    pending.len()
                );
            }
        }

        db.close().await?;
        Ok(())
    }
}
