//! Migrate command - manages the PostgreSQL schema

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::storage::{
    revert_last_storage_migration, run_storage_migrations, PostgresPersistence, StorageConfig,
};

#[derive(Args, Debug, Default)]
pub struct MigrateArgs {
    /// Revert the most recently applied migration instead of applying pending ones
    #[arg(long)]
    pub revert: bool,
}

/// Run the migrate command
pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging)?;

    let storage = StorageConfig::from_settings(&config.storage, std::env::var("DATABASE_URL").ok())?;
    let StorageConfig::Postgres(postgres) = storage else {
        anyhow::bail!("migrate requires storage.backend = \"postgres\"");
    };

    let persistence = PostgresPersistence::connect(&postgres).await?;

    if args.revert {
        match revert_last_storage_migration(persistence.pool()).await? {
            Some(version) => info!(version, "Reverted migration"),
            None => info!("No migrations to revert"),
        }
    } else {
        run_storage_migrations(persistence.pool()).await?;
        info!("Migrations up to date");
    }

    Ok(())
}
