use anyhow::Context;
use paperstore_api::{
    config,
    db::{self, DbConfig},
    migrator::Migrator,
};
use sea_orm_migration::MigratorTrait;
use tracing::info;

/// Applies or rolls back the embedded schema migrations.
///
/// Usage: `migration [up|down [steps]|status]`. The target database is taken from
/// `DATABASE_URL`, falling back to the configured `database_url`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "up".to_string());

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => config::load_config()
            .context("DATABASE_URL is unset and configuration could not be loaded")?
            .database_url,
    };

    info!("Connecting to database");
    let conn = db::establish_connection_with_config(&DbConfig {
        url: database_url,
        max_connections: 1,
        min_connections: 1,
        ..DbConfig::default()
    })
    .await
    .context("failed to connect to database")?;

    match command.as_str() {
        "up" => {
            Migrator::up(&conn, None).await?;
            info!("Migrations applied");
        }
        "down" => {
            let steps = args
                .next()
                .map(|raw| raw.parse::<u32>())
                .transpose()
                .context("steps must be a positive integer")?
                .unwrap_or(1);
            Migrator::down(&conn, Some(steps)).await?;
            info!(steps, "Migrations rolled back");
        }
        "status" => {
            Migrator::status(&conn).await?;
        }
        other => anyhow::bail!("unknown command `{}`; expected up, down or status", other),
    }

    Ok(())
}
