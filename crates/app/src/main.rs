use std::time::Duration;

use clap::Parser;
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, DbErr};

use settings::Settings;
use telemetry::Telemetry;

mod settings;
mod telemetry;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Family expense tracker REST API.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Settings file. Defaults to `settings.toml` in the working directory.
    #[arg(long, env = "EXPENSE_TRACKER_SETTINGS")]
    settings: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let args = Args::parse();
    let settings = Settings::new(args.settings.as_deref())?;

    let telemetry = Telemetry::new(&settings.app);
    telemetry.init()?;

    let result = run(settings).await;
    if let Err(err) = &result {
        tracing::error!("expense tracker stopped: {err}");
    }
    telemetry.shutdown();
    result
}

async fn run(settings: Settings) -> Result<(), BoxError> {
    let server_settings = settings.server;

    let db = connect_with_retry(
        &server_settings.database.url(),
        server_settings.connect_attempts,
    )
    .await?;
    Migrator::up(&db, None).await?;

    let engine = engine::Engine::builder().database(db).build().await?;
    let validator = server::TokenValidator::new(&settings.auth)?;
    let options = server::ServerOptions {
        cors_allowed_origins: server_settings.cors.allowed_origins,
        log_bodies: server_settings.log_bodies,
        request_timeout: Duration::from_secs(server_settings.request_timeout_secs),
    };

    server::run(
        engine,
        validator,
        options,
        (server_settings.bind.as_str(), server_settings.port),
    )
    .await?;
    Ok(())
}

/// Connects to the store, retrying with a linear backoff.
async fn connect_with_retry(url: &str, attempts: u32) -> Result<DatabaseConnection, DbErr> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match Database::connect(url).await {
            Ok(db) => {
                tracing::info!(attempt, "connected to database");
                return Ok(db);
            }
            Err(err) if attempt < attempts => {
                let delay = Duration::from_millis(500 * u64::from(attempt));
                tracing::warn!(attempt, ?delay, "database connection failed: {err}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
