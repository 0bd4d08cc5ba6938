use anyhow::Result;
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;
use tokio::sync::watch;

use nudge::core::Config;
use nudge::database::Database;
use nudge::dispatch::LogGateway;
use nudge::features::reminders::ReminderScheduler;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting Nudge reminder bot...");

    let database = Database::open(&config.data_dir).await?;

    // Start the reminder scheduler
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = ReminderScheduler::new(
        database.clone(),
        Arc::new(LogGateway),
        config.tick_interval,
        config.deactivate_undelivered,
    );
    let scheduler_task = tokio::spawn(scheduler.run(shutdown_rx));

    info!(
        "Scheduler running (tick: {}s). Press Ctrl-C to stop.",
        config.tick_interval.as_secs()
    );
    tokio::signal::ctrl_c().await?;

    // Let an in-flight sweep finish before exiting
    info!("Shutdown signal received");
    let _ = shutdown_tx.send(true);
    scheduler_task.await?;

    Ok(())
}
