use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod agent;
mod config;
mod error;
mod feed;
mod models;
mod reporter;
mod scheduler;
mod store;

use agent::Agent;
use config::AgentConfig;
use scheduler::Status;

/// Periodic location reporting agent
///
/// Reads position fixes as JSON lines from stdin and reports the latest one
/// to the configured endpoint on a fixed cadence.
#[derive(Parser, Debug)]
#[command(name = "geobeacon", version)]
struct Args {
    /// Endpoint URL to POST location reports to
    #[arg(long, default_value = config::DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Device identifier sent as BikeId
    #[arg(long, default_value = config::DEFAULT_DEVICE_ID)]
    device_id: String,

    /// Asset identifier sent as device_code
    #[arg(long, default_value = config::DEFAULT_ASSET_ID)]
    asset_id: String,

    /// Seconds between scheduled reports
    #[arg(long, default_value_t = config::DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

impl From<Args> for AgentConfig {
    fn from(args: Args) -> Self {
        Self {
            endpoint: args.endpoint,
            device_id: args.device_id,
            asset_id: args.asset_id,
            interval: Duration::from_secs(args.interval),
            timeout: Duration::from_secs(args.timeout),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config: AgentConfig = Args::parse().into();
    let agent = Agent::new(&config)?;

    // Stand-in for the UI collaborator: render each status change.
    let mut status = agent.status();
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            match *status.borrow_and_update() {
                Status::WaitingForFix => tracing::info!("Waiting for GPS location..."),
                Status::Fix {
                    latitude,
                    longitude,
                } => tracing::info!("Latitude: {:.6} Longitude: {:.6}", latitude, longitude),
            }
        }
    });

    agent.start(feed::stdin_feed());
    tracing::info!("Reporting to {} every {:?}", config.endpoint, config.interval);

    tokio::signal::ctrl_c().await?;
    agent.stop();

    Ok(())
}
