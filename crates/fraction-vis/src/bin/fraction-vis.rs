//! Fraction Visualizer Server
//!
//! Serve the walkthrough controls and live state for a frontend.

use fraction_vis::{Simulator, VisConfig, VisServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fraction_vis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = VisConfig::from_env()?;
    tracing::info!(
        addr = %config.addr,
        tick_ms = config.tick_interval.as_millis() as u64,
        seed = ?config.simulator.seed,
        "Starting fraction visualizer"
    );

    let sim = Simulator::new(config.simulator.clone())?;
    let server = VisServer::new(sim, &config);
    server.serve(config.addr).await?;

    Ok(())
}
