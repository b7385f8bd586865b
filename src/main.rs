//! Reel Bridge - agent bridge for a reel-in minigame simulation
//!
//! This binary wires the bridge to an in-process demo host: it runs the
//! simulation tick loop at a fixed rate while the bridge streams snapshots
//! to a connected agent over loopback TCP and feeds the agent's commands
//! back into the host. Against the real game the same bridge runs embedded,
//! with the host adapter replacing the demo host.

use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reel_bridge::bridge::Bridge;
use reel_bridge::config::Config;
use reel_bridge::host::DemoHost;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level);

    info!("Starting Reel Bridge");
    info!("Listener address: {}", config.bind_addr);
    info!("Simulation rate: {} tps", config.simulation_tps);

    // Start the network half
    let bridge = Bridge::start(&config).await?;

    // Demo host: rod in the water, minigame running
    let mut host = DemoHost::new(0x5EED);
    host.equip_rod();
    host.start_minigame(45);

    let mut coordinator = bridge.tick_coordinator();

    // Fixed-rate tick loop, raced against the shutdown signal
    let mut tick_interval = tokio::time::interval(config.tick_period());
    tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let dt = 1.0 / config.simulation_tps as f32;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                host.step(dt);
                coordinator.on_tick(&mut host);
            }
            _ = &mut shutdown => break,
        }
    }

    bridge.stop().await;

    info!("Bridge shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
