//! ==============================================================================
//! main.rs - smart river dashboard entry point
//! ==============================================================================
//!
//! purpose:
//!     demo dashboard for river water-quality monitoring. there is no sensor
//!     hardware: a simulator drifts one shared reading every 2 seconds and the
//!     web server shows it.
//!
//! responsibilities:
//!     - load configuration and initialize logging
//!     - create the reading store with the seed values
//!     - start the simulator loop before accepting requests
//!     - serve the dashboard pages and the /get_data api
//!     - shut both down cleanly on ctrl-c
//!
//! architecture:
//!
//!     ┌─────────────────────────────────────────────────────────────┐
//!     │                     rust host (this file)                    │
//!     │  ┌──────────────────┐               ┌─────────────────────┐  │
//!     │  │ simulator loop   │               │ web server          │  │
//!     │  │ (2s tick, writer)│               │ (port 5000, readers)│  │
//!     │  └────────┬─────────┘               └──────────┬──────────┘  │
//!     │           │          ┌──────────────┐          │             │
//!     │           └─────────►│ reading store│◄─────────┘             │
//!     │                      │ (one mutex)  │                        │
//!     │                      └──────────────┘                        │
//!     │        (Clone-able handle, shared with both tasks)           │
//!     └─────────────────────────────────────────────────────────────┘
//!
//! ==============================================================================

mod config;
mod domain;
mod server;
mod simulator;
mod store;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // startup banner
    println!("===========================================================");
    println!("  Smart River Management Dashboard");
    println!("  Live Data Simulation is ACTIVE");
    println!("===========================================================");

    // step 1: load configuration
    let config = config::DashboardConfig::load_or_default();
    config.print_summary();

    // step 2: logging (RUST_LOG wins over the config file)
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .context("invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // step 3: shared state
    let store = store::ReadingStore::new(domain::Reading::seed(domain::unix_now()));
    let shutdown = CancellationToken::new();

    // step 4: simulator runs before the first request is accepted
    let sim = simulator::Simulator::new(store.clone(), config.logging.show_sensor_data);
    let sim_task = tokio::spawn(sim.run(shutdown.child_token()));

    // step 5: ctrl-c cancels everything
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested");
                signal_token.cancel();
            }
            // keep serving; the process can still be killed
            Err(e) => error!(error = %e, "failed to listen for ctrl-c"),
        }
    });

    // step 6: web server
    let addr = config.server.bind_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    println!(
        "Open your web browser and navigate to http://127.0.0.1:{}",
        config.server.port
    );

    let state = server::AppState::new(store, config.pages.template_dir.clone());
    let served = server::run_server(listener, state, shutdown.clone()).await;

    shutdown.cancel();
    sim_task.await.context("simulator task panicked")?;
    served
}
