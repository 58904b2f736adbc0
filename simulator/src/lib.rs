//! Loggen Simulator
//!
//! This crate drives one synthetic log fleet: it repeatedly generates a batch
//! of records, delivers each record to a TCP collector and a local file, echoes
//! a colored summary to the console, and sleeps until the next batch.
//!
//! # Architecture
//!
//! - [`sink`] - Best-effort TCP and file sinks behind the [`Sink`] trait
//! - [`delivery`] - Fan-out of one payload to every sink with a per-sink report
//! - [`console`] - Colored one-line summaries
//! - [`runner`] - The batch/sleep loop with interruptible sleeps and backoff
//!
//! # Example
//!
//! ```no_run
//! use shared::config::FieldPools;
//! use shared::models::Variant;
//! use simulator::{run_simulator, SimulatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = SimulatorConfig::for_variant(Variant::Web);
//!     run_simulator(config, &FieldPools::default(), true).await?;
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod console;
pub mod delivery;
pub mod runner;
pub mod sink;

pub use config::{ConfigError, SimulatorConfig};
pub use console::Console;
pub use delivery::{DeliveryReport, DeliverySink, SinkOutcome};
pub use runner::{BatchStats, LoopState, RunSummary, Simulation, SimulationError};
pub use sink::{FileSink, Sink, SinkError, TcpSink};

use anyhow::Result;
use shared::config::FieldPools;
use shared::generator::build_generator;
use tokio::sync::watch;

/// Runs a simulator until Ctrl+C or SIGTERM.
///
/// Builds the generator for `config.variant` from `pools`, wires the
/// collector and file sinks, and runs the loop with the process signals as
/// the shutdown source.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid
/// - The pools for the configured variant are invalid
pub async fn run_simulator(
    config: SimulatorConfig,
    pools: &FieldPools,
    colored: bool,
) -> Result<RunSummary> {
    config.validate()?;
    let generator = build_generator(config.variant, pools)?;
    let sink = DeliverySink::from_config(&config);
    let simulation = Simulation::new(config, generator, sink, Console::stdout(colored));

    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = tx.send(true);
    });

    Ok(simulation.run(rx).await)
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
///
/// # Panics
///
/// Panics if the signal handlers cannot be installed.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, stopping simulator");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, stopping simulator");
        }
    }
}
