//! The batch/sleep simulation loop.
//!
//! Each iteration walks the fleet, generates a few records per source,
//! delivers and echoes each one, then sleeps for a random interval. A failed
//! batch is followed by a fixed backoff. The loop ends only when the shutdown
//! channel flips to `true`.

use crate::config::SimulatorConfig;
use crate::console::Console;
use crate::delivery::DeliverySink;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shared::generator::RecordGenerator;
use shared::models::SourceIdentity;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// Errors that abort a single batch.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A record could not be serialized.
    #[error("Failed to serialize record from {label}: {source}")]
    Serialize {
        /// Console label of the emitting source.
        label: String,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The console could not be written.
    #[error("Failed to write console output: {0}")]
    Console(#[from] std::io::Error),
}

/// Where the loop currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Generating and delivering a batch.
    GeneratingBatch,
    /// Waiting for the next batch.
    Sleeping,
    /// Shut down.
    Stopped,
}

/// Counters for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Sources visited.
    pub sources: u32,
    /// Records generated and handed to the sinks.
    pub records: usize,
    /// Records accepted by every sink.
    pub fully_delivered: usize,
    /// Individual sink failures.
    pub sink_failures: usize,
    /// The batch stopped early because shutdown was requested.
    pub interrupted: bool,
}

/// Totals for a whole run, logged at exit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Batches started.
    pub iterations: u64,
    /// Records generated across all batches.
    pub records: u64,
    /// Individual sink failures across all batches.
    pub sink_failures: u64,
    /// Batches that ended in a [`SimulationError`].
    pub failed_batches: u64,
}

impl RunSummary {
    fn absorb(&mut self, stats: &BatchStats) {
        self.records += stats.records as u64;
        self.sink_failures += stats.sink_failures as u64;
    }
}

/// One simulator: a generator, its sinks, and the loop state.
pub struct Simulation {
    config: SimulatorConfig,
    generator: Box<dyn RecordGenerator>,
    sink: DeliverySink,
    console: Console,
    rng: StdRng,
    state: LoopState,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("variant", &self.generator.variant())
            .field("config", &self.config)
            .field("sink", &self.sink)
            .field("console", &self.console)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a simulation. The RNG is seeded from `config.seed` when set.
    #[must_use]
    pub fn new(
        config: SimulatorConfig,
        generator: Box<dyn RecordGenerator>,
        sink: DeliverySink,
        console: Console,
    ) -> Self {
        let rng = config
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Self {
            config,
            generator,
            sink,
            console,
            rng,
            state: LoopState::Sleeping,
        }
    }

    /// Current loop state.
    #[must_use]
    pub fn state(&self) -> LoopState {
        self.state
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Draws the sleep before the next batch, uniform in
    /// `[interval_min, interval_max)`.
    pub fn next_interval(&mut self) -> Duration {
        let secs = self.rng.gen_range(
            self.config.interval_min.as_secs_f64()..self.config.interval_max.as_secs_f64(),
        );
        Duration::from_secs_f64(secs)
    }

    /// Generates, delivers, and echoes one batch across the fleet.
    ///
    /// Shutdown is checked before each record; when it is set the batch
    /// returns early with `interrupted` set.
    ///
    /// # Errors
    ///
    /// Returns an error if a record cannot be serialized or the console
    /// cannot be written. Sink failures are counted, not returned.
    pub async fn run_batch(
        &mut self,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<BatchStats, SimulationError> {
        self.state = LoopState::GeneratingBatch;
        let mut stats = BatchStats::default();

        for source in SourceIdentity::fleet(self.config.sources) {
            stats.sources += 1;
            let count = self.rng.gen_range(self.config.records_per_source());
            let records = self.generator.generate_batch(&mut self.rng, source, count);

            for record in records {
                if *shutdown.borrow() {
                    stats.interrupted = true;
                    return Ok(stats);
                }

                let payload = record.payload().map_err(|source| SimulationError::Serialize {
                    label: record.console_label(),
                    source,
                })?;

                let report = self.sink.deliver(&payload).await;
                stats.records += 1;
                stats.sink_failures += report.failures().count();
                if report.is_complete() {
                    stats.fully_delivered += 1;
                }

                self.console.echo(&record)?;
            }
        }

        Ok(stats)
    }

    /// Runs batches until `shutdown` becomes `true`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> RunSummary {
        let mut summary = RunSummary::default();

        tracing::info!(
            variant = %self.config.variant,
            sources = self.config.sources,
            collector = %self.config.collector_addr(),
            log_file = %self.config.log_file.display(),
            "Simulator starting"
        );

        while !*shutdown.borrow() {
            summary.iterations += 1;

            let wait = match self.run_batch(&shutdown).await {
                Ok(stats) => {
                    summary.absorb(&stats);
                    tracing::info!(
                        iteration = summary.iterations,
                        records = stats.records,
                        fully_delivered = stats.fully_delivered,
                        sink_failures = stats.sink_failures,
                        "Batch complete"
                    );
                    if stats.interrupted {
                        break;
                    }
                    self.next_interval()
                }
                Err(error) => {
                    summary.failed_batches += 1;
                    tracing::error!(
                        iteration = summary.iterations,
                        %error,
                        backoff = ?self.config.backoff,
                        "Batch failed, backing off"
                    );
                    self.config.backoff
                }
            };

            self.state = LoopState::Sleeping;
            tracing::debug!(?wait, "Sleeping until next batch");
            if sleep_or_shutdown(wait, &mut shutdown).await {
                break;
            }
        }

        self.state = LoopState::Stopped;
        tracing::info!(
            iterations = summary.iterations,
            records = summary.records,
            sink_failures = summary.sink_failures,
            failed_batches = summary.failed_batches,
            "Simulator stopped"
        );
        summary
    }
}

/// Sleeps for `wait`, returning `true` early if shutdown is requested.
///
/// A closed channel means no shutdown can arrive, so the full sleep runs.
async fn sleep_or_shutdown(wait: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(wait);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            () = &mut sleep => return false,
            changed = shutdown.changed() => match changed {
                Ok(()) if *shutdown.borrow() => return true,
                Ok(()) => {}
                Err(_) => {
                    sleep.await;
                    return false;
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::config::FieldPools;
    use shared::generator::build_generator;
    use shared::models::Variant;

    fn simulation(seed: u64) -> Simulation {
        let config = SimulatorConfig {
            seed: Some(seed),
            ..SimulatorConfig::for_variant(Variant::Database)
        };
        let generator = build_generator(Variant::Database, &FieldPools::default()).unwrap();
        Simulation::new(config, generator, DeliverySink::new(Vec::new()), Console::disabled())
    }

    #[test]
    fn test_next_interval_within_bounds() {
        let mut sim = simulation(3);
        for _ in 0..1000 {
            let wait = sim.next_interval();
            assert!(wait >= Duration::from_secs(5), "{wait:?}");
            assert!(wait < Duration::from_secs(10), "{wait:?}");
        }
    }

    #[test]
    fn test_seeded_intervals_repeat() {
        let mut a = simulation(11);
        let mut b = simulation(11);
        for _ in 0..10 {
            assert_eq!(a.next_interval(), b.next_interval());
        }
    }

    #[tokio::test]
    async fn test_batch_counts_records_per_source() {
        let mut sim = simulation(7);
        let (_tx, rx) = watch::channel(false);

        for _ in 0..20 {
            let stats = sim.run_batch(&rx).await.unwrap();
            assert_eq!(stats.sources, 5);
            assert!((5..=15).contains(&stats.records), "{}", stats.records);
            assert_eq!(stats.fully_delivered, stats.records);
            assert_eq!(stats.sink_failures, 0);
            assert!(!stats.interrupted);
        }
        assert_eq!(sim.state(), LoopState::GeneratingBatch);
    }

    #[tokio::test]
    async fn test_batch_stops_when_shutdown_is_set() {
        let mut sim = simulation(7);
        let (_tx, rx) = watch::channel(true);

        let stats = sim.run_batch(&rx).await.unwrap();
        assert!(stats.interrupted);
        assert_eq!(stats.records, 0);
    }

    #[tokio::test]
    async fn test_run_returns_immediately_when_already_stopped() {
        let sim = simulation(1);
        let (_tx, rx) = watch::channel(true);

        let summary = sim.run(rx).await;
        assert_eq!(summary, RunSummary::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_or_shutdown_wakes_on_signal() {
        let (tx, mut rx) = watch::channel(false);
        let start = tokio::time::Instant::now();

        let handle = tokio::spawn(async move {
            sleep_or_shutdown(Duration::from_secs(60), &mut rx).await
        });
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.send(true).unwrap();

        assert!(handle.await.unwrap());
        assert!(start.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_or_shutdown_survives_closed_channel() {
        let (tx, mut rx) = watch::channel(false);
        drop(tx);
        let start = tokio::time::Instant::now();

        assert!(!sleep_or_shutdown(Duration::from_secs(5), &mut rx).await);
        assert!(start.elapsed() >= Duration::from_secs(5));
    }
}
