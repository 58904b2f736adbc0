//! Integration tests for the simulation loop.
//!
//! These run on a paused tokio clock so the 5-10 second sleeps complete
//! instantly. Sinks are in-memory to keep real I/O off the paused clock.

use shared::config::FieldPools;
use shared::generator::build_generator;
use shared::models::Variant;
use simulator::{Console, DeliverySink, RunSummary, Simulation, SimulatorConfig};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::common::{BrokenPipe, MemorySink};

fn spawn_simulation(
    variant: Variant,
    console: Console,
) -> (MemorySink, watch::Sender<bool>, JoinHandle<RunSummary>) {
    let config = SimulatorConfig {
        seed: Some(7),
        ..SimulatorConfig::for_variant(variant)
    };
    let generator = build_generator(variant, &FieldPools::default()).unwrap();
    let memory = MemorySink::default();
    let delivery = DeliverySink::new(vec![Box::new(memory.clone())]);
    let simulation = Simulation::new(config, generator, delivery, console);

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(simulation.run(rx));
    (memory, tx, handle)
}

#[tokio::test(start_paused = true)]
async fn test_single_iteration_delivers_one_to_three_per_source() {
    let (memory, tx, handle) = spawn_simulation(Variant::Database, Console::disabled());

    // The first batch runs at t=0, the next cannot start before t=5.
    tokio::time::sleep(Duration::from_secs(1)).await;
    tx.send(true).unwrap();
    let summary = handle.await.unwrap();

    assert_eq!(summary.iterations, 1);
    assert!((5..=15).contains(&summary.records), "{}", summary.records);
    assert_eq!(memory.lines().len() as u64, summary.records);
    assert_eq!(summary.failed_batches, 0);
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_cuts_sleep_short() {
    let (_memory, tx, handle) = spawn_simulation(Variant::Microservice, Console::disabled());

    tokio::time::sleep(Duration::from_secs(1)).await;
    let stopped_at = Instant::now();
    tx.send(true).unwrap();
    handle.await.unwrap();

    assert!(stopped_at.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_sleeps_between_five_and_ten_seconds() {
    let (memory, tx, handle) = spawn_simulation(Variant::Web, Console::disabled());

    // Batches start at 0, then every [5, 10) seconds: 3 to 5 of them by t=25.
    tokio::time::sleep(Duration::from_secs(25)).await;
    tx.send(true).unwrap();
    let summary = handle.await.unwrap();

    assert!((3..=5).contains(&summary.iterations), "{}", summary.iterations);
    assert!(summary.records >= 50 * summary.iterations);
    assert_eq!(memory.lines().len() as u64, summary.records);
}

#[tokio::test(start_paused = true)]
async fn test_failed_batch_backs_off_and_resumes() {
    let console = Console::with_writer(Box::new(BrokenPipe), false);
    let (memory, tx, handle) = spawn_simulation(Variant::Database, console);

    // Each batch fails on its first echo, then waits the 5 second backoff.
    tokio::time::sleep(Duration::from_secs(12)).await;
    tx.send(true).unwrap();
    let summary = handle.await.unwrap();

    assert!((2..=3).contains(&summary.iterations), "{}", summary.iterations);
    assert_eq!(summary.failed_batches, summary.iterations);
    assert_eq!(summary.records, 0);
    // The record in flight was delivered before the echo failed.
    assert_eq!(memory.lines().len() as u64, summary.iterations);
}
