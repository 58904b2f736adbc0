//! Integration tests for record delivery.
//!
//! Tests cover:
//! - Both sinks receiving the same payload
//! - File delivery surviving an unreachable collector
//! - Collector delivery surviving an unwritable file

use serde_json::Value;
use shared::config::FieldPools;
use shared::generator::build_generator;
use shared::models::Variant;
use simulator::{Console, DeliverySink, FileSink, Simulation, SimulatorConfig, TcpSink};
use std::time::Duration;
use tokio::sync::watch;

use super::common::{test_config, unreachable_addr, Collector};

#[tokio::test]
async fn test_payload_reaches_collector_and_file() {
    let collector = Collector::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(Variant::Database, collector.addr(), dir.path());
    let delivery = DeliverySink::from_config(&config);

    let report = delivery.deliver(r#"{"level":"INFO"}"#).await;

    assert!(report.is_complete());
    assert_eq!(report.delivered_to().collect::<Vec<_>>(), vec!["tcp", "file"]);

    let received = collector.wait_for(1).await;
    assert_eq!(received, vec![r#"{"level":"INFO"}"#.to_string()]);

    let file = std::fs::read_to_string(&config.log_file).unwrap();
    assert_eq!(file, "{\"level\":\"INFO\"}\n");
}

#[tokio::test]
async fn test_unreachable_collector_still_writes_file() {
    let addr = unreachable_addr().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(Variant::Web, addr, dir.path());
    let delivery = DeliverySink::from_config(&config);

    let report = delivery.deliver("line one").await;
    delivery.deliver("line two").await;

    assert!(!report.is_complete());
    assert_eq!(report.delivered_to().collect::<Vec<_>>(), vec!["file"]);
    let failures: Vec<_> = report.failures().map(|(name, _)| name).collect();
    assert_eq!(failures, vec!["tcp"]);

    let file = std::fs::read_to_string(&config.log_file).unwrap();
    assert_eq!(file, "line one\nline two\n");
}

#[tokio::test]
async fn test_unwritable_file_still_reaches_collector() {
    let collector = Collector::start().await;
    let dir = tempfile::tempdir().unwrap();
    let delivery = DeliverySink::new(vec![
        Box::new(TcpSink::new(collector.addr().to_string(), Duration::from_secs(1))),
        Box::new(FileSink::new(dir.path())),
    ]);

    let report = delivery.deliver("payload").await;

    assert_eq!(report.delivered_to().collect::<Vec<_>>(), vec!["tcp"]);
    assert_eq!(report.failures().count(), 1);
    assert_eq!(collector.wait_for(1).await, vec!["payload".to_string()]);
}

#[tokio::test]
async fn test_batch_delivers_json_lines_to_collector() {
    let collector = Collector::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(Variant::Microservice, collector.addr(), dir.path());
    let generator = build_generator(Variant::Microservice, &FieldPools::default()).unwrap();
    let delivery = DeliverySink::from_config(&config);
    let mut simulation = Simulation::new(config.clone(), generator, delivery, Console::disabled());
    let (_tx, rx) = watch::channel(false);

    let stats = simulation.run_batch(&rx).await.unwrap();

    assert_eq!(stats.sources, 10);
    assert!((10..=30).contains(&stats.records));
    assert_eq!(stats.fully_delivered, stats.records);
    assert_eq!(stats.sink_failures, 0);

    let received = collector.wait_for(stats.records).await;
    assert_eq!(received.len(), stats.records);
    for line in &received {
        let value: Value = serde_json::from_str(line).unwrap();
        assert!(value["trace_id"].is_string());
        assert!(["INFO", "DEBUG", "WARN", "ERROR"].contains(&value["level"].as_str().unwrap()));
    }

    let file = std::fs::read_to_string(&config.log_file).unwrap();
    assert_eq!(file.lines().count(), stats.records);
}

#[tokio::test]
async fn test_web_lines_are_plain_text() {
    let collector = Collector::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = SimulatorConfig {
        sources: 3,
        ..test_config(Variant::Web, collector.addr(), dir.path())
    };
    let generator = build_generator(Variant::Web, &FieldPools::default()).unwrap();
    let delivery = DeliverySink::from_config(&config);
    let mut simulation = Simulation::new(config, generator, delivery, Console::disabled());
    let (_tx, rx) = watch::channel(false);

    let stats = simulation.run_batch(&rx).await.unwrap();

    let received = collector.wait_for(stats.records).await;
    for line in received {
        assert!(line.starts_with("[Server-0"), "{line}");
        assert!(line.contains(" HTTP/1.1\" "));
        assert!(serde_json::from_str::<Value>(&line).is_err());
    }
}
