//! Common test utilities and helpers for integration tests.
//!
//! This module provides a loopback collector, an in-memory sink, and
//! configuration helpers shared across the integration tests.

use async_trait::async_trait;
use shared::models::Variant;
use simulator::{Sink, SinkError, SimulatorConfig};
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;

/// A loopback TCP server that records every line it receives.
pub struct Collector {
    addr: SocketAddr,
    lines: Arc<Mutex<Vec<String>>>,
}

impl Collector {
    /// Binds to an ephemeral port and starts accepting connections.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let lines = Arc::new(Mutex::new(Vec::new()));

        let received = Arc::clone(&lines);
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let received = Arc::clone(&received);
                tokio::spawn(async move {
                    let mut buf = String::new();
                    if stream.read_to_string(&mut buf).await.is_ok() {
                        let mut lines = received.lock().unwrap();
                        lines.extend(buf.lines().map(str::to_string));
                    }
                });
            }
        });

        Self { addr, lines }
    }

    /// The address to point a simulator at.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Waits until at least `count` lines have arrived, or panics after a
    /// few seconds.
    pub async fn wait_for(&self, count: usize) -> Vec<String> {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        loop {
            let lines = self.lines.lock().unwrap().clone();
            if lines.len() >= count {
                return lines;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "collector received {} of {count} lines",
                lines.len()
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Returns a loopback address with nothing listening on it.
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A sink that keeps every line in memory.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    /// Lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sink for MemorySink {
    fn name(&self) -> &str {
        "memory"
    }

    async fn write_line(&self, line: &str) -> Result<(), SinkError> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

/// A console writer whose every write fails, like a closed pipe.
pub struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Simulator configuration pointed at `addr` and a file under `dir`.
pub fn test_config(variant: Variant, addr: SocketAddr, dir: &Path) -> SimulatorConfig {
    SimulatorConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        log_file: dir.join("logs").join(format!("{variant}-logs.log")),
        connect_timeout: Duration::from_secs(1),
        seed: Some(42),
        ..SimulatorConfig::for_variant(variant)
    }
}
