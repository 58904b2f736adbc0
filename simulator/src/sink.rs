//! Record sinks.
//!
//! A [`Sink`] writes one newline-terminated payload to a destination. Sinks
//! hold no connections or file handles between writes: every call opens,
//! writes, and closes.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Errors that can occur while writing to a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The collector did not accept the connection in time.
    #[error("Connection to {addr} timed out after {timeout:?}")]
    ConnectTimeout {
        /// Collector address.
        addr: String,
        /// Configured timeout.
        timeout: Duration,
    },

    /// The collector refused or could not be resolved.
    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        /// Collector address.
        addr: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The local file could not be opened for appending.
    #[error("Failed to open {}: {source}", path.display())]
    Open {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the payload failed.
    #[error("Failed to write to {target}: {source}")]
    Write {
        /// Sink destination.
        target: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// A destination for serialized records.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Short name used in logs and delivery reports.
    fn name(&self) -> &str;

    /// Writes `line` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be reached or written.
    async fn write_line(&self, line: &str) -> Result<(), SinkError>;
}

fn terminated(line: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(line.len() + 1);
    bytes.extend_from_slice(line.as_bytes());
    bytes.push(b'\n');
    bytes
}

/// Sends each payload over a fresh TCP connection.
#[derive(Debug, Clone)]
pub struct TcpSink {
    addr: String,
    connect_timeout: Duration,
}

impl TcpSink {
    /// Creates a sink targeting `addr` (`host:port`).
    #[must_use]
    pub fn new(addr: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            connect_timeout,
        }
    }

    /// The collector address.
    #[must_use]
    pub fn addr(&self) -> &str {
        &self.addr
    }
}

#[async_trait]
impl Sink for TcpSink {
    fn name(&self) -> &str {
        "tcp"
    }

    async fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let mut stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&self.addr))
            .await
            .map_err(|_| SinkError::ConnectTimeout {
                addr: self.addr.clone(),
                timeout: self.connect_timeout,
            })?
            .map_err(|source| SinkError::Connect {
                addr: self.addr.clone(),
                source,
            })?;

        let write_err = |source| SinkError::Write {
            target: self.addr.clone(),
            source,
        };
        stream.write_all(&terminated(line)).await.map_err(write_err)?;
        stream.shutdown().await.map_err(write_err)?;

        tracing::trace!(addr = %self.addr, bytes = line.len() + 1, "Sent record");
        Ok(())
    }
}

/// Appends each payload to a local file, reopening it on every write.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    /// Creates a sink appending to `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn write_line(&self, line: &str) -> Result<(), SinkError> {
        let open_err = |source| SinkError::Open {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(open_err)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(open_err)?;

        let write_err = |source| SinkError::Write {
            target: self.path.display().to_string(),
            source,
        };
        file.write_all(&terminated(line)).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        Ok(())
    }
}
