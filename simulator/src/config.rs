//! Simulator configuration module.
//!
//! Holds the sink targets and loop timing for one simulator process, with
//! per-variant defaults.

use shared::models::Variant;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by [`SimulatorConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The collector host is empty.
    #[error("Collector host cannot be empty")]
    EmptyHost,

    /// The fleet has no members.
    #[error("Source count must be greater than zero")]
    NoSources,

    /// The records-per-source range is inverted.
    #[error("Records per source range is invalid: min {min} exceeds max {max}")]
    RecordsRange {
        /// Configured minimum.
        min: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The sleep interval range is empty.
    #[error("Interval range is invalid: min {min:?} must be below max {max:?}")]
    IntervalRange {
        /// Configured minimum.
        min: Duration,
        /// Configured maximum.
        max: Duration,
    },

    /// The connect timeout is zero.
    #[error("Connect timeout must be greater than zero")]
    ZeroConnectTimeout,
}

/// Configuration for one simulator process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// Which fleet to simulate.
    pub variant: Variant,
    /// Collector host name or address.
    pub host: String,
    /// Collector TCP port.
    pub port: u16,
    /// Append-only local log file.
    pub log_file: PathBuf,
    /// Number of simulated fleet members.
    pub sources: u32,
    /// Minimum records per source per batch.
    pub min_records: usize,
    /// Maximum records per source per batch.
    pub max_records: usize,
    /// Lower bound of the sleep between batches (inclusive).
    pub interval_min: Duration,
    /// Upper bound of the sleep between batches (exclusive).
    pub interval_max: Duration,
    /// Fixed delay after a failed batch.
    pub backoff: Duration,
    /// Maximum time to wait for a collector connection.
    pub connect_timeout: Duration,
    /// Seed for reproducible runs; entropy-seeded when `None`.
    pub seed: Option<u64>,
}

impl SimulatorConfig {
    /// Default configuration for `variant`.
    ///
    /// # Example
    ///
    /// ```
    /// use shared::models::Variant;
    /// use simulator::SimulatorConfig;
    ///
    /// let config = SimulatorConfig::for_variant(Variant::Web);
    /// assert_eq!(config.port, 5000);
    /// assert_eq!(config.sources, 50);
    /// assert_eq!(config.collector_addr(), "elk-logstash:5000");
    /// ```
    #[must_use]
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            host: "elk-logstash".to_string(),
            port: variant.default_port(),
            log_file: PathBuf::from(variant.default_log_file()),
            sources: variant.default_source_count(),
            min_records: 1,
            max_records: 3,
            interval_min: Duration::from_secs(5),
            interval_max: Duration::from_secs(10),
            backoff: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(3),
            seed: None,
        }
    }

    /// The collector address as `host:port`.
    #[must_use]
    pub fn collector_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The per-source record count range.
    #[must_use]
    pub fn records_per_source(&self) -> RangeInclusive<usize> {
        self.min_records..=self.max_records
    }

    /// Checks that the configuration can drive a simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The host is empty
    /// - The source count is zero
    /// - `min_records > max_records`
    /// - `interval_min >= interval_max`
    /// - The connect timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.sources == 0 {
            return Err(ConfigError::NoSources);
        }
        if self.min_records > self.max_records {
            return Err(ConfigError::RecordsRange {
                min: self.min_records,
                max: self.max_records,
            });
        }
        if self.interval_min >= self.interval_max {
            return Err(ConfigError::IntervalRange {
                min: self.interval_min,
                max: self.interval_max,
            });
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::ZeroConnectTimeout);
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_defaults() {
        let db = SimulatorConfig::for_variant(Variant::Database);
        assert_eq!(db.port, 5001);
        assert_eq!(db.sources, 5);
        assert_eq!(db.log_file, PathBuf::from("/app/logs/db-logs.log"));

        let micro = SimulatorConfig::for_variant(Variant::Microservice);
        assert_eq!(micro.port, 5002);
        assert_eq!(micro.sources, 10);

        let web = SimulatorConfig::for_variant(Variant::Web);
        assert_eq!(web.port, 5000);
        assert_eq!(web.sources, 50);
    }

    #[test]
    fn test_default_timing() {
        let config = SimulatorConfig::default();
        assert_eq!(config.interval_min, Duration::from_secs(5));
        assert_eq!(config.interval_max, Duration::from_secs(10));
        assert_eq!(config.backoff, Duration::from_secs(5));
        assert_eq!(config.records_per_source(), 1..=3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_collector_addr() {
        let config = SimulatorConfig {
            host: "127.0.0.1".to_string(),
            port: 9000,
            ..SimulatorConfig::default()
        };
        assert_eq!(config.collector_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = SimulatorConfig::default();

        let config = SimulatorConfig {
            host: "  ".to_string(),
            ..base.clone()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyHost));

        let config = SimulatorConfig {
            sources: 0,
            ..base.clone()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoSources));

        let config = SimulatorConfig {
            min_records: 4,
            max_records: 2,
            ..base.clone()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::RecordsRange { min: 4, max: 2 })
        );

        let config = SimulatorConfig {
            interval_min: Duration::from_secs(10),
            interval_max: Duration::from_secs(10),
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::IntervalRange { .. })
        ));

        let config = SimulatorConfig {
            connect_timeout: Duration::ZERO,
            ..base
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroConnectTimeout));
    }
}
