//! Simulated log sources: variants and fleet identities.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// The kind of fleet being simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// MySQL / PostgreSQL database servers emitting JSON records.
    Database,
    /// Microservice instances emitting JSON records with trace ids.
    Microservice,
    /// Web servers emitting Apache combined log lines.
    Web,
}

impl Variant {
    /// All variants, in declaration order.
    pub const ALL: [Self; 3] = [Self::Database, Self::Microservice, Self::Web];

    /// Returns the lowercase name of the variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Microservice => "microservice",
            Self::Web => "web",
        }
    }

    /// Number of simulated fleet members per batch.
    #[must_use]
    pub const fn default_source_count(self) -> u32 {
        match self {
            Self::Database => 5,
            Self::Microservice => 10,
            Self::Web => 50,
        }
    }

    /// Default collector port for this variant.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Database => 5001,
            Self::Microservice => 5002,
            Self::Web => 5000,
        }
    }

    /// Default append-only log file for this variant.
    #[must_use]
    pub const fn default_log_file(self) -> &'static str {
        match self {
            Self::Database => "/app/logs/db-logs.log",
            Self::Microservice => "/app/logs/micro-logs.log",
            Self::Web => "/app/logs/web-logs.log",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown variant name.
#[derive(Debug, Error)]
#[error("Unknown variant `{0}` (expected database, microservice or web)")]
pub struct ParseVariantError(String);

impl FromStr for Variant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "database" | "db" => Ok(Self::Database),
            "microservice" | "micro" => Ok(Self::Microservice),
            "web" => Ok(Self::Web),
            _ => Err(ParseVariantError(s.to_string())),
        }
    }
}

/// Synthetic identity of one simulated fleet member.
///
/// Ordinals start at 1 and are rendered zero-padded to two digits
/// (`db-07`, `Server-07`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceIdentity {
    ordinal: u32,
}

impl SourceIdentity {
    /// Creates an identity for the given fleet ordinal.
    #[must_use]
    pub const fn new(ordinal: u32) -> Self {
        Self { ordinal }
    }

    /// The fleet ordinal.
    #[must_use]
    pub const fn ordinal(self) -> u32 {
        self.ordinal
    }

    /// The ordinal zero-padded to two digits.
    #[must_use]
    pub fn padded(self) -> String {
        format!("{:02}", self.ordinal)
    }

    /// Iterates over the identities `1..=count`.
    pub fn fleet(count: u32) -> impl Iterator<Item = Self> {
        (1..=count).map(Self::new)
    }
}
