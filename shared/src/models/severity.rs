//! Severity levels and console tones.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Log severity level attached to structured records.
///
/// Serialized upper-case (`"INFO"`), the way the simulated fleet emits it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Debug information.
    Debug,
    /// Informational messages.
    Info,
    /// Warning conditions.
    Warn,
    /// Error conditions.
    Error,
}

impl Severity {
    /// Returns the upper-case label used in records and console output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// Console tone for this severity.
    #[must_use]
    pub const fn tone(self) -> Tone {
        match self {
            Self::Debug => Tone::Detail,
            Self::Info => Tone::Success,
            Self::Warn => Tone::Notice,
            Self::Error => Tone::Failure,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Info
    }
}

/// Error returned when parsing an unknown severity label.
#[derive(Debug, Error)]
#[error("Unknown severity: {0}")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// Visual tone used when echoing a record to the console.
///
/// Tones are independent of any terminal library; the simulator maps them to
/// colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    /// Normal, successful activity.
    Success,
    /// Worth a look (warnings, redirects).
    Notice,
    /// Failures (errors, client errors).
    Failure,
    /// Verbose detail (debug output).
    Detail,
    /// Anything outside the known classes (server errors).
    Critical,
}
