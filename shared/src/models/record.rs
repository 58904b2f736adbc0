//! Log record data models.
//!
//! Each simulated variant produces its own record shape. [`LogRecord`] wraps
//! them so that delivery and console rendering can treat every record alike:
//! database and microservice records serialize to a single-line JSON object,
//! web records to an Apache combined log line.

use super::{Severity, SourceIdentity, Tone, Variant};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::net::Ipv4Addr;
use uuid::Uuid;

/// Database engine flavor of a simulated database server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbEngine {
    /// MySQL, identified by thread ids.
    Mysql,
    /// PostgreSQL, identified by process ids.
    Postgresql,
}

impl DbEngine {
    /// All engines, in declaration order.
    pub const ALL: [Self; 2] = [Self::Mysql, Self::Postgresql];

    /// Returns the lowercase engine name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Postgresql => "postgresql",
        }
    }
}

impl std::fmt::Display for DbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record emitted by a simulated database server.
///
/// `query` and `duration` are only populated for `INFO` records and serialize
/// as `null` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseRecord {
    /// ISO-8601 local timestamp.
    pub timestamp: String,
    /// Engine flavor.
    pub db_type: DbEngine,
    /// MySQL connection thread id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<u32>,
    /// PostgreSQL backend process id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_id: Option<u32>,
    /// Severity level.
    pub level: Severity,
    /// Log message.
    pub message: String,
    /// Executed query, for `INFO` records.
    pub query: Option<String>,
    /// Query duration in seconds, for `INFO` records.
    pub duration: Option<f64>,
    /// Database instance label (`db-07`).
    pub db_instance: String,
    /// Server label (`db-server-07`).
    pub server_id: String,
    /// Emitting fleet member.
    #[serde(skip)]
    pub source: SourceIdentity,
}

/// Resource metrics attached to every microservice record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceMetrics {
    /// CPU usage percentage.
    pub cpu_usage: f64,
    /// Memory usage percentage.
    pub memory_usage: f64,
    /// Response time in seconds (equal to the record duration).
    pub response_time: f64,
    /// Request throughput.
    pub requests_per_second: f64,
}

/// Error details attached to `ERROR` microservice records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceError {
    /// Error class name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Error message, identical to the record message.
    pub message: String,
    /// Synthetic stack trace.
    pub stack_trace: String,
}

/// A record emitted by a simulated microservice instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MicroserviceRecord {
    /// ISO-8601 local timestamp.
    pub timestamp: String,
    /// Severity level.
    pub level: Severity,
    /// Service name.
    pub service: String,
    /// Log message.
    pub message: String,
    /// Distributed trace id.
    pub trace_id: Uuid,
    /// Span id (eight hex characters).
    pub span_id: String,
    /// HTTP endpoint, when the service exposes any.
    pub endpoint: Option<String>,
    /// Request duration in seconds.
    pub duration: f64,
    /// Resource metrics snapshot.
    pub metrics: ServiceMetrics,
    /// Deployment environment.
    pub environment: String,
    /// Service version (`1.X.Y`).
    pub version: String,
    /// Error details, for `ERROR` records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ServiceError>,
    /// Instance label (`payment-service-07`).
    pub instance_id: String,
    /// Pod label (`payment-service-pod-07`).
    pub pod_name: String,
    /// Emitting fleet member.
    #[serde(skip)]
    pub source: SourceIdentity,
}

/// An access-log entry emitted by a simulated web server.
///
/// Rendered with [`std::fmt::Display`] as a combined log line prefixed by the
/// server label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebRecord {
    /// Server label (`Server-07`).
    pub server: String,
    /// Client address.
    pub ip: Ipv4Addr,
    /// Apache-style timestamp (`19/Oct/2026:10:30:00 +0000`).
    pub timestamp: String,
    /// HTTP method.
    pub method: String,
    /// Requested path.
    pub endpoint: String,
    /// HTTP protocol version.
    pub http_version: String,
    /// Response status code.
    pub status: u16,
    /// Response size in bytes.
    pub bytes: u32,
    /// Referrer header, `-` when absent.
    pub referrer: String,
    /// User agent header.
    pub user_agent: String,
    /// Emitting fleet member.
    #[serde(skip)]
    pub source: SourceIdentity,
}

impl WebRecord {
    /// Console tone derived from the status class.
    #[must_use]
    pub const fn tone(&self) -> Tone {
        match self.status / 100 {
            2 => Tone::Success,
            3 => Tone::Notice,
            4 => Tone::Failure,
            _ => Tone::Critical,
        }
    }
}

impl std::fmt::Display for WebRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} - - [{}] \"{} {} HTTP/{}\" {} {} \"{}\" \"{}\"",
            self.server,
            self.ip,
            self.timestamp,
            self.method,
            self.endpoint,
            self.http_version,
            self.status,
            self.bytes,
            self.referrer,
            self.user_agent,
        )
    }
}

/// A generated record of any variant.
#[derive(Debug, Clone, PartialEq)]
pub enum LogRecord {
    /// Database server record.
    Database(DatabaseRecord),
    /// Microservice record.
    Microservice(MicroserviceRecord),
    /// Web server access-log entry.
    Web(WebRecord),
}

impl LogRecord {
    /// The variant that produced this record.
    #[must_use]
    pub const fn variant(&self) -> Variant {
        match self {
            Self::Database(_) => Variant::Database,
            Self::Microservice(_) => Variant::Microservice,
            Self::Web(_) => Variant::Web,
        }
    }

    /// The fleet member that emitted this record.
    #[must_use]
    pub const fn source(&self) -> SourceIdentity {
        match self {
            Self::Database(r) => r.source,
            Self::Microservice(r) => r.source,
            Self::Web(r) => r.source,
        }
    }

    /// Severity level; web records carry a status code instead.
    #[must_use]
    pub const fn severity(&self) -> Option<Severity> {
        match self {
            Self::Database(r) => Some(r.level),
            Self::Microservice(r) => Some(r.level),
            Self::Web(_) => None,
        }
    }

    /// Console tone for this record.
    #[must_use]
    pub const fn tone(&self) -> Tone {
        match self {
            Self::Database(r) => r.level.tone(),
            Self::Microservice(r) => r.level.tone(),
            Self::Web(r) => r.tone(),
        }
    }

    /// Human-oriented label of the emitter (`MYSQL-07`, `USER-SERVICE-07`,
    /// `Server-07`).
    #[must_use]
    pub fn console_label(&self) -> String {
        match self {
            Self::Database(r) => format!(
                "{}-{}",
                r.db_type.as_str().to_ascii_uppercase(),
                r.source.padded()
            ),
            Self::Microservice(r) => {
                format!("{}-{}", r.service.to_ascii_uppercase(), r.source.padded())
            }
            Self::Web(r) => r.server.clone(),
        }
    }

    /// The text that best summarizes the record: its message, or the whole
    /// access-log line for web records.
    #[must_use]
    pub fn headline(&self) -> Cow<'_, str> {
        match self {
            Self::Database(r) => Cow::Borrowed(&r.message),
            Self::Microservice(r) => Cow::Borrowed(&r.message),
            Self::Web(r) => Cow::Owned(r.to_string()),
        }
    }

    /// Serializes the record to the single-line wire payload, without the
    /// trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn payload(&self) -> Result<String, serde_json::Error> {
        match self {
            Self::Database(r) => serde_json::to_string(r),
            Self::Microservice(r) => serde_json::to_string(r),
            Self::Web(r) => Ok(r.to_string()),
        }
    }
}

impl From<DatabaseRecord> for LogRecord {
    fn from(record: DatabaseRecord) -> Self {
        Self::Database(record)
    }
}

impl From<MicroserviceRecord> for LogRecord {
    fn from(record: MicroserviceRecord) -> Self {
        Self::Microservice(record)
    }
}

impl From<WebRecord> for LogRecord {
    fn from(record: WebRecord) -> Self {
        Self::Web(record)
    }
}
