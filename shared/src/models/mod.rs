//! Data models for the Loggen simulators.
//!
//! This module contains the record shapes emitted by each simulated fleet,
//! along with severity levels and source identities.

pub mod record;
pub mod severity;
pub mod source;

pub use record::{
    DatabaseRecord, DbEngine, LogRecord, MicroserviceRecord, ServiceError, ServiceMetrics,
    WebRecord,
};
pub use severity::{ParseSeverityError, Severity, Tone};
pub use source::{ParseVariantError, SourceIdentity, Variant};
