//! Loggen Shared Library
//!
//! This crate contains the record models, field pools, and record generators
//! used by the Loggen fleet simulators. Nothing in here performs I/O: the
//! simulator crate owns delivery and scheduling.
//!
//! # Modules
//!
//! - [`models`] - Record shapes, severity levels, and source identities
//! - [`config`] - Field pools and the numeric ranges sampled from them
//! - [`generator`] - Weighted choice and the per-variant record generators
//!
//! # Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use shared::config::DatabasePools;
//! use shared::generator::DatabaseGenerator;
//! use shared::models::{DbEngine, Severity, SourceIdentity};
//!
//! let generator = DatabaseGenerator::new(DatabasePools::default()).unwrap();
//! let mut rng = StdRng::seed_from_u64(42);
//!
//! let record = generator.generate_record(
//!     &mut rng,
//!     DbEngine::Mysql,
//!     Severity::Error,
//!     SourceIdentity::new(1),
//! );
//!
//! assert_eq!(record.db_instance, "db-01");
//! assert!(record.query.is_none());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod generator;
pub mod models;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use rand;
pub use serde;
pub use serde_json;
