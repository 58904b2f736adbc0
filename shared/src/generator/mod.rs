//! Record generators.
//!
//! A [`RecordGenerator`] turns field pools and random draws into log records.
//! There is one implementation per [`Variant`]; they share the weighted
//! severity/status selection in [`weighted`] and the helpers in this module.
//! Generators are pure: the only inputs are the RNG passed by the caller and
//! the wall clock used for timestamps.

pub mod database;
pub mod microservice;
pub mod web;
pub mod weighted;

pub use database::DatabaseGenerator;
pub use microservice::MicroserviceGenerator;
pub use web::WebGenerator;
pub use weighted::{WeightedOutcome, WeightedTable, WeightedTableError};

use crate::config::{FieldPools, PoolsError};
use crate::models::{LogRecord, SourceIdentity, Variant};
use chrono::Local;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when building a generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// The field pools failed validation.
    #[error(transparent)]
    Pools(#[from] PoolsError),

    /// A weighted table in the pools is malformed.
    #[error("Invalid weighted table `{table}`: {source}")]
    Table {
        /// Name of the offending table.
        table: &'static str,
        /// Underlying table error.
        #[source]
        source: WeightedTableError,
    },
}

/// Produces log records for one simulated fleet.
///
/// Implementations are object safe so the simulator can hold any variant as
/// `Box<dyn RecordGenerator>`.
pub trait RecordGenerator: Send + Sync {
    /// The variant this generator simulates.
    fn variant(&self) -> Variant;

    /// Generates `count` records emitted by `source` during one batch.
    ///
    /// Variants may draw per-source context once per call (the database
    /// engine and severity, the microservice name) and share it between the
    /// records of the batch.
    fn generate_batch(
        &self,
        rng: &mut dyn RngCore,
        source: SourceIdentity,
        count: usize,
    ) -> Vec<LogRecord>;
}

/// Builds the generator for `variant` from the matching section of `pools`.
///
/// # Errors
///
/// Returns an error if the pools for that variant are invalid.
pub fn build_generator(
    variant: Variant,
    pools: &FieldPools,
) -> Result<Box<dyn RecordGenerator>, GeneratorError> {
    let generator: Box<dyn RecordGenerator> = match variant {
        Variant::Database => Box::new(DatabaseGenerator::new(pools.database.clone())?),
        Variant::Microservice => {
            Box::new(MicroserviceGenerator::new(pools.microservice.clone())?)
        }
        Variant::Web => Box::new(WebGenerator::new(pools.web.clone())?),
    };
    Ok(generator)
}

/// Builds a weighted table from pool outcomes, warning when the probabilities
/// do not add up to 1.0.
fn weighted_table<T: Clone>(
    table: &'static str,
    outcomes: &[WeightedOutcome<T>],
) -> Result<WeightedTable<T>, GeneratorError> {
    let built = WeightedTable::try_from(outcomes)
        .map_err(|source| GeneratorError::Table { table, source })?;

    let total = built.total();
    if (total - 1.0).abs() > 1e-6 {
        tracing::warn!(
            table,
            total,
            "Weighted table does not sum to 1.0, draws past the total fall back to the last entry"
        );
    }

    Ok(built)
}

/// Picks a uniform element of a validated, non-empty pool.
fn choose<'a, R: Rng + ?Sized>(rng: &mut R, pool: &'a [String]) -> &'a str {
    pool.choose(rng).map_or("", String::as_str)
}

/// Local time in ISO-8601 with microseconds.
fn iso_timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// A version-4 UUID drawn from `rng`, so seeded runs are reproducible.
fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}
