//! Microservice record generator.

use super::{
    choose, iso_timestamp, random_uuid, weighted_table, GeneratorError, RecordGenerator,
    WeightedTable,
};
use crate::config::MicroservicePools;
use crate::models::{
    LogRecord, MicroserviceRecord, ServiceError, ServiceMetrics, Severity, SourceIdentity,
    Variant,
};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Generates structured microservice records with trace correlation ids.
#[derive(Debug, Clone)]
pub struct MicroserviceGenerator {
    pools: MicroservicePools,
    levels: WeightedTable<Severity>,
}

impl MicroserviceGenerator {
    /// Creates a generator from validated pools.
    ///
    /// # Errors
    ///
    /// Returns an error if a pool is empty, a range is inverted, or the
    /// severity table is malformed.
    pub fn new(pools: MicroservicePools) -> Result<Self, GeneratorError> {
        pools.validate_pools()?;
        let levels = weighted_table("microservice.levels", &pools.levels)?;
        Ok(Self { pools, levels })
    }

    /// The severity table.
    #[must_use]
    pub fn levels(&self) -> &WeightedTable<Severity> {
        &self.levels
    }

    /// The pools this generator draws from.
    #[must_use]
    pub fn pools(&self) -> &MicroservicePools {
        &self.pools
    }

    /// Generates one record for `service` at the given severity.
    pub fn generate_record<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        service: &str,
        level: Severity,
        source: SourceIdentity,
    ) -> MicroserviceRecord {
        let timestamp = iso_timestamp();
        let trace_id = random_uuid(rng);
        let mut span_id = random_uuid(rng).simple().to_string();
        span_id.truncate(8);

        let message = match level {
            Severity::Error => choose(rng, &self.pools.error_messages).to_string(),
            Severity::Warn => choose(rng, &self.pools.warning_messages).to_string(),
            Severity::Debug => format!("Debug info for {service}"),
            Severity::Info => choose(rng, &self.pools.info_messages).to_string(),
        };

        let error = (level == Severity::Error).then(|| ServiceError {
            kind: self.pools.error_kind.clone(),
            message: message.clone(),
            stack_trace: format!("Error in {service} at {timestamp}"),
        });

        let endpoint = self
            .pools
            .endpoints
            .get(service)
            .and_then(|paths| paths.choose(&mut *rng))
            .cloned();

        let duration = self.pools.duration.sample(rng);
        let metrics = ServiceMetrics {
            cpu_usage: self.pools.cpu_usage.sample(rng),
            memory_usage: self.pools.memory_usage.sample(rng),
            response_time: duration,
            requests_per_second: self.pools.requests_per_second.sample(rng),
        };

        let version = format!(
            "1.{}.{}",
            self.pools.version_component.sample(rng),
            self.pools.version_component.sample(rng)
        );

        MicroserviceRecord {
            timestamp,
            level,
            service: service.to_string(),
            message,
            trace_id,
            span_id,
            endpoint,
            duration,
            metrics,
            environment: self.pools.environment.clone(),
            version,
            error,
            instance_id: format!("{service}-{}", source.padded()),
            pod_name: format!("{service}-pod-{}", source.padded()),
            source,
        }
    }
}

impl RecordGenerator for MicroserviceGenerator {
    fn variant(&self) -> Variant {
        Variant::Microservice
    }

    fn generate_batch(
        &self,
        rng: &mut dyn RngCore,
        source: SourceIdentity,
        count: usize,
    ) -> Vec<LogRecord> {
        let service = choose(rng, &self.pools.services).to_string();

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            let level = *self.levels.sample(rng);
            records.push(self.generate_record(rng, &service, level, source).into());
        }
        records
    }
}
