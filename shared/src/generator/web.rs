//! Web server access-log generator.

use super::{choose, weighted_table, GeneratorError, RecordGenerator, WeightedTable};
use crate::config::WebPools;
use crate::models::{LogRecord, SourceIdentity, Variant, WebRecord};
use chrono::Utc;
use rand::{Rng, RngCore};
use std::net::Ipv4Addr;

/// Generates Apache combined-log-format lines.
#[derive(Debug, Clone)]
pub struct WebGenerator {
    pools: WebPools,
    statuses: WeightedTable<u16>,
}

impl WebGenerator {
    /// Creates a generator from validated pools.
    ///
    /// # Errors
    ///
    /// Returns an error if a pool is empty, a byte size range is inverted, or
    /// the status table is malformed.
    pub fn new(pools: WebPools) -> Result<Self, GeneratorError> {
        pools.validate_pools()?;
        let statuses = weighted_table("web.status_codes", &pools.status_codes)?;
        Ok(Self { pools, statuses })
    }

    /// The status code table.
    #[must_use]
    pub fn statuses(&self) -> &WeightedTable<u16> {
        &self.statuses
    }

    /// The pools this generator draws from.
    #[must_use]
    pub fn pools(&self) -> &WebPools {
        &self.pools
    }

    /// Generates one access-log entry with the given status code.
    pub fn generate_record<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        status: u16,
        source: SourceIdentity,
    ) -> WebRecord {
        let ip = Ipv4Addr::new(
            rng.gen_range(1..=223),
            rng.gen(),
            rng.gen(),
            rng.gen_range(1..=254),
        );

        WebRecord {
            server: format!("Server-{}", source.padded()),
            ip,
            timestamp: Utc::now().format("%d/%b/%Y:%H:%M:%S +0000").to_string(),
            method: choose(rng, &self.pools.methods).to_string(),
            endpoint: choose(rng, &self.pools.endpoints).to_string(),
            http_version: self.pools.http_version.clone(),
            status,
            bytes: self.pools.byte_sizes.sample(rng, status),
            referrer: choose(rng, &self.pools.referrers).to_string(),
            user_agent: choose(rng, &self.pools.user_agents).to_string(),
            source,
        }
    }
}

impl RecordGenerator for WebGenerator {
    fn variant(&self) -> Variant {
        Variant::Web
    }

    fn generate_batch(
        &self,
        rng: &mut dyn RngCore,
        source: SourceIdentity,
        count: usize,
    ) -> Vec<LogRecord> {
        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            let status = *self.statuses.sample(rng);
            records.push(self.generate_record(rng, status, source).into());
        }
        records
    }
}
