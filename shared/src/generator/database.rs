//! Database server record generator.

use super::{choose, iso_timestamp, weighted_table, GeneratorError, RecordGenerator, WeightedTable};
use crate::config::DatabasePools;
use crate::models::{DatabaseRecord, DbEngine, LogRecord, Severity, SourceIdentity, Variant};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

/// Generates MySQL and PostgreSQL server records.
///
/// Each source draws its engine and severity once per batch; all records the
/// source emits in that batch share them.
#[derive(Debug, Clone)]
pub struct DatabaseGenerator {
    pools: DatabasePools,
    levels: WeightedTable<Severity>,
}

impl DatabaseGenerator {
    /// Creates a generator from validated pools.
    ///
    /// # Errors
    ///
    /// Returns an error if a pool is empty, a range is inverted, or the
    /// severity table is malformed.
    pub fn new(pools: DatabasePools) -> Result<Self, GeneratorError> {
        pools.validate_pools()?;
        let levels = weighted_table("database.levels", &pools.levels)?;
        Ok(Self { pools, levels })
    }

    /// The severity table.
    #[must_use]
    pub fn levels(&self) -> &WeightedTable<Severity> {
        &self.levels
    }

    /// The pools this generator draws from.
    #[must_use]
    pub fn pools(&self) -> &DatabasePools {
        &self.pools
    }

    fn queries(&self, engine: DbEngine) -> &[String] {
        match engine {
            DbEngine::Mysql => &self.pools.mysql_queries,
            DbEngine::Postgresql => &self.pools.postgresql_queries,
        }
    }

    /// Generates one record for a given engine and severity.
    ///
    /// `ERROR` and `WARN` records take their message from the matching pool
    /// and carry no query. Any other severity logs a query with its latency;
    /// the duration in the message and in the `duration` field come from the
    /// same draw.
    pub fn generate_record<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        engine: DbEngine,
        level: Severity,
        source: SourceIdentity,
    ) -> DatabaseRecord {
        let timestamp = iso_timestamp();
        let connection_id = self.pools.connection_id.sample(rng);

        let (message, query, duration) = match level {
            Severity::Error => (
                choose(rng, &self.pools.error_messages).to_string(),
                None,
                None,
            ),
            Severity::Warn => (
                choose(rng, &self.pools.warning_messages).to_string(),
                None,
                None,
            ),
            Severity::Info | Severity::Debug => {
                let query = choose(rng, self.queries(engine)).to_string();
                let duration = self.pools.query_duration.sample(rng);
                (
                    format!("Query: {query} | Duration: {duration:.3}s"),
                    Some(query),
                    Some(duration),
                )
            }
        };

        let (thread_id, process_id) = match engine {
            DbEngine::Mysql => (Some(connection_id), None),
            DbEngine::Postgresql => (None, Some(connection_id)),
        };

        DatabaseRecord {
            timestamp,
            db_type: engine,
            thread_id,
            process_id,
            level,
            message,
            query,
            duration,
            db_instance: format!("db-{}", source.padded()),
            server_id: format!("db-server-{}", source.padded()),
            source,
        }
    }
}

impl RecordGenerator for DatabaseGenerator {
    fn variant(&self) -> Variant {
        Variant::Database
    }

    fn generate_batch(
        &self,
        rng: &mut dyn RngCore,
        source: SourceIdentity,
        count: usize,
    ) -> Vec<LogRecord> {
        let engine = DbEngine::ALL
            .choose(rng)
            .copied()
            .unwrap_or(DbEngine::Mysql);
        let level = *self.levels.sample(rng);

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(self.generate_record(rng, engine, level, source).into());
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::Value;

    fn generator() -> DatabaseGenerator {
        DatabaseGenerator::new(DatabasePools::default()).unwrap()
    }

    #[test]
    fn test_forced_mysql_error_record() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(42);

        let record =
            generator.generate_record(&mut rng, DbEngine::Mysql, Severity::Error, SourceIdentity::new(1));
        let value: Value = serde_json::from_str(&LogRecord::from(record.clone()).payload().unwrap())
            .unwrap();

        assert_eq!(value["db_type"], "mysql");
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["query"], Value::Null);
        assert_eq!(value["duration"], Value::Null);
        assert!(generator.pools().error_messages.contains(&record.message));
        assert!(!record.message.is_empty());
    }

    #[test]
    fn test_warn_record_uses_warning_pool() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(3);

        let record = generator.generate_record(
            &mut rng,
            DbEngine::Postgresql,
            Severity::Warn,
            SourceIdentity::new(2),
        );

        assert!(generator.pools().warning_messages.contains(&record.message));
        assert!(record.query.is_none());
        assert!(record.duration.is_none());
    }

    #[test]
    fn test_info_record_carries_query_and_consistent_duration() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let record = generator.generate_record(
                &mut rng,
                DbEngine::Postgresql,
                Severity::Info,
                SourceIdentity::new(4),
            );

            let query = record.query.clone().unwrap();
            let duration = record.duration.unwrap();
            assert!(generator.pools().postgresql_queries.contains(&query));
            assert!((0.001..=2.0).contains(&duration));
            assert_eq!(
                record.message,
                format!("Query: {query} | Duration: {duration:.3}s")
            );
        }
    }

    #[test]
    fn test_engine_specific_connection_ids() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(8);

        let mysql =
            generator.generate_record(&mut rng, DbEngine::Mysql, Severity::Info, SourceIdentity::new(1));
        let thread_id = mysql.thread_id.unwrap();
        assert!((1000..=9999).contains(&thread_id));
        assert!(mysql.process_id.is_none());

        let pg = generator.generate_record(
            &mut rng,
            DbEngine::Postgresql,
            Severity::Info,
            SourceIdentity::new(1),
        );
        assert!(pg.thread_id.is_none());
        assert!(pg.process_id.is_some());
    }

    #[test]
    fn test_source_identity_fields() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(1);

        let record =
            generator.generate_record(&mut rng, DbEngine::Mysql, Severity::Warn, SourceIdentity::new(5));
        assert_eq!(record.db_instance, "db-05");
        assert_eq!(record.server_id, "db-server-05");
    }

    #[test]
    fn test_batch_shares_engine_and_level_across_source_records() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let records = generator.generate_batch(&mut rng, SourceIdentity::new(3), 3);
            let first = match &records[0] {
                LogRecord::Database(r) => (r.db_type, r.level),
                other => panic!("unexpected record {other:?}"),
            };
            for record in &records {
                let LogRecord::Database(r) = record else {
                    panic!("unexpected record {record:?}");
                };
                assert_eq!((r.db_type, r.level), first);
                assert!(generator.levels().labels().any(|l| *l == r.level));
            }
        }
    }

    #[test]
    fn test_error_records_always_have_messages_from_pool() {
        let generator = generator();
        let mut rng = StdRng::seed_from_u64(99);

        let mut errors = 0;
        for ordinal in 1..=500 {
            for record in generator.generate_batch(&mut rng, SourceIdentity::new(ordinal), 2) {
                let LogRecord::Database(r) = record else {
                    panic!("unexpected record variant");
                };
                if r.level == Severity::Error {
                    errors += 1;
                    assert!(generator.pools().error_messages.contains(&r.message));
                }
            }
        }
        assert!(errors > 0);
    }
}
