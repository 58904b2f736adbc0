//! Field pools feeding the record generators.
//!
//! Every string a generator emits comes from one of these pools. The defaults
//! reproduce a plausible production fleet; a JSON file with the same shape can
//! replace any subset of them (missing sections keep their defaults).

use super::range::{ByteSizePolicy, UniformRange};
use crate::generator::WeightedOutcome;
use crate::models::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::Validate;

/// Errors that can occur while loading or validating field pools.
#[derive(Debug, Error)]
pub enum PoolsError {
    /// The pools file could not be read.
    #[error("Failed to read pools file {}: {source}", path.display())]
    Io {
        /// Path of the pools file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The pools file is not valid JSON for the expected shape.
    #[error("Failed to parse pools file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A pool failed validation (typically an empty list).
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A numeric range has `min > max`.
    #[error("Invalid range `{0}`: min must not exceed max")]
    InvalidRange(&'static str),
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn check_range<T>(name: &'static str, range: &UniformRange<T>) -> Result<(), PoolsError>
where
    T: rand::distributions::uniform::SampleUniform + PartialOrd + Copy,
{
    if range.is_valid() {
        Ok(())
    } else {
        Err(PoolsError::InvalidRange(name))
    }
}

/// Pools for the database simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabasePools {
    /// Severity distribution.
    #[validate(length(min = 1, message = "Severity table cannot be empty"))]
    pub levels: Vec<WeightedOutcome<Severity>>,

    /// Queries logged by MySQL servers.
    #[validate(length(min = 1, message = "MySQL query pool cannot be empty"))]
    pub mysql_queries: Vec<String>,

    /// Queries logged by PostgreSQL servers.
    #[validate(length(min = 1, message = "PostgreSQL query pool cannot be empty"))]
    pub postgresql_queries: Vec<String>,

    /// Messages for `ERROR` records.
    #[validate(length(min = 1, message = "Error message pool cannot be empty"))]
    pub error_messages: Vec<String>,

    /// Messages for `WARN` records.
    #[validate(length(min = 1, message = "Warning message pool cannot be empty"))]
    pub warning_messages: Vec<String>,

    /// Range for thread / process ids.
    pub connection_id: UniformRange<u32>,

    /// Query latency range in seconds.
    pub query_duration: UniformRange<f64>,
}

impl DatabasePools {
    /// Validates list lengths and numeric ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if a pool is empty or a range is inverted.
    pub fn validate_pools(&self) -> Result<(), PoolsError> {
        self.validate()?;
        check_range("database.connection_id", &self.connection_id)?;
        check_range("database.query_duration", &self.query_duration)?;
        Ok(())
    }
}

impl Default for DatabasePools {
    fn default() -> Self {
        Self {
            levels: vec![
                WeightedOutcome::new(Severity::Info, 0.6),
                WeightedOutcome::new(Severity::Warn, 0.25),
                WeightedOutcome::new(Severity::Error, 0.15),
            ],
            mysql_queries: strings(&[
                "SELECT * FROM users WHERE id = ?",
                "INSERT INTO orders (user_id, product_id, quantity) VALUES (?, ?, ?)",
                "UPDATE products SET stock = stock - ? WHERE id = ?",
                "DELETE FROM sessions WHERE expires_at < NOW()",
                "SELECT COUNT(*) FROM orders WHERE created_at > ?",
                "SELECT u.name, o.total FROM users u JOIN orders o ON u.id = o.user_id",
                "CREATE INDEX idx_user_email ON users(email)",
                "ALTER TABLE products ADD COLUMN description TEXT",
                "SHOW PROCESSLIST",
                "EXPLAIN SELECT * FROM users WHERE email = ?",
            ]),
            postgresql_queries: strings(&[
                "SELECT * FROM users WHERE id = $1",
                "INSERT INTO orders (user_id, product_id, quantity) VALUES ($1, $2, $3)",
                "UPDATE products SET stock = stock - $1 WHERE id = $2",
                "DELETE FROM sessions WHERE expires_at < NOW()",
                "SELECT COUNT(*) FROM orders WHERE created_at > $1",
                "SELECT u.name, o.total FROM users u JOIN orders o ON u.id = o.user_id",
                "CREATE INDEX CONCURRENTLY idx_user_email ON users(email)",
                "ALTER TABLE products ADD COLUMN description TEXT",
                "SELECT pg_stat_activity()",
                "EXPLAIN (ANALYZE, BUFFERS) SELECT * FROM users WHERE email = $1",
            ]),
            error_messages: strings(&[
                "Connection timeout",
                "Deadlock found when trying to get lock",
                "Table 'database.table' doesn't exist",
                "Duplicate entry for key 'PRIMARY'",
                "Access denied for user",
                "Too many connections",
                "Lock wait timeout exceeded",
                "Column 'column_name' cannot be null",
                "Foreign key constraint fails",
                "Out of memory",
            ]),
            warning_messages: strings(&[
                "Slow query detected",
                "Table scan on large table",
                "Missing index on column",
                "Connection pool nearly exhausted",
                "High memory usage detected",
                "Long running transaction",
                "Inefficient query pattern",
                "Disk space low",
                "Replication lag detected",
                "Cache hit ratio low",
            ]),
            connection_id: UniformRange::new(1000, 9999),
            query_duration: UniformRange::new(0.001, 2.0),
        }
    }
}

/// Pools for the microservice simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MicroservicePools {
    /// Severity distribution.
    #[validate(length(min = 1, message = "Severity table cannot be empty"))]
    pub levels: Vec<WeightedOutcome<Severity>>,

    /// Service names; one is drawn per instance and batch.
    #[validate(length(min = 1, message = "Service pool cannot be empty"))]
    pub services: Vec<String>,

    /// HTTP endpoints per service. Services without an entry log a `null`
    /// endpoint.
    pub endpoints: BTreeMap<String, Vec<String>>,

    /// Messages for `ERROR` records.
    #[validate(length(min = 1, message = "Error message pool cannot be empty"))]
    pub error_messages: Vec<String>,

    /// Messages for `WARN` records.
    #[validate(length(min = 1, message = "Warning message pool cannot be empty"))]
    pub warning_messages: Vec<String>,

    /// Messages for `INFO` records.
    #[validate(length(min = 1, message = "Info message pool cannot be empty"))]
    pub info_messages: Vec<String>,

    /// Deployment environment label.
    #[validate(length(min = 1, message = "Environment cannot be empty"))]
    pub environment: String,

    /// Error class reported in the `error` object.
    pub error_kind: String,

    /// Request latency range in seconds.
    pub duration: UniformRange<f64>,

    /// CPU usage percentage range.
    pub cpu_usage: UniformRange<f64>,

    /// Memory usage percentage range.
    pub memory_usage: UniformRange<f64>,

    /// Request throughput range.
    pub requests_per_second: UniformRange<f64>,

    /// Range for the minor and patch components of `1.X.Y`.
    pub version_component: UniformRange<u32>,
}

impl MicroservicePools {
    /// Validates list lengths and numeric ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if a pool is empty or a range is inverted.
    pub fn validate_pools(&self) -> Result<(), PoolsError> {
        self.validate()?;
        check_range("microservice.duration", &self.duration)?;
        check_range("microservice.cpu_usage", &self.cpu_usage)?;
        check_range("microservice.memory_usage", &self.memory_usage)?;
        check_range(
            "microservice.requests_per_second",
            &self.requests_per_second,
        )?;
        check_range("microservice.version_component", &self.version_component)?;
        Ok(())
    }
}

impl Default for MicroservicePools {
    fn default() -> Self {
        let endpoints = [
            (
                "user-service",
                &["/users", "/users/{id}", "/users/{id}/profile", "/users/search"][..],
            ),
            (
                "auth-service",
                &["/auth/login", "/auth/logout", "/auth/refresh", "/auth/validate"][..],
            ),
            (
                "payment-service",
                &["/payments", "/payments/{id}", "/payments/process", "/payments/refund"][..],
            ),
            (
                "order-service",
                &["/orders", "/orders/{id}", "/orders/{id}/status", "/orders/history"][..],
            ),
            (
                "inventory-service",
                &["/products", "/products/{id}", "/products/search", "/products/stock"][..],
            ),
            (
                "notification-service",
                &["/notifications", "/notifications/send", "/notifications/templates"][..],
            ),
            (
                "analytics-service",
                &["/analytics/events", "/analytics/metrics", "/analytics/reports"][..],
            ),
            (
                "gateway-service",
                &["/gateway/routes", "/gateway/health", "/gateway/metrics"][..],
            ),
            (
                "config-service",
                &["/config", "/config/{service}", "/config/reload"][..],
            ),
            (
                "monitoring-service",
                &["/health", "/metrics", "/alerts", "/dashboards"][..],
            ),
        ]
        .into_iter()
        .map(|(service, paths)| (service.to_string(), strings(paths)))
        .collect();

        Self {
            levels: vec![
                WeightedOutcome::new(Severity::Info, 0.5),
                WeightedOutcome::new(Severity::Debug, 0.25),
                WeightedOutcome::new(Severity::Warn, 0.15),
                WeightedOutcome::new(Severity::Error, 0.1),
            ],
            services: strings(&[
                "user-service",
                "auth-service",
                "payment-service",
                "order-service",
                "inventory-service",
                "notification-service",
                "analytics-service",
                "gateway-service",
                "config-service",
                "monitoring-service",
            ]),
            endpoints,
            error_messages: strings(&[
                "Database connection failed",
                "External service timeout",
                "Invalid request payload",
                "Authentication failed",
                "Rate limit exceeded",
                "Service unavailable",
                "Configuration error",
                "Memory allocation failed",
                "Network timeout",
                "Validation error",
            ]),
            warning_messages: strings(&[
                "High response time detected",
                "Cache miss rate high",
                "Deprecated API usage",
                "Resource usage high",
                "Slow database query",
                "External service slow",
                "Memory usage approaching limit",
                "Connection pool nearly exhausted",
                "Retry attempt failed",
                "Circuit breaker open",
            ]),
            info_messages: strings(&[
                "Request processed successfully",
                "User authenticated",
                "Payment processed",
                "Order created",
                "Product updated",
                "Notification sent",
                "Analytics event recorded",
                "Configuration updated",
                "Health check passed",
                "Metrics collected",
            ]),
            environment: "production".to_string(),
            error_kind: "ServiceError".to_string(),
            duration: UniformRange::new(0.001, 5.0),
            cpu_usage: UniformRange::new(10.0, 90.0),
            memory_usage: UniformRange::new(20.0, 80.0),
            requests_per_second: UniformRange::new(10.0, 1000.0),
            version_component: UniformRange::new(0, 9),
        }
    }
}

/// Pools for the web server simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct WebPools {
    /// HTTP methods.
    #[validate(length(min = 1, message = "Method pool cannot be empty"))]
    pub methods: Vec<String>,

    /// Requested paths.
    #[validate(length(min = 1, message = "Endpoint pool cannot be empty"))]
    pub endpoints: Vec<String>,

    /// Status code distribution.
    #[validate(length(min = 1, message = "Status table cannot be empty"))]
    pub status_codes: Vec<WeightedOutcome<u16>>,

    /// User agent strings.
    #[validate(length(min = 1, message = "User agent pool cannot be empty"))]
    pub user_agents: Vec<String>,

    /// Referrer values (`-` for none).
    #[validate(length(min = 1, message = "Referrer pool cannot be empty"))]
    pub referrers: Vec<String>,

    /// HTTP protocol version written in the request line.
    pub http_version: String,

    /// Response size ranges per status class.
    pub byte_sizes: ByteSizePolicy,
}

impl WebPools {
    /// Validates list lengths and numeric ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if a pool is empty or a range is inverted.
    pub fn validate_pools(&self) -> Result<(), PoolsError> {
        self.validate()?;
        check_range("web.byte_sizes.error", &self.byte_sizes.error)?;
        check_range("web.byte_sizes.redirect", &self.byte_sizes.redirect)?;
        check_range("web.byte_sizes.success", &self.byte_sizes.success)?;
        Ok(())
    }
}

impl Default for WebPools {
    fn default() -> Self {
        Self {
            methods: strings(&["GET", "POST", "PUT", "DELETE", "HEAD", "OPTIONS"]),
            endpoints: strings(&[
                "/",
                "/index.html",
                "/about",
                "/contact",
                "/products",
                "/services",
                "/api/users",
                "/api/products",
                "/api/orders",
                "/api/auth/login",
                "/api/auth/logout",
                "/admin",
                "/dashboard",
                "/profile",
                "/settings",
                "/search",
                "/cart",
                "/checkout",
                "/payment",
                "/confirmation",
            ]),
            status_codes: vec![
                WeightedOutcome::new(200, 0.7),
                WeightedOutcome::new(201, 0.05),
                WeightedOutcome::new(301, 0.03),
                WeightedOutcome::new(302, 0.02),
                WeightedOutcome::new(400, 0.05),
                WeightedOutcome::new(401, 0.03),
                WeightedOutcome::new(403, 0.02),
                WeightedOutcome::new(404, 0.08),
                WeightedOutcome::new(500, 0.015),
                WeightedOutcome::new(502, 0.005),
                WeightedOutcome::new(503, 0.005),
            ],
            user_agents: strings(&[
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:89.0) Gecko/20100101 Firefox/89.0",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.1 Safari/605.1.15",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Edge/91.0.864.59",
            ]),
            referrers: strings(&[
                "-",
                "https://www.google.com/",
                "https://www.bing.com/",
                "https://www.yahoo.com/",
                "https://www.facebook.com/",
                "https://www.twitter.com/",
                "https://www.linkedin.com/",
                "https://github.com/",
                "https://stackoverflow.com/",
            ]),
            http_version: "1.1".to_string(),
            byte_sizes: ByteSizePolicy::default(),
        }
    }
}

/// Field pools for all three simulators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldPools {
    /// Database simulator pools.
    pub database: DatabasePools,
    /// Microservice simulator pools.
    pub microservice: MicroservicePools,
    /// Web server simulator pools.
    pub web: WebPools,
}

impl FieldPools {
    /// Parses pools from a JSON document. Missing sections and fields fall
    /// back to the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> Result<Self, PoolsError> {
        let pools: Self = serde_json::from_str(json)?;
        pools.validate_pools()?;
        Ok(pools)
    }

    /// Loads pools from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PoolsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PoolsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded field pools file");
        Self::from_json(&json)
    }

    /// Validates all three sections.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure encountered.
    pub fn validate_pools(&self) -> Result<(), PoolsError> {
        self.database.validate_pools()?;
        self.microservice.validate_pools()?;
        self.web.validate_pools()?;
        Ok(())
    }
}
