//! Loggen CLI
//!
//! Runs one synthetic log fleet, or prints sample records without delivering
//! them.
//!
//! # Usage
//!
//! ```bash
//! loggen --help
//! loggen database --host 127.0.0.1 --port 5001
//! loggen web --sources 10 --log-file ./web-logs.log
//! loggen sample microservice --count 5 --seed 42
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use shared::config::FieldPools;
use shared::generator::build_generator;
use shared::models::{SourceIdentity, Variant};
use shared::rand::rngs::StdRng;
use shared::rand::SeedableRng;
use simulator::SimulatorConfig;
use std::io::{IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Loggen - synthetic log fleet simulator
#[derive(Parser)]
#[command(name = "loggen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Diagnostic log format
    #[arg(
        long,
        global = true,
        env = "LOGGEN_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text
    )]
    log_format: LogFormat,

    /// JSON file overriding the built-in field pools
    #[arg(long, global = true, env = "LOGGEN_POOLS")]
    pools: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate MySQL and PostgreSQL servers
    Database(RunArgs),
    /// Simulate microservices with trace correlation ids
    Microservice(RunArgs),
    /// Simulate web servers writing access logs
    Web(RunArgs),
    /// Print generated records to stdout without delivering them
    Sample(SampleArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Collector host
    #[arg(long, env = "LOGGEN_HOST", default_value = "elk-logstash")]
    host: String,

    /// Collector port [default: 5001 database, 5002 microservice, 5000 web]
    #[arg(long, env = "LOGGEN_PORT")]
    port: Option<u16>,

    /// Local log file [default: /app/logs/{db,micro,web}-logs.log]
    #[arg(long, env = "LOGGEN_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Number of simulated sources [default: 5 database, 10 microservice, 50 web]
    #[arg(long, env = "LOGGEN_SOURCES")]
    sources: Option<u32>,

    /// Minimum records per source per batch
    #[arg(long, env = "LOGGEN_MIN_RECORDS", default_value_t = 1)]
    min_records: usize,

    /// Maximum records per source per batch
    #[arg(long, env = "LOGGEN_MAX_RECORDS", default_value_t = 3)]
    max_records: usize,

    /// Shortest sleep between batches, in seconds
    #[arg(long, env = "LOGGEN_INTERVAL_MIN", default_value_t = 5.0)]
    interval_min: f64,

    /// Longest sleep between batches, in seconds (exclusive)
    #[arg(long, env = "LOGGEN_INTERVAL_MAX", default_value_t = 10.0)]
    interval_max: f64,

    /// Delay after a failed batch, in seconds
    #[arg(long, env = "LOGGEN_BACKOFF", default_value_t = 5.0)]
    backoff: f64,

    /// Collector connect timeout, in seconds
    #[arg(long, env = "LOGGEN_CONNECT_TIMEOUT", default_value_t = 3.0)]
    connect_timeout: f64,

    /// Seed for reproducible runs
    #[arg(long, env = "LOGGEN_SEED")]
    seed: Option<u64>,

    /// Disable colored console output
    #[arg(long)]
    no_color: bool,
}

impl RunArgs {
    fn into_config(self, variant: Variant) -> Result<SimulatorConfig> {
        let defaults = SimulatorConfig::for_variant(variant);
        let config = SimulatorConfig {
            variant,
            host: self.host,
            port: self.port.unwrap_or(defaults.port),
            log_file: self.log_file.unwrap_or(defaults.log_file),
            sources: self.sources.unwrap_or(defaults.sources),
            min_records: self.min_records,
            max_records: self.max_records,
            interval_min: seconds("interval-min", self.interval_min)?,
            interval_max: seconds("interval-max", self.interval_max)?,
            backoff: seconds("backoff", self.backoff)?,
            connect_timeout: seconds("connect-timeout", self.connect_timeout)?,
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Args, Debug)]
struct SampleArgs {
    /// Which fleet to sample (database, microservice, web)
    variant: Variant,

    /// Number of records to print
    #[arg(short = 'n', long, default_value_t = 10)]
    count: u32,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn seconds(name: &str, value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("--{name} must be a non-negative number of seconds, got {value}"))
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_pools(path: Option<&Path>) -> Result<FieldPools> {
    match path {
        Some(path) => FieldPools::from_file(path)
            .with_context(|| format!("Failed to load pools from {}", path.display())),
        None => Ok(FieldPools::default()),
    }
}

/// Writes `args.count` record payloads, cycling through the variant's
/// default fleet.
fn write_samples(out: &mut impl Write, args: &SampleArgs, pools: &FieldPools) -> Result<()> {
    let generator = build_generator(args.variant, pools)?;
    let mut rng = args
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let fleet = args.variant.default_source_count();

    for i in 0..args.count {
        let source = SourceIdentity::new(i % fleet + 1);
        for record in generator.generate_batch(&mut rng, source, 1) {
            writeln!(out, "{}", record.payload()?)?;
        }
    }
    out.flush()?;
    Ok(())
}

async fn run(variant: Variant, args: RunArgs, pools: &FieldPools) -> Result<()> {
    let colored = !args.no_color && std::io::stdout().is_terminal();
    let config = args.into_config(variant)?;

    simulator::run_simulator(config, pools, colored).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let pools = load_pools(cli.pools.as_deref())?;

    match cli.command {
        Commands::Database(args) => run(Variant::Database, args, &pools).await,
        Commands::Microservice(args) => run(Variant::Microservice, args, &pools).await,
        Commands::Web(args) => run(Variant::Web, args, &pools).await,
        Commands::Sample(args) => write_samples(&mut std::io::stdout().lock(), &args, &pools),
    }
}
