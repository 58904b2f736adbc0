//! Best-effort fan-out of a record payload to every configured sink.

use crate::config::SimulatorConfig;
use crate::sink::{FileSink, Sink, SinkError, TcpSink};

/// The result of writing one payload to one sink.
#[derive(Debug)]
pub struct SinkOutcome {
    /// Name of the sink.
    pub sink: String,
    /// What happened.
    pub result: Result<(), SinkError>,
}

/// Per-sink outcomes for one delivered record.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    outcomes: Vec<SinkOutcome>,
}

impl DeliveryReport {
    /// Names of the sinks that accepted the payload.
    pub fn delivered_to(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| o.sink.as_str())
    }

    /// Sinks that rejected the payload, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &SinkError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.sink.as_str(), e)))
    }

    /// Whether every sink accepted the payload.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    /// All outcomes in sink order.
    #[must_use]
    pub fn outcomes(&self) -> &[SinkOutcome] {
        &self.outcomes
    }
}

/// Writes each payload to every sink independently.
///
/// A failing sink never prevents the others from being tried, and never
/// surfaces as an error to the caller.
pub struct DeliverySink {
    sinks: Vec<Box<dyn Sink>>,
}

impl DeliverySink {
    /// Creates a delivery sink over an explicit set of sinks.
    #[must_use]
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self { sinks }
    }

    /// The collector TCP sink followed by the local file sink.
    #[must_use]
    pub fn from_config(config: &SimulatorConfig) -> Self {
        Self::new(vec![
            Box::new(TcpSink::new(config.collector_addr(), config.connect_timeout)),
            Box::new(FileSink::new(config.log_file.clone())),
        ])
    }

    /// Number of configured sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sinks are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Writes `payload` to every sink in order.
    pub async fn deliver(&self, payload: &str) -> DeliveryReport {
        let mut outcomes = Vec::with_capacity(self.sinks.len());

        for sink in &self.sinks {
            let result = sink.write_line(payload).await;
            if let Err(error) = &result {
                tracing::warn!(sink = sink.name(), %error, "Failed to deliver record");
            }
            outcomes.push(SinkOutcome {
                sink: sink.name().to_string(),
                result,
            });
        }

        DeliveryReport { outcomes }
    }
}

impl std::fmt::Debug for DeliverySink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliverySink")
            .field("sinks", &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>())
            .finish()
    }
}
