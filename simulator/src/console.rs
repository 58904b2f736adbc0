//! Colorized one-line-per-record console echo.

use chrono::{DateTime, Local};
use crossterm::style::{Color, Stylize};
use shared::models::{LogRecord, Tone, Variant};
use std::io::{self, Write};

/// Maximum characters of the headline shown before truncation.
#[must_use]
pub const fn preview_width(variant: Variant) -> usize {
    match variant {
        Variant::Database => 80,
        Variant::Microservice => 60,
        Variant::Web => 100,
    }
}

/// Terminal color for a tone.
#[must_use]
pub const fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Success => Color::Green,
        Tone::Notice => Color::Yellow,
        Tone::Failure => Color::Red,
        Tone::Detail => Color::Blue,
        Tone::Critical => Color::Magenta,
    }
}

/// Builds the uncolored summary line for `record` at `now`.
///
/// ```
/// use chrono::{Local, TimeZone};
/// use shared::config::WebPools;
/// use shared::generator::{RecordGenerator, WebGenerator};
/// use shared::models::SourceIdentity;
/// use shared::rand::{rngs::StdRng, SeedableRng};
/// use simulator::console::summary_line;
///
/// let generator = WebGenerator::new(WebPools::default()).unwrap();
/// let mut rng = StdRng::seed_from_u64(1);
/// let record = generator.generate_batch(&mut rng, SourceIdentity::new(4), 1).remove(0);
/// let now = Local.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap();
///
/// let line = summary_line(&record, now);
/// assert!(line.starts_with("[09:30:00] Server-04 - [Server-04] "));
/// assert!(line.ends_with("..."));
/// ```
#[must_use]
pub fn summary_line(record: &LogRecord, now: DateTime<Local>) -> String {
    let headline = record.headline();
    let preview: String = headline
        .chars()
        .take(preview_width(record.variant()))
        .collect();
    let clock = now.format("%H:%M:%S");

    match record.severity() {
        Some(level) => format!(
            "[{clock}] {} [{level}] {preview}...",
            record.console_label()
        ),
        None => format!("[{clock}] {} - {preview}...", record.console_label()),
    }
}

/// Echoes records to a writer, optionally colored by tone.
pub struct Console {
    out: Box<dyn Write + Send>,
    colored: bool,
    enabled: bool,
}

impl Console {
    /// Console on standard output.
    #[must_use]
    pub fn stdout(colored: bool) -> Self {
        Self::with_writer(Box::new(io::stdout()), colored)
    }

    /// Console on an arbitrary writer.
    #[must_use]
    pub fn with_writer(out: Box<dyn Write + Send>, colored: bool) -> Self {
        Self {
            out,
            colored,
            enabled: true,
        }
    }

    /// Console that prints nothing.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            out: Box::new(io::sink()),
            colored: false,
            enabled: false,
        }
    }

    /// Whether output is enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Prints the summary line for `record`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the underlying writer fails, e.g. a
    /// closed pipe.
    pub fn echo(&mut self, record: &LogRecord) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let line = summary_line(record, Local::now());
        if self.colored {
            writeln!(self.out, "{}", line.with(tone_color(record.tone())))?;
        } else {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("colored", &self.colored)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
