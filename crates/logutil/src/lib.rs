//! Utilities for logging.
//!
//! Every line is rendered as `[<timestamp>] <LEVEL> <peer >-> <message>`, both
//! on the console and in the optional log file.

use std::fmt::{self, Write as _};
use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::Path;
use std::sync::Mutex;

use chrono::Local;
use nu_ansi_term::Color;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer, Registry};

pub use tracing;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Field name used for the remote endpoint of a request.
pub const PEER_FIELD: &str = "peer";

/// Field name marking an error event as critical.
pub const CRITICAL_FIELD: &str = "critical";

/// Emit an event at the CRITICAL severity.
///
/// Tracing has no level above ERROR, so critical events are error events
/// carrying `critical = true`.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)+) => {
        $crate::tracing::error!(critical = true, $($arg)+)
    };
}

#[derive(Debug, thiserror::Error)]
pub enum LogInitError {
    #[error("failed to open log file: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Init(#[from] TryInitError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Bracketed timestamp, level, then `peer -> message`.
    #[default]
    Activity,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    fn of(level: &Level, critical: bool) -> Self {
        match *level {
            Level::TRACE | Level::DEBUG => Severity::Debug,
            Level::INFO => Severity::Info,
            Level::WARN => Severity::Warning,
            Level::ERROR if critical => Severity::Critical,
            Level::ERROR => Severity::Error,
        }
    }

    fn color(self) -> Option<Color> {
        match self {
            Severity::Debug | Severity::Info => None,
            Severity::Warning => Some(Color::Yellow),
            Severity::Error | Severity::Critical => Some(Color::Red),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields pulled out of an event for the activity line.
#[derive(Debug, Default)]
struct ActivityFields {
    message: String,
    peer: Option<String>,
    critical: bool,
    extra: Vec<(&'static str, String)>,
}

impl ActivityFields {
    fn render(&self) -> String {
        let mut out = String::new();
        if let Some(peer) = &self.peer {
            out.push_str(peer);
            out.push(' ');
        }
        out.push_str("-> ");
        out.push_str(&self.message);
        for (name, value) in &self.extra {
            // Writing to a String can't fail.
            let _ = write!(out, " {name}={value}");
        }
        out
    }
}

impl Visit for ActivityFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            PEER_FIELD => self.peer = Some(value.to_string()),
            name => self.extra.push((name, value.to_string())),
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            CRITICAL_FIELD => self.critical = value,
            name => self.extra.push((name, value.to_string())),
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            PEER_FIELD => self.peer = Some(format!("{value:?}")),
            name => self.extra.push((name, format!("{value:?}"))),
        }
    }
}

/// Event formatter producing activity lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityFormat;

impl<S, N> FormatEvent<S, N> for ActivityFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = ActivityFields::default();
        event.record(&mut fields);

        let severity = Severity::of(event.metadata().level(), fields.critical);
        let line = format!(
            "[{}] {} {}",
            Local::now().format(TIMESTAMP_FORMAT),
            severity,
            fields.render()
        );

        match severity.color() {
            Some(color) if writer.has_ansi_escapes() => writeln!(writer, "{}", color.paint(line)),
            _ => writeln!(writer, "{line}"),
        }
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Compute the console level from a base level and a `-v` count.
///
/// Each increment lowers the threshold by one level, bottoming out at TRACE.
pub fn level_for_verbosity(base: Level, verbosity: u8) -> Level {
    const ORDER: [Level; 5] = [
        Level::ERROR,
        Level::WARN,
        Level::INFO,
        Level::DEBUG,
        Level::TRACE,
    ];
    let start = ORDER.iter().position(|l| *l == base).unwrap_or(2);
    let idx = (start + verbosity as usize).min(ORDER.len() - 1);
    ORDER[idx]
}

/// Initialize the global logger.
///
/// Console output is filtered at `level` (overridable through `RUST_LOG`). If
/// `log_file` is provided, the file is opened in append mode once, here, and
/// receives every event at DEBUG and above.
pub fn init(level: Level, format: LogFormat, log_file: Option<&Path>) -> Result<(), LogInitError> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let ansi = io::stdout().is_terminal();
    let console: BoxedLayer = match format {
        LogFormat::Activity => tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(ansi)
            .event_format(ActivityFormat)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stdout)
            .with_filter(env_filter)
            .boxed(),
    };

    let mut layers = vec![console];

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let file_layer: BoxedLayer = match format {
            LogFormat::Activity => tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .event_format(ActivityFormat)
                .with_filter(LevelFilter::DEBUG)
                .boxed(),
            LogFormat::Json => tracing_subscriber::fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::DEBUG)
                .boxed(),
        };
        layers.push(file_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tracing::{debug, info, warn};
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn lines(&self) -> Vec<String> {
            let buf = self.0.lock().unwrap();
            String::from_utf8(buf.clone())
                .unwrap()
                .lines()
                .map(|s| s.to_string())
                .collect()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> Vec<String> {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .with_max_level(Level::DEBUG)
            .event_format(ActivityFormat)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        captured.lines()
    }

    #[test]
    fn request_line_with_peer() {
        let lines = capture(|| info!(peer = "127.0.0.1:40000", "SELECT * FROM t"));
        assert_eq!(1, lines.len());
        assert!(lines[0].starts_with('['), "line: {}", lines[0]);
        assert!(
            lines[0].ends_with("] INFO 127.0.0.1:40000 -> SELECT * FROM t"),
            "line: {}",
            lines[0]
        );
    }

    #[test]
    fn line_without_peer() {
        let lines = capture(|| warn!("unknown keyword"));
        assert!(lines[0].ends_with("] WARNING -> unknown keyword"), "line: {}", lines[0]);
    }

    #[test]
    fn critical_events() {
        let lines = capture(|| critical!(peer = "p", "listener died"));
        assert!(lines[0].ends_with("] CRITICAL p -> listener died"), "line: {}", lines[0]);
    }

    #[test]
    fn extra_fields_are_appended() {
        let lines = capture(|| debug!(bytes = 12, "read request"));
        assert!(lines[0].ends_with("] DEBUG -> read request bytes=12"), "line: {}", lines[0]);
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(Level::INFO, level_for_verbosity(Level::INFO, 0));
        assert_eq!(Level::DEBUG, level_for_verbosity(Level::INFO, 1));
        assert_eq!(Level::TRACE, level_for_verbosity(Level::WARN, 7));
    }
}
