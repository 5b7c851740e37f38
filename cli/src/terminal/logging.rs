use std::fmt::Debug;
use std::io::{self, Write};

use colored::*;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

use crate::terminal::spinner;

/// Target of events that carry finished terminal output rather than diagnostics.
pub const PRINT_TARGET: &str = "portaudit::print";
const RAW_FIELD: &str = "raw_msg";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the quiet level when it is set.
pub fn init_logging(quiet: u8) {
    let default_filter = match quiet {
        0 => format!("warn,{PRINT_TARGET}=info"),
        _ => format!("error,{PRINT_TARGET}=info"),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(TerminalWriter)
        .event_format(AuditFormatter)
        .init();
}

pub struct AuditFormatter;

impl<S, N> FormatEvent<S, N> for AuditFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();

        if meta.target() == PRINT_TARGET {
            let mut raw = RawMessage::default();
            event.record(&mut raw);
            return writeln!(writer, "{}", raw.0.unwrap_or_default());
        }

        let (symbol, color_func): (&str, fn(ColoredString) -> ColoredString) = match *meta.level() {
            Level::TRACE => ("[ ]", |s| s.dimmed()),
            Level::DEBUG => ("[?]", |s| s.blue()),
            Level::INFO => ("[+]", |s| s.green().bold()),
            Level::WARN => ("[*]", |s| s.yellow().bold()),
            Level::ERROR => ("[-]", |s| s.red().bold()),
        };

        write!(writer, "{} ", color_func(symbol.into()))?;

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

#[derive(Default)]
struct RawMessage(Option<String>);

impl Visit for RawMessage {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == RAW_FIELD {
            self.0 = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == RAW_FIELD {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

/// Sends terminal output to stdout and diagnostics to stderr, so `--json`
/// output stays machine-readable.
pub struct TerminalWriter;

impl<'a> MakeWriter<'a> for TerminalWriter {
    type Writer = TerminalSink;

    fn make_writer(&'a self) -> Self::Writer {
        TerminalSink::Stderr
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        if meta.target() == PRINT_TARGET {
            TerminalSink::Stdout
        } else {
            TerminalSink::Stderr
        }
    }
}

pub enum TerminalSink {
    Stdout,
    Stderr,
}

impl Write for TerminalSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        spinner::suspend(|| match self {
            TerminalSink::Stdout => io::stdout().write_all(buf),
            TerminalSink::Stderr => io::stderr().write_all(buf),
        })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            TerminalSink::Stdout => io::stdout().flush(),
            TerminalSink::Stderr => io::stderr().flush(),
        }
    }
}
