//! Structured logging to standard error.
//!
//! Standard output carries the simulator protocol, so every log line goes to standard error,
//! which mms shows in its log pane. Each line starts with a glyph for its level.

use std::{
    fmt,
    io::{self, IsTerminal as _},
};

use color_eyre::eyre::{eyre, Result};
use ratatui::crossterm::style::Stylize as _;
use tracing::{level_filters::LevelFilter, Event, Level, Subscriber};
use tracing_subscriber::{
    fmt::{
        format::{FormatFields, Writer},
        FmtContext, FormatEvent,
    },
    registry::LookupSpan,
    EnvFilter,
};

/// Event formatter printing a level glyph followed by the event's fields.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GlyphFormatter;

impl<S, N> FormatEvent<S, N> for GlyphFormatter
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = *event.metadata().level();
        let symbol = glyph(level);

        if writer.has_ansi_escapes() {
            let styled = match level {
                Level::TRACE => symbol.dim(),
                Level::DEBUG => symbol.blue(),
                Level::INFO => symbol.green().bold(),
                Level::WARN => symbol.yellow().bold(),
                Level::ERROR => symbol.red().bold(),
            };
            write!(writer, "{styled} ")?;
        } else {
            write!(writer, "{symbol} ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

/// Returns the glyph that starts log lines of `level`.
const fn glyph(level: Level) -> &'static str {
    match level {
        Level::TRACE => "[ ]",
        Level::DEBUG => "[?]",
        Level::INFO => "[+]",
        Level::WARN => "[*]",
        Level::ERROR => "[-]",
    }
}

/// Installs the global subscriber, printing events up to `level` unless `RUST_LOG` says otherwise.
///
/// # Errors
///
/// This function may return errors if a global subscriber is already installed.
pub(crate) fn init(level: LevelFilter) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_env_filter(filter)
        .event_format(GlyphFormatter)
        .try_init()
        .map_err(|err| eyre!("failed to install the log subscriber: {err}"))
}

/// Maps the number of `-v` flags onto a level, starting from `base`.
pub(crate) fn verbosity(base: LevelFilter, count: u8) -> LevelFilter {
    match count {
        0 => base,
        1 => base.max(LevelFilter::DEBUG),
        _ => LevelFilter::TRACE,
    }
}
