use std::fmt;

use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event formatter that wraps each part of the line in brackets.
/// Format: [TIMESTAMP] [LEVEL] [SPAN] [TARGET: FILE:LINE]: MESSAGE
///
/// SPAN is the innermost active span (e.g. `run_mix`), or the last path
/// segment of the target when no span is entered.
pub struct BracketedFormatter;

impl<S, N> FormatEvent<S, N> for BracketedFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let now = chrono::Local::now();
        write!(writer, "[{}] ", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))?;
        write!(writer, "[{:5}] ", metadata.level())?;

        let scope_name = ctx
            .event_scope()
            .and_then(|scope| scope.from_root().last().map(|span| span.name()))
            .unwrap_or_else(|| metadata.target().rsplit("::").next().unwrap_or("unknown"));
        write!(writer, "[{}] ", scope_name)?;

        match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => write!(writer, "[{}: {}:{}]: ", metadata.target(), file, line)?,
            _ => write!(writer, "[{}]: ", metadata.target())?,
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
