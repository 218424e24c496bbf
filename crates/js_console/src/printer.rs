//! Console log levels and the markup policy for printer calls.

use crate::markup::escape_html_entities;

/// Console log level, one per console method that reaches the printer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Assert,
    Count,
    CountReset,
    Debug,
    Dir,
    DirXml,
    Error,
    Group,
    GroupCollapsed,
    Info,
    Log,
    TimeEnd,
    TimeLog,
    Table,
    Trace,
    Warn,
}

impl LogLevel {
    /// Opening tag and marker for the rendered line.
    fn opening_html(&self) -> &'static str {
        match self {
            LogLevel::Debug => "<span class=\"debug\">(d) ",
            LogLevel::Error => "<span class=\"error\">(e) ",
            LogLevel::Info => "<span class=\"info\">(i) ",
            LogLevel::Log => "<span class=\"log\"> ",
            LogLevel::Warn | LogLevel::CountReset => "<span class=\"warn\">(w) ",
            _ => "<span>",
        }
    }

    /// Name of the console method this level belongs to.
    pub fn method_name(&self) -> &'static str {
        match self {
            LogLevel::Assert => "assert",
            LogLevel::Count => "count",
            LogLevel::CountReset => "countReset",
            LogLevel::Debug => "debug",
            LogLevel::Dir => "dir",
            LogLevel::DirXml => "dirxml",
            LogLevel::Error => "error",
            LogLevel::Group => "group",
            LogLevel::GroupCollapsed => "groupCollapsed",
            LogLevel::Info => "info",
            LogLevel::Log => "log",
            LogLevel::TimeEnd => "timeEnd",
            LogLevel::TimeLog => "timeLog",
            LogLevel::Table => "table",
            LogLevel::Trace => "trace",
            LogLevel::Warn => "warn",
        }
    }
}

/// A stack trace captured by `console.trace()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trace {
    pub label: String,
    /// Function names, innermost first.
    pub stack: Vec<String>,
}

/// Label passed to `console.group()` / `console.groupCollapsed()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Group {
    pub label: String,
}

/// Arguments of a printer call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrinterArguments {
    /// Already string-coerced values.
    Values(Vec<String>),
    Trace(Trace),
    Group(Group),
}

impl PrinterArguments {
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PrinterArguments::Values(values.into_iter().map(Into::into).collect())
    }

    /// Plain-text form, used for levels that render a single line.
    pub fn joined(&self) -> String {
        match self {
            PrinterArguments::Values(values) => values.join(" "),
            PrinterArguments::Trace(trace) => trace.label.clone(),
            PrinterArguments::Group(group) => group.label.clone(),
        }
    }
}

/// Render a plain console line with the styling for `level`.
pub fn render_line(level: LogLevel, output: &str) -> String {
    let opening = level.opening_html();
    let escaped = escape_html_entities(output);
    let mut html = String::with_capacity(opening.len() + escaped.len() + 7);
    html.push_str(opening);
    html.push_str(&escaped);
    html.push_str("</span>");
    html
}
