//! Shared console output: the message log plus its observer notifications.

use crate::config::ConsoleConfig;
use crate::markup;
use crate::message::{ConsoleMessage, MessageKind, MessageLog};
use crate::printer::{render_line, LogLevel, PrinterArguments};
use crate::protocol::NON_EXISTENT_INDEX;
use crate::transport::ConsoleTransport;
use parking_lot::RwLock;
use std::sync::Arc;

/// Handle to the console's message log.
///
/// Cloning is cheap and every clone appends to the same log. Native console
/// functions hold a clone so they can print while an evaluation is running.
#[derive(Clone)]
pub struct ConsoleOutput {
    inner: Arc<OutputInner>,
}

struct OutputInner {
    log: RwLock<MessageLog>,
    transport: Arc<dyn ConsoleTransport>,
    config: ConsoleConfig,
}

impl ConsoleOutput {
    pub fn new(transport: Arc<dyn ConsoleTransport>, config: ConsoleConfig) -> Self {
        Self {
            inner: Arc::new(OutputInner {
                log: RwLock::new(MessageLog::new()),
                transport,
                config,
            }),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    /// Number of messages logged so far.
    pub fn len(&self) -> usize {
        self.inner.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.log.read().is_empty()
    }

    /// Copy of the message at `index`.
    pub fn message(&self, index: usize) -> crate::ConsoleResult<ConsoleMessage> {
        self.inner.log.read().get(index).cloned()
    }

    /// Append a message and notify the observer of its index.
    fn append(&self, kind: MessageKind, payload: impl Into<String>) -> usize {
        let index = self.inner.log.write().append(kind, payload);
        tracing::debug!("Console message {} ({})", index, kind.wire_tag());
        self.inner.transport.did_output_message(index);
        index
    }

    pub fn print_html(&self, html: impl Into<String>) -> usize {
        self.append(MessageKind::Html, html)
    }

    pub fn clear_output(&self) -> usize {
        self.append(MessageKind::Clear, "")
    }

    pub fn begin_group(&self, label: impl Into<String>, start_expanded: bool) -> usize {
        let kind = if start_expanded {
            MessageKind::BeginGroup
        } else {
            MessageKind::BeginGroupCollapsed
        };
        self.append(kind, label)
    }

    pub fn end_group(&self) -> usize {
        self.append(MessageKind::EndGroup, "")
    }

    /// Render one console API call and append it. Returns the new index.
    pub fn printer(&self, level: LogLevel, arguments: PrinterArguments) -> usize {
        match (level, arguments) {
            (LogLevel::Trace, PrinterArguments::Trace(trace)) => {
                self.print_html(markup::trace_html(&trace.label, &trace.stack))
            }
            (LogLevel::Group | LogLevel::GroupCollapsed, PrinterArguments::Group(group)) => {
                self.begin_group(group.label, level == LogLevel::Group)
            }
            (LogLevel::Group | LogLevel::GroupCollapsed, arguments) => {
                self.begin_group(arguments.joined(), level == LogLevel::Group)
            }
            (_, arguments) => {
                let output = arguments.joined();
                if self.inner.config.echo_to_log {
                    echo_to_log(level, &output);
                }
                self.print_html(render_line(level, &output))
            }
        }
    }

    /// Deliver messages from `start_index` onwards to the observer.
    pub fn send_messages(&self, start_index: usize) {
        let (message_types, messages): (Vec<String>, Vec<String>) = {
            let log = self.inner.log.read();
            if start_index >= log.len() {
                // An observer asks for index 0 when it first attaches, which is
                // valid even if nothing has been logged yet.
                if start_index != 0 {
                    drop(log);
                    self.inner.transport.did_misbehave(NON_EXISTENT_INDEX);
                }
                return;
            }

            let entries = log.entries_from(start_index);
            let count = self
                .inner
                .config
                .batch_limit
                .map_or(entries.len(), |limit| limit.min(entries.len()));

            entries[..count]
                .iter()
                .map(|message| (message.kind().wire_tag().to_string(), message.payload().to_string()))
                .unzip()
        };

        self.inner
            .transport
            .did_get_messages(start_index, message_types, messages);
    }
}

/// Echo plain console output to the process log.
fn echo_to_log(level: LogLevel, output: &str) {
    let method = level.method_name();
    match level {
        LogLevel::Error | LogLevel::Assert => tracing::error!(target: "console", method, "{}", output),
        LogLevel::Warn | LogLevel::CountReset => tracing::warn!(target: "console", method, "{}", output),
        LogLevel::Debug => tracing::debug!(target: "console", method, "{}", output),
        LogLevel::Trace => tracing::trace!(target: "console", method, "{}", output),
        _ => tracing::info!(target: "console", method, "{}", output),
    }
}
