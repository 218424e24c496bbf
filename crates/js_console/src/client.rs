//! The console client: evaluates console input and serves the message log.

use crate::error::ConsoleResult;
use crate::evaluator::{Evaluator, Renderer, Thrown};
use crate::markup;
use crate::output::ConsoleOutput;
use crate::printer::{LogLevel, PrinterArguments};
use crate::protocol::ConsoleRequest;
use crate::realm::{ExecutionContext, RealmSwitch};

/// Console attached to one page.
///
/// Owns the engine and the console realm. The message log lives in the shared
/// [`ConsoleOutput`] so the engine's console bindings can append to it too.
pub struct ConsoleClient<E: Evaluator> {
    engine: E,
    realm: RealmSwitch<E::Global>,
    output: ConsoleOutput,
}

impl<E> ConsoleClient<E>
where
    E: Evaluator + Renderer<<E as Evaluator>::Value>,
{
    /// Create a console client, deriving the console realm from the page.
    pub fn new(mut engine: E, output: ConsoleOutput) -> ConsoleResult<Self> {
        let page = engine.page_context();
        let console_global = engine.create_console_global(&page)?;
        tracing::debug!("Console realm created");

        Ok(Self {
            engine,
            realm: RealmSwitch::new(page, console_global),
            output,
        })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn output(&self) -> &ConsoleOutput {
        &self.output
    }

    /// The context seen by everything except console evaluation.
    pub fn active_context(&self) -> &ExecutionContext<E::Global> {
        self.realm.active()
    }

    /// Evaluate console input and log the result.
    ///
    /// Syntax errors and uncaught exceptions become log entries; nothing is
    /// reported back to the caller.
    pub fn handle_input(&mut self, source: &str) {
        let mut output_html = String::new();

        let page = self.realm.active().clone();
        let completion = match self.engine.parse(source, &page) {
            Err(error) => {
                tracing::debug!("Console input failed to parse: {}", error);
                let hint = error.source_location_hint(source);
                if !hint.is_empty() {
                    output_html.push_str(&markup::preformatted(&hint));
                }
                let console_global = self.realm.console().global.clone();
                Err(Thrown(
                    self.engine.syntax_error(&error.to_string(), &console_global),
                ))
            }
            Ok(program) => {
                let engine = &mut self.engine;
                self.realm
                    .with_console_realm(|context| engine.evaluate(&program, context))
            }
        };

        match completion {
            Ok(value) => {
                let html = self.engine.value_to_markup(&value);
                self.output.print_html(html);
            }
            Err(Thrown(error)) => {
                output_html.push_str("Uncaught exception: ");
                if self.engine.is_object(&error) {
                    output_html.push_str(&self.engine.error_to_markup(&error));
                } else {
                    output_html.push_str(&self.engine.value_to_markup(&error));
                }
                self.output.print_html(output_html);
            }
        }
    }

    /// Render a console API call. Returns the index of the appended message.
    pub fn printer(&self, level: LogLevel, arguments: PrinterArguments) -> usize {
        self.output.printer(level, arguments)
    }

    pub fn print_html(&self, html: impl Into<String>) -> usize {
        self.output.print_html(html)
    }

    pub fn clear_output(&self) -> usize {
        self.output.clear_output()
    }

    /// Same as [`ConsoleClient::clear_output`]; the console method is named `clear`.
    pub fn clear(&self) -> usize {
        self.clear_output()
    }

    pub fn begin_group(&self, label: impl Into<String>, start_expanded: bool) -> usize {
        self.output.begin_group(label, start_expanded)
    }

    pub fn end_group(&self) -> usize {
        self.output.end_group()
    }

    pub fn send_messages(&self, start_index: usize) {
        self.output.send_messages(start_index)
    }

    /// Dispatch a request from the observer.
    pub fn handle_request(&mut self, request: ConsoleRequest) {
        match request {
            ConsoleRequest::GetConsoleMessages { start_index } => self.send_messages(start_index),
            ConsoleRequest::EvaluateConsoleInput { source } => self.handle_input(&source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;
    use crate::message::MessageKind;
    use crate::protocol::ConsoleEvent;
    use crate::test_support::{FakeEngine, RecordingTransport};
    use std::sync::Arc;

    fn client() -> (ConsoleClient<FakeEngine>, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::default());
        let output = ConsoleOutput::new(transport.clone(), ConsoleConfig::default());
        let engine = FakeEngine::with_output(output.clone());
        (ConsoleClient::new(engine, output).unwrap(), transport)
    }

    fn payload(client: &ConsoleClient<FakeEngine>, index: usize) -> String {
        client.output().message(index).unwrap().payload().to_string()
    }

    #[test]
    fn test_value_result() {
        let (mut client, transport) = client();
        client.handle_input("42");
        assert_eq!(payload(&client, 0), "42");
        assert_eq!(transport.events(), vec![ConsoleEvent::MessageAvailable { index: 0 }]);
    }

    #[test]
    fn test_result_is_escaped() {
        let (mut client, _) = client();
        client.handle_input("'<script>'");
        let html = payload(&client, 0);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_evaluates_in_console_realm() {
        let (mut client, _) = client();
        client.handle_input("global");
        assert_eq!(payload(&client, 0), "&quot;console@window&quot;");
        assert_eq!(
            client.engine().evaluated_in,
            vec![ExecutionContext::for_global("console@window".to_string())]
        );
        assert_eq!(client.active_context().global, "window");
    }

    #[test]
    fn test_thrown_primitive() {
        let (mut client, _) = client();
        client.handle_input("throw boom");
        assert_eq!(payload(&client, 0), "Uncaught exception: &quot;boom&quot;");
    }

    #[test]
    fn test_thrown_object() {
        let (mut client, _) = client();
        client.handle_input("throwError x is <undefined>");
        assert_eq!(
            payload(&client, 0),
            "Uncaught exception: <span class=\"error\">TypeError: x is &lt;undefined&gt;</span>"
        );
    }

    #[test]
    fn test_realm_restored_after_throw() {
        let (mut client, _) = client();
        client.handle_input("throw first");
        assert_eq!(client.active_context(), &ExecutionContext::for_global("window".to_string()));

        // Console calls made from page code after the failed evaluation still
        // see the page context.
        client.printer(LogLevel::Log, PrinterArguments::values(["after"]));
        client.handle_input("global");
        assert_eq!(client.active_context().global, "window");
        assert_eq!(client.output().len(), 3);
        assert_eq!(payload(&client, 2), "&quot;console@window&quot;");
    }

    #[test]
    fn test_parse_error_with_hint() {
        let (mut client, _) = client();
        client.handle_input("oops?");
        assert_eq!(
            payload(&client, 0),
            "<pre>oops?\n    ^</pre>Uncaught exception: \
             <span class=\"error\">SyntaxError: Unexpected token (line: 1, column: 5)</span>"
        );
        assert_eq!(client.engine().syntax_error_globals, vec!["console@window".to_string()]);
        assert!(client.engine().evaluated_in.is_empty());
    }

    #[test]
    fn test_parse_error_without_hint() {
        let (mut client, _) = client();
        client.handle_input("oops");
        assert_eq!(
            payload(&client, 0),
            "Uncaught exception: <span class=\"error\">SyntaxError: Unexpected token</span>"
        );
    }

    #[test]
    fn test_console_calls_during_evaluation_precede_result() {
        let (mut client, transport) = client();
        client.handle_input("log a b");
        assert_eq!(client.output().len(), 2);
        assert_eq!(payload(&client, 0), "<span class=\"log\"> a b</span>");
        assert_eq!(payload(&client, 1), "undefined");
        assert_eq!(
            transport.events(),
            vec![
                ConsoleEvent::MessageAvailable { index: 0 },
                ConsoleEvent::MessageAvailable { index: 1 },
            ]
        );
    }

    #[test]
    fn test_indices_follow_invocation_order() {
        let (mut client, transport) = client();
        client.handle_input("1");
        assert_eq!(client.begin_group("g", true), 1);
        assert_eq!(client.printer(LogLevel::Info, PrinterArguments::values(["i"])), 2);
        assert_eq!(client.end_group(), 3);
        assert_eq!(client.clear(), 4);
        client.handle_input("throw x");
        assert_eq!(client.output().len(), 6);
        assert_eq!(client.output().message(4).unwrap().kind(), MessageKind::Clear);

        let notified: Vec<_> = transport
            .events()
            .into_iter()
            .filter_map(|event| match event {
                ConsoleEvent::MessageAvailable { index } => Some(index),
                _ => None,
            })
            .collect();
        assert_eq!(notified, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn test_handle_request() {
        let (mut client, transport) = client();
        client.handle_request(ConsoleRequest::EvaluateConsoleInput { source: "7".into() });
        client.handle_request(ConsoleRequest::GetConsoleMessages { start_index: 0 });
        assert_eq!(
            transport.take(),
            vec![
                ConsoleEvent::MessageAvailable { index: 0 },
                ConsoleEvent::Messages {
                    start_index: 0,
                    message_types: vec!["html".into()],
                    messages: vec!["7".into()],
                },
            ]
        );

        client.handle_request(ConsoleRequest::GetConsoleMessages { start_index: 4 });
        assert!(matches!(transport.take()[..], [ConsoleEvent::Misbehavior { .. }]));
    }
}
