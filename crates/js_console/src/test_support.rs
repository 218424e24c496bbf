//! In-memory transport and a toy engine for unit tests.

use crate::error::ConsoleResult;
use crate::evaluator::{Completion, Evaluator, ParseError, Renderer, Thrown};
use crate::markup::escape_html_entities;
use crate::output::ConsoleOutput;
use crate::printer::{LogLevel, PrinterArguments};
use crate::protocol::ConsoleEvent;
use crate::realm::ExecutionContext;
use crate::transport::ConsoleTransport;
use parking_lot::Mutex;

/// Transport that records every event.
#[derive(Default)]
pub struct RecordingTransport {
    events: Mutex<Vec<ConsoleEvent>>,
}

impl RecordingTransport {
    pub fn events(&self) -> Vec<ConsoleEvent> {
        self.events.lock().clone()
    }

    pub fn take(&self) -> Vec<ConsoleEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl ConsoleTransport for RecordingTransport {
    fn did_output_message(&self, index: usize) {
        self.events.lock().push(ConsoleEvent::MessageAvailable { index });
    }

    fn did_get_messages(&self, start_index: usize, message_types: Vec<String>, messages: Vec<String>) {
        self.events.lock().push(ConsoleEvent::Messages {
            start_index,
            message_types,
            messages,
        });
    }

    fn did_misbehave(&self, reason: &str) {
        self.events.lock().push(ConsoleEvent::Misbehavior {
            reason: reason.to_string(),
        });
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FakeValue {
    Undefined,
    Str(String),
    Num(i64),
    Error { name: String, message: String },
}

#[derive(Clone, Debug)]
pub enum FakeProgram {
    Value(FakeValue),
    Throw(FakeValue),
    Log(Vec<String>),
    ReadGlobal,
}

/// A toy language, one statement per input:
///
/// * `'text'` and integers evaluate to themselves
/// * `throw text` throws a string, `throwError text` throws an error object
/// * `log a b` calls `console.log("a", "b")`
/// * `global` evaluates to the name of the global it ran against
/// * anything else is a syntax error, positioned at the first `?` if present
pub struct FakeEngine {
    output: Option<ConsoleOutput>,
    pub evaluated_in: Vec<ExecutionContext<String>>,
    pub syntax_error_globals: Vec<String>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            output: None,
            evaluated_in: Vec::new(),
            syntax_error_globals: Vec::new(),
        }
    }

    pub fn with_output(output: ConsoleOutput) -> Self {
        Self {
            output: Some(output),
            ..Self::new()
        }
    }
}

impl Evaluator for FakeEngine {
    type Global = String;
    type Program = FakeProgram;
    type Value = FakeValue;

    fn page_context(&self) -> ExecutionContext<String> {
        ExecutionContext::for_global("window".to_string())
    }

    fn create_console_global(&mut self, page: &ExecutionContext<String>) -> ConsoleResult<String> {
        Ok(format!("console@{}", page.global))
    }

    fn parse(&mut self, source: &str, _context: &ExecutionContext<String>) -> Result<FakeProgram, ParseError> {
        let source = source.trim();
        if let Some(rest) = source.strip_prefix("throwError ") {
            return Ok(FakeProgram::Throw(FakeValue::Error {
                name: "TypeError".into(),
                message: rest.into(),
            }));
        }
        if let Some(rest) = source.strip_prefix("throw ") {
            return Ok(FakeProgram::Throw(FakeValue::Str(rest.into())));
        }
        if let Some(rest) = source.strip_prefix("log ") {
            return Ok(FakeProgram::Log(rest.split_whitespace().map(String::from).collect()));
        }
        if source == "global" {
            return Ok(FakeProgram::ReadGlobal);
        }
        if let Some(text) = source.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
            return Ok(FakeProgram::Value(FakeValue::Str(text.into())));
        }
        if let Ok(number) = source.parse::<i64>() {
            return Ok(FakeProgram::Value(FakeValue::Num(number)));
        }

        let error = ParseError::new("Unexpected token");
        Err(match source.find('?') {
            Some(offset) => error.at(1, offset + 1),
            None => error,
        })
    }

    fn evaluate(&mut self, program: &FakeProgram, context: &ExecutionContext<String>) -> Completion<FakeValue> {
        self.evaluated_in.push(context.clone());
        match program {
            FakeProgram::Value(value) => Ok(value.clone()),
            FakeProgram::Throw(value) => Err(Thrown(value.clone())),
            FakeProgram::Log(values) => {
                if let Some(output) = &self.output {
                    output.printer(LogLevel::Log, PrinterArguments::values(values.clone()));
                }
                Ok(FakeValue::Undefined)
            }
            FakeProgram::ReadGlobal => Ok(FakeValue::Str(context.global.clone())),
        }
    }

    fn syntax_error(&mut self, description: &str, global: &String) -> FakeValue {
        self.syntax_error_globals.push(global.clone());
        FakeValue::Error {
            name: "SyntaxError".into(),
            message: description.into(),
        }
    }
}

impl Renderer<FakeValue> for FakeEngine {
    fn is_object(&self, value: &FakeValue) -> bool {
        matches!(value, FakeValue::Error { .. })
    }

    fn value_to_markup(&mut self, value: &FakeValue) -> String {
        match value {
            FakeValue::Undefined => "undefined".to_string(),
            FakeValue::Str(text) => escape_html_entities(&format!("\"{}\"", text)),
            FakeValue::Num(number) => number.to_string(),
            FakeValue::Error { .. } => "[object Error]".to_string(),
        }
    }

    fn error_to_markup(&mut self, error: &FakeValue) -> String {
        match error {
            FakeValue::Error { name, message } => format!(
                "<span class=\"error\">{}: {}</span>",
                escape_html_entities(name),
                escape_html_entities(message)
            ),
            other => self.value_to_markup(other),
        }
    }
}
