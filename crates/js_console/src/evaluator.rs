//! Seams to the script engine.
//!
//! The console never parses or runs script itself. An [`Evaluator`] does that,
//! always against an [`ExecutionContext`] passed in by the caller, and a
//! [`Renderer`] turns the resulting values into markup.

use crate::error::ConsoleResult;
use crate::realm::ExecutionContext;
use std::fmt;

/// 1-based position of a syntax error in the submitted source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

/// A syntax error reported by [`Evaluator::parse`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub description: String,
    pub position: Option<SourcePosition>,
}

impl ParseError {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            position: None,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.position = Some(SourcePosition { line, column });
        self
    }

    /// The offending source line with a caret under the error column.
    ///
    /// Empty when the error has no position or the position is outside `source`.
    pub fn source_location_hint(&self, source: &str) -> String {
        let Some(position) = self.position else {
            return String::new();
        };

        let normalized = source
            .replace("\r\n", "\n")
            .replace(['\r', '\u{2028}', '\u{2029}'], "\n");

        let Some(line) = position
            .line
            .checked_sub(1)
            .and_then(|index| normalized.split('\n').nth(index))
        else {
            return String::new();
        };

        let mut hint = String::with_capacity(line.len() + position.column + 1);
        hint.push_str(line);
        hint.push('\n');
        hint.extend(std::iter::repeat(' ').take(position.column.saturating_sub(1)));
        hint.push('^');
        hint
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(position) => write!(
                f,
                "{} (line: {}, column: {})",
                self.description, position.line, position.column
            ),
            None => f.write_str(&self.description),
        }
    }
}

/// A value thrown out of an evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct Thrown<V>(pub V);

/// Outcome of running a program: a value or a thrown value.
pub type Completion<V> = Result<V, Thrown<V>>;

/// Parses and runs script on behalf of the console.
pub trait Evaluator {
    /// Handle to a global object.
    type Global: Clone;
    /// A successfully parsed program.
    type Program;
    /// A script value.
    type Value;

    /// The page's own execution context.
    fn page_context(&self) -> ExecutionContext<Self::Global>;

    /// Create the console's global object, derived from the page context.
    fn create_console_global(
        &mut self,
        page: &ExecutionContext<Self::Global>,
    ) -> ConsoleResult<Self::Global>;

    /// Parse `source` against `context`.
    fn parse(
        &mut self,
        source: &str,
        context: &ExecutionContext<Self::Global>,
    ) -> Result<Self::Program, ParseError>;

    /// Run a parsed program against `context`.
    fn evaluate(
        &mut self,
        program: &Self::Program,
        context: &ExecutionContext<Self::Global>,
    ) -> Completion<Self::Value>;

    /// Build a `SyntaxError` object belonging to `global`.
    fn syntax_error(&mut self, description: &str, global: &Self::Global) -> Self::Value;
}

/// Renders script values as markup.
pub trait Renderer<V> {
    /// Whether `value` is an object (and so gets the structured error rendering).
    fn is_object(&self, value: &V) -> bool;

    fn value_to_markup(&mut self, value: &V) -> String;

    fn error_to_markup(&mut self, error: &V) -> String;
}
