//! Console engine backed by Boa.
//!
//! The page runs in the context's initial realm. The console gets a realm of
//! its own whose global object inherits from the page global, so console input
//! can read page state while its own declarations stay on the console global.

mod console;
pub mod format;

use crate::error::{ConsoleError, ConsoleResult};
use crate::evaluator::{Completion, Evaluator, ParseError, Renderer, Thrown};
use crate::output::ConsoleOutput;
use crate::realm::ExecutionContext;
use boa_engine::{
    property::Attribute, realm::Realm, Context, JsError, JsNativeError, JsObject,
    JsString, JsValue, Script, Source,
};
use std::ops::{Deref, DerefMut};

/// Console input that parsed successfully.
#[derive(Clone, Debug)]
pub struct BoaProgram {
    source: String,
}

/// Boa-backed [`Evaluator`] and [`Renderer`].
pub struct BoaEngine {
    context: Context,
    page_realm: Realm,
    page_global: JsObject,
    console_object: JsObject,
    console_realm: Option<(JsObject, Realm)>,
}

impl BoaEngine {
    /// Create an engine whose page global has a `console` printing to `output`.
    pub fn new(output: ConsoleOutput) -> ConsoleResult<Self> {
        let mut context = Context::default();
        let console_object = console::register_console(&mut context, output).map_err(engine_error)?;

        let page_global = context.global_object();
        for name in ["window", "self"] {
            context
                .register_global_property(JsString::from(name), page_global.clone(), Attribute::all())
                .map_err(engine_error)?;
        }

        Ok(Self {
            page_realm: context.realm().clone(),
            page_global,
            console_object,
            console_realm: None,
            context,
        })
    }

    /// Run a script directly against the page realm, bypassing the console.
    pub fn execute(&mut self, source: &str) -> ConsoleResult<JsValue> {
        let realm = self.page_realm.clone();
        let mut scope = RealmScope::enter(&mut self.context, realm);
        scope
            .eval(Source::from_bytes(source))
            .map_err(engine_error)
    }

    /// Process pending promise jobs.
    pub fn run_pending_jobs(&mut self) {
        self.context.run_jobs();
    }

    pub fn page_global(&self) -> &JsObject {
        &self.page_global
    }

    /// Global object of the realm the context currently has entered.
    pub fn current_global(&self) -> JsObject {
        self.context.global_object()
    }

    /// Realm owning `global`. Unknown globals fall back to the page realm.
    fn realm_for(&self, global: &JsObject) -> Realm {
        match &self.console_realm {
            Some((console_global, realm)) if JsObject::equals(console_global, global) => realm.clone(),
            _ => self.page_realm.clone(),
        }
    }
}

impl Evaluator for BoaEngine {
    type Global = JsObject;
    type Program = BoaProgram;
    type Value = JsValue;

    fn page_context(&self) -> ExecutionContext<JsObject> {
        ExecutionContext::for_global(self.page_global.clone())
    }

    fn create_console_global(&mut self, page: &ExecutionContext<JsObject>) -> ConsoleResult<JsObject> {
        let realm = self.context.create_realm().map_err(engine_error)?;

        let global = {
            let mut scope = RealmScope::enter(&mut self.context, realm.clone());
            for (name, value) in [
                ("window", page.global.clone()),
                ("console", self.console_object.clone()),
            ] {
                scope
                    .register_global_property(JsString::from(name), value, Attribute::all())
                    .map_err(engine_error)?;
            }
            scope.global_object()
        };

        if !global.set_prototype(Some(page.global.clone())) {
            return Err(ConsoleError::engine("Console global rejected the page global as prototype"));
        }

        self.console_realm = Some((global.clone(), realm));
        Ok(global)
    }

    fn parse(&mut self, source: &str, context: &ExecutionContext<JsObject>) -> Result<BoaProgram, ParseError> {
        let realm = self.realm_for(&context.global);
        match Script::parse(Source::from_bytes(source), Some(realm), &mut self.context) {
            Ok(_) => Ok(BoaProgram {
                source: source.to_string(),
            }),
            Err(err) => Err(parse_error(&err, &mut self.context)),
        }
    }

    fn evaluate(&mut self, program: &BoaProgram, context: &ExecutionContext<JsObject>) -> Completion<JsValue> {
        // Scripts are bound to the realm they were parsed in, so the checked
        // source is parsed again against the realm being evaluated in.
        let realm = self.realm_for(&context.global);
        let mut scope = RealmScope::enter(&mut self.context, realm.clone());
        let result = Script::parse(Source::from_bytes(program.source.as_str()), Some(realm), &mut scope)
            .and_then(|script| script.evaluate(&mut scope));
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                let thrown = err.to_opaque(&mut scope);
                Err(Thrown(thrown))
            }
        }
    }

    fn syntax_error(&mut self, description: &str, global: &JsObject) -> JsValue {
        let realm = self.realm_for(global);
        let mut scope = RealmScope::enter(&mut self.context, realm);
        JsNativeError::syntax()
            .with_message(description)
            .to_opaque(&mut scope)
            .into()
    }
}

impl Renderer<JsValue> for BoaEngine {
    fn is_object(&self, value: &JsValue) -> bool {
        value.is_object()
    }

    fn value_to_markup(&mut self, value: &JsValue) -> String {
        format::value_to_html(value, &mut self.context)
    }

    fn error_to_markup(&mut self, error: &JsValue) -> String {
        format::error_to_html(error, &mut self.context)
    }
}

/// Keeps a realm entered on a context, re-entering the previous one on drop.
struct RealmScope<'a> {
    context: &'a mut Context,
    previous: Option<Realm>,
}

impl<'a> RealmScope<'a> {
    fn enter(context: &'a mut Context, realm: Realm) -> Self {
        let previous = context.enter_realm(realm);
        Self {
            context,
            previous: Some(previous),
        }
    }
}

impl Deref for RealmScope<'_> {
    type Target = Context;

    fn deref(&self) -> &Context {
        &*self.context
    }
}

impl DerefMut for RealmScope<'_> {
    fn deref_mut(&mut self) -> &mut Context {
        &mut *self.context
    }
}

impl Drop for RealmScope<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.context.enter_realm(previous);
        }
    }
}

fn engine_error(err: JsError) -> ConsoleError {
    ConsoleError::engine(err.to_string())
}

/// Convert a Boa syntax error, splitting off the `at line N, col M` suffix.
fn parse_error(err: &JsError, context: &mut Context) -> ParseError {
    let message = err
        .try_native(context)
        .map(|e| e.message().to_string())
        .unwrap_or_else(|_| err.to_string());

    if let Some((description, location)) = message.rsplit_once(" at line ") {
        if let Some((line, column)) = location.split_once(", col ") {
            if let (Ok(line), Ok(column)) = (line.trim().parse(), column.trim().parse()) {
                return ParseError::new(description).at(line, column);
            }
        }
    }
    ParseError::new(message)
}
