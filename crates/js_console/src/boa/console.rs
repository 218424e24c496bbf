//! The `console` global, forwarding every call to the console printer.

use super::format::format_args;
use crate::output::ConsoleOutput;
use crate::printer::{Group, LogLevel, PrinterArguments, Trace};
use boa_engine::{
    js_string, object::ObjectInitializer, property::Attribute, Context, JsArgs, JsObject,
    JsResult, JsValue, NativeFunction,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// State shared by all console methods of one global.
struct ConsoleBinding {
    output: ConsoleOutput,
    counters: Mutex<HashMap<String, u64>>,
}

impl ConsoleBinding {
    fn print(&self, level: LogLevel, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
        let values = format_args(args, context);
        self.output.printer(level, PrinterArguments::Values(values));
        Ok(JsValue::undefined())
    }

    fn trace(&self, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
        let stack = stack_frames(context);
        let trace = Trace {
            label: format_args(args, context).join(" "),
            stack,
        };
        self.output.printer(LogLevel::Trace, PrinterArguments::Trace(trace));
        Ok(JsValue::undefined())
    }

    fn group(&self, level: LogLevel, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
        let mut label = format_args(args, context).join(" ");
        if label.is_empty() {
            label = format!("console.{}", level.method_name());
        }
        self.output.printer(level, PrinterArguments::Group(Group { label }));
        Ok(JsValue::undefined())
    }

    fn assert(&self, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
        if args.get_or_undefined(0).to_boolean() {
            return Ok(JsValue::undefined());
        }

        let message = if args.len() > 1 {
            format!("Assertion failed: {}", format_args(&args[1..], context).join(" "))
        } else {
            "Assertion failed".to_string()
        };
        self.output
            .printer(LogLevel::Error, PrinterArguments::Values(vec![message]));
        Ok(JsValue::undefined())
    }

    fn count(&self, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
        let label = counter_label(args, context)?;
        let count = {
            let mut counters = self.counters.lock();
            let count = counters.entry(label.clone()).or_insert(0);
            *count += 1;
            *count
        };
        self.output.printer(
            LogLevel::Count,
            PrinterArguments::Values(vec![format!("{}: {}", label, count)]),
        );
        Ok(JsValue::undefined())
    }

    fn count_reset(&self, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
        let label = counter_label(args, context)?;
        let known = match self.counters.lock().get_mut(&label) {
            Some(count) => {
                *count = 0;
                true
            }
            None => false,
        };
        if !known {
            self.output.printer(
                LogLevel::CountReset,
                PrinterArguments::Values(vec![format!("\"{}\" doesn't have a count", label)]),
            );
        }
        Ok(JsValue::undefined())
    }
}

/// Names of the script functions on the call stack, innermost first.
///
/// The top-level script frame and anonymous frames are left out.
fn stack_frames(context: &Context) -> Vec<String> {
    context
        .stack_trace()
        .map(|frame| frame.code_block().name().to_std_string_escaped())
        .filter(|name| !name.is_empty() && name != "<main>")
        .collect()
}

/// Label argument of `count()`/`countReset()`, `"default"` when omitted.
fn counter_label(args: &[JsValue], context: &mut Context) -> JsResult<String> {
    let label = args.get_or_undefined(0);
    if label.is_undefined() {
        return Ok("default".to_string());
    }
    Ok(label.to_string(context)?.to_std_string_escaped())
}

/// Wrap a console method as a native function.
fn method<F>(binding: &Arc<ConsoleBinding>, f: F) -> NativeFunction
where
    F: Fn(&ConsoleBinding, &[JsValue], &mut Context) -> JsResult<JsValue> + 'static,
{
    let binding = binding.clone();
    // SAFETY: the closure only captures Rust data (an `Arc` of the binding and
    // a function), none of which holds garbage-collected values.
    unsafe { NativeFunction::from_closure(move |_this, args, context| f(&binding, args, context)) }
}

/// Register the console API on the current global object and return it.
pub fn register_console(context: &mut Context, output: ConsoleOutput) -> JsResult<JsObject> {
    let binding = Arc::new(ConsoleBinding {
        output,
        counters: Mutex::new(HashMap::new()),
    });

    let console = ObjectInitializer::new(context)
        .function(method(&binding, |b, args, ctx| b.print(LogLevel::Log, args, ctx)), js_string!("log"), 0)
        .function(method(&binding, |b, args, ctx| b.print(LogLevel::Info, args, ctx)), js_string!("info"), 0)
        .function(method(&binding, |b, args, ctx| b.print(LogLevel::Warn, args, ctx)), js_string!("warn"), 0)
        .function(method(&binding, |b, args, ctx| b.print(LogLevel::Error, args, ctx)), js_string!("error"), 0)
        .function(method(&binding, |b, args, ctx| b.print(LogLevel::Debug, args, ctx)), js_string!("debug"), 0)
        .function(method(&binding, |b, args, ctx| b.trace(args, ctx)), js_string!("trace"), 0)
        .function(method(&binding, |b, args, ctx| b.assert(args, ctx)), js_string!("assert"), 0)
        .function(method(&binding, |b, args, ctx| b.count(args, ctx)), js_string!("count"), 0)
        .function(method(&binding, |b, args, ctx| b.count_reset(args, ctx)), js_string!("countReset"), 0)
        .function(method(&binding, |b, args, ctx| b.group(LogLevel::Group, args, ctx)), js_string!("group"), 0)
        .function(
            method(&binding, |b, args, ctx| b.group(LogLevel::GroupCollapsed, args, ctx)),
            js_string!("groupCollapsed"),
            0,
        )
        .function(
            method(&binding, |b, _, _| {
                b.output.end_group();
                Ok(JsValue::undefined())
            }),
            js_string!("groupEnd"),
            0,
        )
        .function(
            method(&binding, |b, _, _| {
                b.output.clear_output();
                Ok(JsValue::undefined())
            }),
            js_string!("clear"),
            0,
        )
        .build();

    context.register_global_property(js_string!("console"), console.clone(), Attribute::all())?;
    Ok(console)
}
