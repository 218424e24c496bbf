//! Formatting of Boa values for console output.

use crate::markup::{escape_html_entities, span};
use boa_engine::{js_string, Context, JsObject, JsString, JsValue};

/// Plain-text form of a console argument. Strings are printed bare.
pub fn format_arg(value: &JsValue, context: &mut Context) -> String {
    match value {
        JsValue::String(s) => s.to_std_string_escaped(),
        _ => format_value(value, context, 0),
    }
}

/// Plain-text forms of all console arguments.
pub fn format_args(args: &[JsValue], context: &mut Context) -> Vec<String> {
    args.iter().map(|arg| format_arg(arg, context)).collect()
}

const MAX_DEPTH: usize = 3;
const MAX_ARRAY_ITEMS: u64 = 10;

/// Format a single value.
///
/// Arrays and functions get a compact form; everything else uses Boa's own
/// display, which already quotes strings and spells out `NaN`/`Infinity`.
pub fn format_value(value: &JsValue, context: &mut Context, depth: usize) -> String {
    match value.as_object() {
        Some(obj) if obj.is_array() => format_array(obj, context, depth),
        Some(obj) if obj.is_callable() => {
            match string_property(obj, js_string!("name"), context) {
                name if name.is_empty() => "[Function (anonymous)]".to_string(),
                name => format!("[Function: {}]", name),
            }
        }
        _ => value.display().to_string(),
    }
}

fn format_array(array: &JsObject, context: &mut Context, depth: usize) -> String {
    if depth >= MAX_DEPTH {
        return "[...]".to_string();
    }

    let length = array
        .get(js_string!("length"), context)
        .and_then(|length| length.to_length(context))
        .unwrap_or(0);

    let mut items: Vec<String> = (0..length.min(MAX_ARRAY_ITEMS))
        .map(|i| match array.get(i, context) {
            Ok(item) => format_value(&item, context, depth + 1),
            Err(_) => "<error>".to_string(),
        })
        .collect();
    if length > MAX_ARRAY_ITEMS {
        items.push(format!("... {} more items", length - MAX_ARRAY_ITEMS));
    }
    format!("[{}]", items.join(", "))
}

/// CSS class the observer uses to colour a value.
fn value_class(value: &JsValue) -> &'static str {
    match value {
        JsValue::Undefined => "undefined",
        JsValue::Null => "null",
        JsValue::Boolean(_) => "boolean",
        JsValue::Integer(_) | JsValue::Rational(_) | JsValue::BigInt(_) => "number",
        JsValue::String(_) => "string",
        JsValue::Symbol(_) => "symbol",
        JsValue::Object(obj) if obj.is_callable() => "function",
        JsValue::Object(_) => "object",
    }
}

/// Markup for a value.
pub fn value_to_html(value: &JsValue, context: &mut Context) -> String {
    let text = format_value(value, context, 0);
    span(value_class(value), &escape_html_entities(&text))
}

/// Markup for a thrown error object: `Name: message`.
pub fn error_to_html(error: &JsValue, context: &mut Context) -> String {
    let Some(obj) = error.as_object() else {
        return value_to_html(error, context);
    };

    let name = string_property(obj, js_string!("name"), context);
    let message = string_property(obj, js_string!("message"), context);

    let text = match (name.is_empty(), message.is_empty()) {
        (false, false) => format!("{}: {}", name, message),
        (false, true) => name,
        (true, false) => message,
        // Nothing error-like to show, so render the thrown object itself.
        (true, true) => return value_to_html(error, context),
    };
    span("error", &escape_html_entities(&text))
}

/// String form of `obj[key]`, empty when missing or not convertible.
fn string_property(obj: &JsObject, key: JsString, context: &mut Context) -> String {
    let Ok(value) = obj.get(key, context) else {
        return String::new();
    };
    if value.is_undefined() {
        return String::new();
    }
    value
        .to_string(context)
        .map(|s| s.to_std_string_escaped())
        .unwrap_or_default()
}
