//! HTML fragments emitted into the console log.
//!
//! Everything here returns display-ready markup. Text coming from scripts must
//! pass through [`escape_html_entities`] before it lands in a fragment.

use std::fmt::Write;

/// Escape text for inclusion in HTML content or a quoted attribute.
pub fn escape_html_entities(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }
    result
}

/// Wrap text in a `<pre>` block.
pub fn preformatted(text: &str) -> String {
    format!("<pre>{}</pre>", escape_html_entities(text))
}

/// Wrap already-escaped markup in a span with the given class.
pub fn span(class: &str, inner_html: &str) -> String {
    format!("<span class=\"{}\">{}</span>", class, inner_html)
}

/// Render a stack trace: optional title line, then one arrow line per frame.
pub fn trace_html(label: &str, stack: &[String]) -> String {
    let mut html = String::new();
    if !label.is_empty() {
        let _ = write!(html, "<span class='title'>{}</span><br>", escape_html_entities(label));
    }

    html.push_str("<span class='trace'>");
    for function_name in stack {
        let _ = write!(html, "-> {}<br>", escape_html_entities(function_name));
    }
    html.push_str("</span>");
    html
}
