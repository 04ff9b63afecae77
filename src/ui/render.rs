//! Pane markup and terminal presentation

use serde_json::Value;

use crate::analysis::AnalysisKind;
use crate::config::{OutputConfig, OutputFormat};
use crate::constants::PROCESSING_MARKUP;

use super::pane::Pane;

/// Labeled, 2-space indented rendering of an analysis result
pub fn render_result(kind: AnalysisKind, value: &Value) -> String {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    format!("<b>{}:</b> <br/><pre>{}</pre>", kind.label(), json)
}

pub fn render_processing() -> &'static str {
    PROCESSING_MARKUP
}

pub fn render_subject(subject: &str) -> String {
    format!("<b>Subject:</b> <br/>{}", subject)
}

/// Turn a pane's markup into what the terminal shows
pub fn present(pane: &Pane, output: &OutputConfig) -> String {
    let markup = pane.content();
    match output.format {
        OutputFormat::Html => markup,
        OutputFormat::Text => {
            let width = output.width.max(20);
            let escaped = escape_preformatted(&markup);
            html2text::config::plain()
                .string_from_read(escaped.as_bytes(), width)
                .unwrap_or_else(|e| {
                    tracing::warn!("Failed to convert pane markup: {}", e);
                    markup
                })
        }
    }
}

/// Escape the body of the `<pre>` block so result text reads back verbatim
fn escape_preformatted(markup: &str) -> String {
    let (Some(start), Some(end)) = (markup.find("<pre>"), markup.rfind("</pre>")) else {
        return markup.to_string();
    };
    let body_start = start + "<pre>".len();
    if end < body_start {
        return markup.to_string();
    }

    let body = markup[body_start..end]
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!("{}{}{}", &markup[..body_start], body, &markup[end..])
}
