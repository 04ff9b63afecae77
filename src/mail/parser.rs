use mail_parser::{MessageParser, MimeHeaders, PartType};

use super::host::HostError;
use super::types::MessageItem;

/// Parse a raw RFC 5322 message into the item the host exposes
pub fn parse_message(raw: &[u8]) -> Result<MessageItem, HostError> {
    let message = MessageParser::default()
        .parse(raw)
        .ok_or_else(|| HostError::new("Message could not be parsed"))?;

    let subject = message.subject().map(|s| s.to_string());
    let text = extract_text_body(&message);
    let html = extract_html_body(&message);

    Ok(MessageItem {
        subject,
        text,
        html,
    })
}

fn extract_text_body(message: &mail_parser::Message) -> Option<String> {
    for part in message.text_bodies() {
        if let PartType::Text(text) = &part.body {
            return Some(text.to_string());
        }
    }

    // Fallback: any part explicitly typed text/plain
    for part in message.parts.iter() {
        if let PartType::Text(text) = &part.body {
            let content_type = part.content_type();
            if content_type
                .map(|ct| ct.subtype() == Some("plain"))
                .unwrap_or(true)
            {
                return Some(text.to_string());
            }
        }
    }

    None
}

fn extract_html_body(message: &mail_parser::Message) -> Option<String> {
    for part in message.html_bodies() {
        if let PartType::Html(html) = &part.body {
            return Some(html.to_string());
        }
    }

    None
}
