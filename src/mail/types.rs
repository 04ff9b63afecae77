/// Format in which the host hands out a message body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Text,
    #[allow(dead_code)]
    Html,
}

/// The message currently open in the host
#[derive(Debug, Clone, Default)]
pub struct MessageItem {
    pub subject: Option<String>,
    pub text: Option<String>,
    pub html: Option<String>,
}

impl MessageItem {
    /// A message with no headers whose body is the given text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            subject: None,
            text: Some(text.into()),
            html: None,
        }
    }

    /// Body in the requested format.
    /// Text falls back to the HTML part converted to plain text; HTML falls back to the text part.
    pub fn body(&self, format: BodyFormat) -> Option<String> {
        match format {
            BodyFormat::Text => self
                .text
                .clone()
                .or_else(|| self.html.as_deref().map(html_to_text)),
            BodyFormat::Html => self.html.clone().or_else(|| self.text.clone()),
        }
    }
}

/// Convert HTML to readable plain text
pub fn html_to_text(html: &str) -> String {
    html2text::config::plain()
        .string_from_read(html.as_bytes(), 80)
        .unwrap_or_else(|_| html.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_body_preferred() {
        let item = MessageItem {
            subject: None,
            text: Some("plain".to_string()),
            html: Some("<p>rich</p>".to_string()),
        };
        assert_eq!(item.body(BodyFormat::Text).as_deref(), Some("plain"));
        assert_eq!(item.body(BodyFormat::Html).as_deref(), Some("<p>rich</p>"));
    }

    #[test]
    fn test_html_only_message_yields_text() {
        let item = MessageItem {
            subject: None,
            text: None,
            html: Some("<p>Please review the <b>budget</b>.</p>".to_string()),
        };
        let text = item.body(BodyFormat::Text).unwrap();
        assert!(text.contains("Please review the"));
        assert!(text.contains("budget"));
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn test_from_text_has_no_subject() {
        let item = MessageItem::from_text("hello");
        assert!(item.subject.is_none());
        assert_eq!(item.body(BodyFormat::Html).as_deref(), Some("hello"));
    }
}
