use serde::Serialize;

/// Request envelope for the process-text endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisRequest {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub payload: Payload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub content: String,
}

/// Wrap text in the envelope; the text is passed through untouched
pub fn build_payload(text: &str) -> AnalysisRequest {
    AnalysisRequest {
        messages: vec![Message {
            payload: Payload {
                content: text.to_string(),
            },
        }],
    }
}
