use std::fmt;
use std::str::FromStr;

/// Which result endpoint a chain polls and which pane it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Sentiment,
    ActionItems,
    Questions,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 3] = [
        AnalysisKind::Sentiment,
        AnalysisKind::ActionItems,
        AnalysisKind::Questions,
    ];

    /// Bold label shown above the rendered result
    pub fn label(self) -> &'static str {
        match self {
            AnalysisKind::Sentiment => "Sentiment Analysis",
            AnalysisKind::ActionItems => "Action Items",
            AnalysisKind::Questions => "Questions",
        }
    }

    /// Command-line name
    pub fn name(self) -> &'static str {
        match self {
            AnalysisKind::Sentiment => "sentiment",
            AnalysisKind::ActionItems => "action-items",
            AnalysisKind::Questions => "questions",
        }
    }

    /// Result path (with query) for a conversation
    pub fn result_path(self, conversation_id: &str) -> String {
        match self {
            AnalysisKind::Sentiment => format!(
                "/v1/conversations/{}/topics?sentiment=true&parentRefs=false&customTopicVocabulary=",
                conversation_id
            ),
            AnalysisKind::ActionItems => {
                format!("/v1/conversations/{}/action-items", conversation_id)
            }
            AnalysisKind::Questions => format!("/v1/conversations/{}/questions", conversation_id),
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sentiment" | "sentiment-analysis" => Ok(AnalysisKind::Sentiment),
            "action-items" | "actions" => Ok(AnalysisKind::ActionItems),
            "questions" => Ok(AnalysisKind::Questions),
            other => Err(format!("Unknown analysis kind: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_paths_substitute_id_only() {
        assert_eq!(
            AnalysisKind::Sentiment.result_path("abc123"),
            "/v1/conversations/abc123/topics?sentiment=true&parentRefs=false&customTopicVocabulary="
        );
        assert_eq!(
            AnalysisKind::ActionItems.result_path("abc123"),
            "/v1/conversations/abc123/action-items"
        );
        assert_eq!(
            AnalysisKind::Questions.result_path("abc123"),
            "/v1/conversations/abc123/questions"
        );
    }

    #[test]
    fn test_parse_names() {
        for kind in AnalysisKind::ALL {
            assert_eq!(kind.name().parse::<AnalysisKind>(), Ok(kind));
        }
        assert!("summary".parse::<AnalysisKind>().is_err());
    }
}
