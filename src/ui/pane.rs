use std::sync::{Arc, Mutex};

use crate::analysis::AnalysisKind;
use crate::constants::{PANE_ACTION_ITEMS, PANE_CURRENT_EMAIL, PANE_QUESTIONS, PANE_SENTIMENT};

/// Handle to one named output region.
///
/// Clones share the same region; every write replaces the previous content.
#[derive(Debug, Clone)]
pub struct Pane {
    id: &'static str,
    content: Arc<Mutex<String>>,
}

impl Pane {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            content: Arc::new(Mutex::new(String::new())),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn set(&self, markup: impl Into<String>) {
        let mut content = self.content.lock().unwrap_or_else(|e| e.into_inner());
        *content = markup.into();
    }

    pub fn content(&self) -> String {
        self.content
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_empty(&self) -> bool {
        self.content
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}

/// The task pane's regions
#[derive(Debug, Clone)]
pub struct Panes {
    pub current_email: Pane,
    pub sentiment: Pane,
    pub action_items: Pane,
    pub questions: Pane,
}

impl Default for Panes {
    fn default() -> Self {
        Self::new()
    }
}

impl Panes {
    pub fn new() -> Self {
        Self {
            current_email: Pane::new(PANE_CURRENT_EMAIL),
            sentiment: Pane::new(PANE_SENTIMENT),
            action_items: Pane::new(PANE_ACTION_ITEMS),
            questions: Pane::new(PANE_QUESTIONS),
        }
    }

    /// The region owned by an analysis kind
    pub fn for_kind(&self, kind: AnalysisKind) -> &Pane {
        match kind {
            AnalysisKind::Sentiment => &self.sentiment,
            AnalysisKind::ActionItems => &self.action_items,
            AnalysisKind::Questions => &self.questions,
        }
    }

    /// All regions in display order
    pub fn all(&self) -> [&Pane; 4] {
        [
            &self.current_email,
            &self.sentiment,
            &self.action_items,
            &self.questions,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites() {
        let pane = Pane::new("questions");
        pane.set("first");
        pane.set("second");
        assert_eq!(pane.content(), "second");
    }

    #[test]
    fn test_clones_share_content() {
        let pane = Pane::new("questions");
        let other = pane.clone();
        other.set("shared");
        assert_eq!(pane.content(), "shared");
    }

    #[test]
    fn test_each_kind_owns_a_distinct_pane() {
        let panes = Panes::new();
        assert_eq!(panes.for_kind(AnalysisKind::Sentiment).id(), "sentiment-analysis");
        assert_eq!(panes.for_kind(AnalysisKind::ActionItems).id(), "action-items");
        assert_eq!(panes.for_kind(AnalysisKind::Questions).id(), "questions");

        panes.for_kind(AnalysisKind::ActionItems).set("done");
        assert!(panes.sentiment.is_empty());
        assert!(panes.questions.is_empty());
        assert!(panes.current_email.is_empty());
    }
}
