//! Analysis actor: the command surface the pane's buttons are bound to

use tokio::sync::mpsc;

use super::error::AnalysisError;
use super::kind::AnalysisKind;
use super::pipeline::{AnalysisContext, analyze_text, run_analysis};

/// Commands that can be sent to the analysis actor
#[derive(Debug)]
pub enum AnalysisCommand {
    /// Analyze the current message
    Run { kind: AnalysisKind },
    /// Run sentiment analysis on manually entered text
    SubmitText { text: String },
    /// Shutdown the actor
    Shutdown,
}

/// Events emitted when a chain finishes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisEvent {
    Rendered { kind: AnalysisKind },
    Failed { kind: AnalysisKind, error: String },
    /// The host could not supply the body; nothing was shown
    HostReadFailed { kind: AnalysisKind },
}

impl AnalysisEvent {
    pub fn kind(&self) -> AnalysisKind {
        match self {
            AnalysisEvent::Rendered { kind }
            | AnalysisEvent::Failed { kind, .. }
            | AnalysisEvent::HostReadFailed { kind } => *kind,
        }
    }
}

/// Handle for communicating with the analysis actor
pub struct AnalysisActorHandle {
    pub cmd_tx: mpsc::Sender<AnalysisCommand>,
    pub event_rx: mpsc::Receiver<AnalysisEvent>,
}

/// Spawn the analysis actor task
pub fn spawn_analysis_actor(ctx: AnalysisContext) -> AnalysisActorHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(32);

    tokio::spawn(analysis_actor_loop(ctx, cmd_rx, event_tx));

    AnalysisActorHandle { cmd_tx, event_rx }
}

async fn analysis_actor_loop(
    ctx: AnalysisContext,
    mut cmd_rx: mpsc::Receiver<AnalysisCommand>,
    event_tx: mpsc::Sender<AnalysisEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        // Each chain runs independently and cannot be cancelled once started
        match cmd {
            AnalysisCommand::Run { kind } => {
                let ctx = ctx.clone();
                let event_tx = event_tx.clone();
                tokio::spawn(async move {
                    let result = run_analysis(&ctx, kind).await;
                    send_event(&event_tx, kind, result).await;
                });
            }

            AnalysisCommand::SubmitText { text } => {
                let ctx = ctx.clone();
                let event_tx = event_tx.clone();
                let kind = AnalysisKind::Sentiment;
                tokio::spawn(async move {
                    let result = analyze_text(&ctx, kind, &text).await;
                    send_event(&event_tx, kind, result).await;
                });
            }

            AnalysisCommand::Shutdown => {
                break;
            }
        }
    }
}

async fn send_event(
    event_tx: &mpsc::Sender<AnalysisEvent>,
    kind: AnalysisKind,
    result: Result<(), AnalysisError>,
) {
    let event = match result {
        Ok(()) => AnalysisEvent::Rendered { kind },
        Err(AnalysisError::HostRead(_)) => AnalysisEvent::HostReadFailed { kind },
        Err(e) => AnalysisEvent::Failed {
            kind,
            error: e.to_string(),
        },
    };

    if event_tx.send(event).await.is_err() {
        tracing::warn!("Analysis actor: event receiver dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{SymblClient, WaitStrategy};
    use crate::mail::{Mailbox, MessageItem};
    use crate::notification::Alerts;
    use crate::oauth2::TokenProvider;
    use crate::ui::Panes;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context(server: &MockServer, body: &str) -> AnalysisContext {
        AnalysisContext {
            client: SymblClient::new(&server.uri(), None).unwrap(),
            tokens: Arc::new(TokenProvider::Static("t".to_string())),
            mailbox: Mailbox::new(MessageItem::from_text(body)),
            panes: Panes::new(),
            alerts: Alerts::new(false),
            wait: WaitStrategy::Fixed(Duration::from_millis(10)),
        }
    }

    #[tokio::test]
    async fn test_commands_run_independent_chains() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/process/text"))
            .and(body_partial_json(
                json!({"messages": [{"payload": {"content": "Is the demo ready?"}}]}),
            ))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"conversationId": "mail"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/process/text"))
            .and(body_partial_json(
                json!({"messages": [{"payload": {"content": "typed by hand"}}]}),
            ))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"conversationId": "form"})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/conversations/mail/questions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"questions": 1})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/conversations/form/topics"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"topics": 2})))
            .mount(&server)
            .await;

        let ctx = context(&server, "Is the demo ready?");
        let panes = ctx.panes.clone();
        let mut handle = spawn_analysis_actor(ctx);

        handle
            .cmd_tx
            .send(AnalysisCommand::Run {
                kind: AnalysisKind::Questions,
            })
            .await
            .unwrap();
        handle
            .cmd_tx
            .send(AnalysisCommand::SubmitText {
                text: "typed by hand".to_string(),
            })
            .await
            .unwrap();

        let mut events = vec![
            handle.event_rx.recv().await.unwrap(),
            handle.event_rx.recv().await.unwrap(),
        ];
        events.sort_by_key(|e| e.kind().name());

        assert_eq!(
            events,
            vec![
                AnalysisEvent::Rendered {
                    kind: AnalysisKind::Questions
                },
                AnalysisEvent::Rendered {
                    kind: AnalysisKind::Sentiment
                },
            ]
        );
        assert!(panes.questions.content().contains("\"questions\": 1"));
        assert!(panes.sentiment.content().contains("\"topics\": 2"));

        handle.cmd_tx.send(AnalysisCommand::Shutdown).await.unwrap();
    }

    #[tokio::test]
    async fn test_host_read_failure_event() {
        let server = MockServer::start().await;
        let mut handle = spawn_analysis_actor(context(&server, ""));

        handle
            .cmd_tx
            .send(AnalysisCommand::Run {
                kind: AnalysisKind::ActionItems,
            })
            .await
            .unwrap();

        assert_eq!(
            handle.event_rx.recv().await.unwrap(),
            AnalysisEvent::HostReadFailed {
                kind: AnalysisKind::ActionItems
            }
        );
    }
}
