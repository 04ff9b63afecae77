//! One analysis chain: host read, submit, wait, poll, render.

use std::sync::Arc;
use std::time::Duration;

use super::client::{JobHandle, JobStatus, SymblClient};
use super::error::AnalysisError;
use super::kind::AnalysisKind;
use super::payload::build_payload;
use crate::actor::{RetryConfig, with_retry};
use crate::config::{PollConfig, PollStrategy};
use crate::constants::ALERT_MESSAGE;
use crate::mail::{BodyFormat, Mailbox};
use crate::notification::Alerts;
use crate::oauth2::TokenProvider;
use crate::ui::{Pane, Panes, render_processing, render_result};

/// How a chain waits between submission and the result poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitStrategy {
    Fixed(Duration),
    /// Check job status with backoff; `fallback` applies when no job id came back
    UntilReady {
        fallback: Duration,
        retry: RetryConfig,
    },
}

impl WaitStrategy {
    pub fn from_config(poll: &PollConfig) -> Self {
        match poll.strategy {
            PollStrategy::Fixed => WaitStrategy::Fixed(poll.delay()),
            PollStrategy::UntilReady => WaitStrategy::UntilReady {
                fallback: poll.delay(),
                retry: RetryConfig::new(
                    poll.max_attempts.saturating_sub(1),
                    Duration::from_millis(poll.initial_delay_ms),
                    Duration::from_millis(poll.max_delay_ms),
                ),
            },
        }
    }
}

/// Everything a chain needs; cheap to clone into spawned tasks
#[derive(Clone)]
pub struct AnalysisContext {
    pub client: SymblClient,
    pub tokens: Arc<TokenProvider>,
    pub mailbox: Mailbox,
    pub panes: Panes,
    pub alerts: Alerts,
    pub wait: WaitStrategy,
}

/// Analyze the current message body.
///
/// A host read failure is logged and leaves every pane untouched.
pub async fn run_analysis(ctx: &AnalysisContext, kind: AnalysisKind) -> Result<(), AnalysisError> {
    let text = match ctx.mailbox.read_body(BodyFormat::Text).await {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to get email body: {}", e);
            return Err(e.into());
        }
    };

    analyze_text(ctx, kind, &text).await
}

/// Analyze arbitrary text, writing into the pane owned by `kind`.
///
/// Any failure is logged and raises one alert; the pane keeps whatever it
/// showed when the chain stopped.
pub async fn analyze_text(
    ctx: &AnalysisContext,
    kind: AnalysisKind,
    text: &str,
) -> Result<(), AnalysisError> {
    let pane = ctx.panes.for_kind(kind);
    let result = run_chain(ctx, kind, text, pane).await;

    if let Err(ref e) = result {
        tracing::error!("{} analysis failed: {}", kind, e);
        if e.alerts_user() {
            ctx.alerts.raise(ALERT_MESSAGE);
        }
    }

    result
}

async fn run_chain(
    ctx: &AnalysisContext,
    kind: AnalysisKind,
    text: &str,
    pane: &Pane,
) -> Result<(), AnalysisError> {
    let token = ctx.tokens.bearer().await?;
    let payload = build_payload(text);

    let handle = ctx.client.submit(&payload, &token).await?;
    pane.set(render_processing());
    tracing::info!(
        "{}: submitted, conversationId {}",
        kind,
        handle.conversation_id
    );

    wait_for_result(ctx, &handle, &token).await?;

    // The wait may outlast a generated token
    let token = ctx.tokens.bearer().await?;
    let value = ctx.client.fetch_result(&handle, kind, &token).await?;

    pane.set(render_result(kind, &value));
    tracing::info!("{}: rendered into {}", kind, pane.id());
    Ok(())
}

async fn wait_for_result(
    ctx: &AnalysisContext,
    handle: &JobHandle,
    token: &str,
) -> Result<(), AnalysisError> {
    match &ctx.wait {
        WaitStrategy::Fixed(delay) => {
            tokio::time::sleep(*delay).await;
            Ok(())
        }
        WaitStrategy::UntilReady { fallback, retry } => match &handle.job_id {
            Some(job_id) => wait_until_ready(&ctx.client, job_id, token, retry).await,
            None => {
                tracing::warn!("No jobId returned, falling back to a fixed delay");
                tokio::time::sleep(*fallback).await;
                Ok(())
            }
        },
    }
}

async fn wait_until_ready(
    client: &SymblClient,
    job_id: &str,
    token: &str,
    retry: &RetryConfig,
) -> Result<(), AnalysisError> {
    with_retry(
        retry,
        |e: &AnalysisError| matches!(e, AnalysisError::JobNotReady { .. }),
        move || async move {
            match client.job_status(job_id, token).await? {
                JobStatus::Completed => Ok(()),
                JobStatus::Failed => Err(AnalysisError::JobFailed(job_id.to_string())),
                JobStatus::Pending(status) => Err(AnalysisError::JobNotReady {
                    job_id: job_id.to_string(),
                    status,
                }),
            }
        },
    )
    .await
}
