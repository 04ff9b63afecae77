//! Symbl text-analytics API client

use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::error::AnalysisError;
use super::kind::AnalysisKind;
use super::payload::AnalysisRequest;
use crate::constants::PROCESS_TEXT_PATH;

/// Handle to a submitted conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub conversation_id: String,
    pub job_id: Option<String>,
}

/// Processing state of a submitted job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    Failed,
    Pending(String),
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(rename = "conversationId")]
    conversation_id: Option<String>,
    #[serde(rename = "jobId")]
    job_id: Option<String>,
}

#[derive(Deserialize)]
struct JobStatusResponse {
    status: String,
}

/// Client for the process-text and conversation endpoints.
///
/// Bodies are parsed as JSON whatever the HTTP status; requests are never retried.
#[derive(Clone)]
pub struct SymblClient {
    client: Client,
    base_url: String,
}

impl SymblClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, AnalysisError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Start an analysis job for the given payload
    pub async fn submit(
        &self,
        payload: &AnalysisRequest,
        token: &str,
    ) -> Result<JobHandle, AnalysisError> {
        let url = format!("{}{}", self.base_url, PROCESS_TEXT_PATH);

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .bearer_auth(token)
            .json(payload)
            .send()
            .await?;

        tracing::debug!("POST {} -> {}", url, response.status());

        let body = response.text().await?;
        let data: SubmitResponse = serde_json::from_str(&body)?;

        let conversation_id = data
            .conversation_id
            .ok_or(AnalysisError::MissingConversationId)?;

        Ok(JobHandle {
            conversation_id,
            job_id: data.job_id,
        })
    }

    /// Single GET of the result endpoint for `kind`
    pub async fn fetch_result(
        &self,
        handle: &JobHandle,
        kind: AnalysisKind,
        token: &str,
    ) -> Result<Value, AnalysisError> {
        let url = format!(
            "{}{}",
            self.base_url,
            kind.result_path(&handle.conversation_id)
        );

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        tracing::debug!("GET {} -> {}", url, response.status());

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Current status of a processing job
    pub async fn job_status(&self, job_id: &str, token: &str) -> Result<JobStatus, AnalysisError> {
        let url = format!("{}/v1/job/{}", self.base_url, job_id);

        let response = self.client.get(&url).bearer_auth(token).send().await?;
        let body = response.text().await?;
        let data: JobStatusResponse = serde_json::from_str(&body)?;

        Ok(match data.status.as_str() {
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Pending(data.status),
        })
    }
}
