use thiserror::Error;

use crate::mail::HostError;

/// Errors that end an analysis chain
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The host could not supply the message body; logged only
    #[error("Failed to get email body: {0}")]
    HostRead(#[from] HostError),

    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Response did not contain a conversationId")]
    MissingConversationId,

    #[error("Job {0} failed")]
    JobFailed(String),

    #[error("Job {job_id} still {status}")]
    JobNotReady { job_id: String, status: String },

    #[error("Credentials unavailable: {0}")]
    Credentials(String),
}

impl AnalysisError {
    /// Whether a user-visible alert accompanies this failure
    pub fn alerts_user(&self) -> bool {
        !matches!(self, AnalysisError::HostRead(_))
    }
}
