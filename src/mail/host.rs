//! Host-side access to the current message.
//!
//! The host delivers the body through a callback carrying a status field.
//! [`Mailbox::read_body`] bridges that into a future so the analysis
//! pipeline can be written as straight-line async code.

use std::sync::Arc;
use tokio::sync::oneshot;

use super::types::{BodyFormat, MessageItem};

/// Failure reported by the host accessor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    pub message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncResultStatus {
    Succeeded,
    Failed,
}

/// Result handed to a host callback
#[derive(Debug, Clone)]
pub struct AsyncResult<T> {
    pub status: AsyncResultStatus,
    pub value: Option<T>,
    pub error: Option<HostError>,
}

impl<T> AsyncResult<T> {
    fn succeeded(value: T) -> Self {
        Self {
            status: AsyncResultStatus::Succeeded,
            value: Some(value),
            error: None,
        }
    }

    fn failed(error: HostError) -> Self {
        Self {
            status: AsyncResultStatus::Failed,
            value: None,
            error: Some(error),
        }
    }
}

/// Handle to the message currently open in the host
#[derive(Debug, Clone)]
pub struct Mailbox {
    item: Arc<MessageItem>,
}

impl Mailbox {
    pub fn new(item: MessageItem) -> Self {
        Self {
            item: Arc::new(item),
        }
    }

    /// Request the body; `callback` runs later on the runtime, never inline
    pub fn get_body_async<F>(&self, format: BodyFormat, callback: F)
    where
        F: FnOnce(AsyncResult<String>) + Send + 'static,
    {
        let item = Arc::clone(&self.item);
        tokio::spawn(async move {
            let result = match item.body(format) {
                Some(body) if !body.trim().is_empty() => AsyncResult::succeeded(body),
                Some(_) => AsyncResult::failed(HostError::new("Message body is empty")),
                None => AsyncResult::failed(HostError::new("Message has no body")),
            };
            callback(result);
        });
    }

    /// Await the body, branching on the callback status
    pub async fn read_body(&self, format: BodyFormat) -> Result<String, HostError> {
        let (tx, rx) = oneshot::channel();
        self.get_body_async(format, move |result| {
            let _ = tx.send(result);
        });

        let result = rx
            .await
            .map_err(|_| HostError::new("Host dropped the body request"))?;

        match result.status {
            AsyncResultStatus::Succeeded => result
                .value
                .ok_or_else(|| HostError::new("Host reported success without a body")),
            AsyncResultStatus::Failed => Err(result
                .error
                .unwrap_or_else(|| HostError::new("Host reported failure"))),
        }
    }
}
