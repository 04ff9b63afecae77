//! User-visible failure alerts

use std::sync::{Arc, Mutex};

/// Collects alerts raised by analysis chains.
///
/// Every alert is logged; the CLI prints collected alerts to stderr once the
/// chains finish, and optionally mirrors them as desktop notifications.
#[derive(Debug, Clone, Default)]
pub struct Alerts {
    raised: Arc<Mutex<Vec<String>>>,
    desktop: bool,
}

impl Alerts {
    pub fn new(desktop: bool) -> Self {
        Self {
            raised: Arc::new(Mutex::new(Vec::new())),
            desktop,
        }
    }

    pub fn raise(&self, message: &str) {
        tracing::error!("Alert: {}", message);
        self.raised
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());

        if self.desktop {
            notify_desktop(message);
        }
    }

    pub fn raised(&self) -> Vec<String> {
        self.raised
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    #[cfg(test)]
    pub fn count(&self) -> usize {
        self.raised.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(feature = "notifications")]
fn notify_desktop(message: &str) {
    // Fire and forget, don't block on errors
    if let Err(e) = send_notification("mailsense", message) {
        tracing::warn!("Failed to send desktop notification: {}", e);
    }
}

#[cfg(not(feature = "notifications"))]
fn notify_desktop(_message: &str) {
    tracing::debug!("Desktop alerts requested but notifications feature is disabled");
}

/// Low-level notification sending
#[cfg(feature = "notifications")]
fn send_notification(summary: &str, body: &str) -> Result<(), notify_rust::error::Error> {
    use notify_rust::Notification;

    Notification::new()
        .summary(summary)
        .body(body)
        .appname("mailsense")
        .icon("dialog-error")
        .timeout(notify_rust::Timeout::Milliseconds(
            crate::constants::ALERT_NOTIFICATION_TIMEOUT_MS,
        ))
        .show()?;
    Ok(())
}
