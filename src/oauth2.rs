//! Bearer tokens for the Symbl API
//!
//! A token is either supplied directly or generated from application
//! credentials through the token endpoint. Generated tokens are cached and
//! regenerated shortly before they expire.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::analysis::AnalysisError;
use crate::constants::{TOKEN_GENERATE_PATH, TOKEN_REFRESH_MARGIN_SECS};

#[derive(Serialize)]
struct TokenRequest<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "appId")]
    app_id: &'a str,
    #[serde(rename = "appSecret")]
    app_secret: &'a str,
}

/// Response from the token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedToken {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + ChronoDuration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

/// Application credentials exchanged for short-lived access tokens
pub struct AppCredentials {
    http_client: reqwest::Client,
    token_url: String,
    app_id: String,
    app_secret: String,
    cached: Mutex<Option<CachedToken>>,
}

impl AppCredentials {
    pub fn new(base_url: &str, app_id: &str, app_secret: &str) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            token_url: format!("{}{}", base_url.trim_end_matches('/'), TOKEN_GENERATE_PATH),
            app_id: app_id.to_string(),
            app_secret: app_secret.to_string(),
            cached: Mutex::new(None),
        }
    }

    async fn generate(&self) -> Result<GeneratedToken, AnalysisError> {
        let request = TokenRequest {
            kind: "application",
            app_id: &self.app_id,
            app_secret: &self.app_secret,
        };

        let response = self
            .http_client
            .post(&self.token_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Credentials(format!(
                "token generation failed ({}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn access_token(&self) -> Result<String, AnalysisError> {
        // Held across generation so concurrent chains share one request
        let mut cached = self.cached.lock().await;

        let now = Utc::now();
        if let Some(token) = cached.as_ref()
            && token.is_fresh(now)
        {
            return Ok(token.access_token.clone());
        }

        tracing::debug!("Generating access token for app {}", self.app_id);
        let generated = self.generate().await?;
        let expires_at = ChronoDuration::try_seconds(generated.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AnalysisError::Credentials(format!(
                    "token lifetime out of range: {}s",
                    generated.expires_in
                ))
            })?;
        let token = CachedToken {
            access_token: generated.access_token,
            expires_at,
        };
        let access_token = token.access_token.clone();
        *cached = Some(token);

        Ok(access_token)
    }
}

/// Source of the bearer token attached to every API request
pub enum TokenProvider {
    Static(String),
    App(AppCredentials),
}

impl TokenProvider {
    pub async fn bearer(&self) -> Result<String, AnalysisError> {
        match self {
            TokenProvider::Static(token) => Ok(token.clone()),
            TokenProvider::App(app) => app.access_token().await,
        }
    }
}
