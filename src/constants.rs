//! Application-wide constants for endpoints, timing and pane markup
//!
//! Centralizes magic values to make them discoverable and configurable.

/// Base URL of the Symbl API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.symbl.ai";

/// Path of the "start analysis" endpoint for plain text.
pub const PROCESS_TEXT_PATH: &str = "/v1/process/text";

/// Path of the application token endpoint.
pub const TOKEN_GENERATE_PATH: &str = "/oauth2/token:generate";

/// Fixed delay in milliseconds between submission and the single poll.
/// The backend gives no readiness signal; this is best-effort demo timing.
pub const POLL_DELAY_MS: u64 = 3000;

/// Initial backoff delay for the job-status wait, in milliseconds.
pub const JOB_STATUS_INITIAL_DELAY_MS: u64 = 500;

/// Maximum backoff delay for the job-status wait, in milliseconds.
pub const JOB_STATUS_MAX_DELAY_MS: u64 = 8000;

/// Maximum number of job-status checks before giving up.
pub const JOB_STATUS_MAX_ATTEMPTS: u32 = 10;

/// Access tokens are regenerated this many seconds before they expire.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Generic user-visible failure notice.
pub const ALERT_MESSAGE: &str = "An error occurred while submitting the form.";

/// Interim markup written once a submission has been accepted.
pub const PROCESSING_MARKUP: &str = "<b>Processing...</b>";

/// Desktop notification timeout for alerts in milliseconds.
pub const ALERT_NOTIFICATION_TIMEOUT_MS: u32 = 5000;

// === Pane identifiers ===

pub const PANE_CURRENT_EMAIL: &str = "currentEmail";
pub const PANE_SENTIMENT: &str = "sentiment-analysis";
pub const PANE_ACTION_ITEMS: &str = "action-items";
pub const PANE_QUESTIONS: &str = "questions";

/// Default wrap width when panes are printed as terminal text.
pub const DEFAULT_OUTPUT_WIDTH: usize = 100;
