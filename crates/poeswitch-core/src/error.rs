// ── Core error types ──
//
// Errors surfaced by the coordinator. Transport detail is folded into
// a few domain-level variants; the cycle wrappers add how many attempts
// were spent before giving up.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection / session ─────────────────────────────────────────
    #[error("Cannot reach switch at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Another session is logged in to the switch")]
    SessionConflict,

    #[error("Session expired and re-login did not restore it")]
    LoginRequired,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Port {index} not found")]
    UnknownPort { index: u32 },

    #[error("Port {index} is not a PoE port")]
    NotPoePort { index: u32 },

    #[error("No device state fetched yet -- refresh first")]
    NotReady,

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Unsupported switch model '{model}'")]
    UnsupportedModel { model: String },

    #[error("Failed to refresh switch state after {attempts} attempt(s): {source}")]
    RefreshFailed {
        attempts: u32,
        #[source]
        source: Box<CoreError>,
    },

    #[error("Failed to change switch state after {attempts} attempt(s): {source}")]
    ChangeFailed {
        attempts: u32,
        #[source]
        source: Box<CoreError>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Errors the bounded retry wrappers must not repeat.
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedModel { .. } | Self::NotReady | Self::Config { .. }
        )
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<poeswitch_api::Error> for CoreError {
    fn from(err: poeswitch_api::Error) -> Self {
        use poeswitch_api::Error as Api;
        match err {
            Api::Authentication { message } => CoreError::AuthenticationFailed { message },
            Api::SessionConflict => CoreError::SessionConflict,
            Api::LoginRequired => CoreError::LoginRequired,
            Api::Transport(ref e) => CoreError::ConnectionFailed {
                url: e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string),
                reason: e.to_string(),
            },
            Api::HttpStatus { status, path } => CoreError::ConnectionFailed {
                url: path,
                reason: format!("HTTP {status}"),
            },
            Api::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid switch address: {e}"),
            },
            Api::Client(message) => CoreError::Config { message },
            Api::MalformedResponse { .. } => CoreError::MalformedResponse {
                message: err.to_string(),
            },
        }
    }
}
