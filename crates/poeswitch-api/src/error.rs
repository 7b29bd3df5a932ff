use thiserror::Error;

/// Top-level error type for the `poeswitch-api` crate.
///
/// Separates transport failures (retried inside the client) from
/// application-level rejections the caller has to react to: an expired
/// session, a login conflict, or a body that does not carry the expected
/// script variables. `poeswitch-core` maps these into cycle-level errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login POST did not produce a session token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Another browser or client still holds the device's single session.
    #[error("Login rejected: another session is logged in already")]
    SessionConflict,

    /// The device served its login form instead of the requested data.
    #[error("Session expired -- login required")]
    LoginRequired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status that persisted across all attempts.
    #[error("HTTP {status} from {path}")]
    HttpStatus { status: u16, path: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The underlying `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    // ── Data ────────────────────────────────────────────────────────
    /// A required script variable was missing or unparseable.
    #[error("Malformed response from {endpoint}: missing or invalid `{field}`")]
    MalformedResponse {
        endpoint: &'static str,
        field: &'static str,
    },
}

impl Error {
    /// Returns `true` if the session is gone and a fresh login may help.
    pub fn is_login_required(&self) -> bool {
        matches!(self, Self::LoginRequired)
    }
}
