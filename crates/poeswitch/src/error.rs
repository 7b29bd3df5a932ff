//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use poeswitch_config::ConfigError;
use poeswitch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach switch at {url}")]
    #[diagnostic(
        code(poeswitch::connection_failed),
        help(
            "Check that the switch is powered and reachable ({reason}).\n\
             Try: poeswitch --host <address> status"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(poeswitch::auth_failed),
        help(
            "Verify the switch password ({message}).\n\
             Run: poeswitch config set-password"
        )
    )]
    AuthFailed { message: String },

    #[error("The switch already has an active session")]
    #[diagnostic(
        code(poeswitch::session_conflict),
        help(
            "The web interface allows one session at a time.\n\
             Log out in your browser or wait for the session to expire."
        )
    )]
    SessionConflict,

    #[error("No password configured for switch '{switch}'")]
    #[diagnostic(
        code(poeswitch::no_password),
        help(
            "Run: poeswitch config set-password {switch}\n\
             Or set POESWITCH_PASSWORD."
        )
    )]
    NoPassword { switch: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(poeswitch::not_found),
        help("Run: poeswitch {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("Switch model '{model}' is not supported")]
    #[diagnostic(
        code(poeswitch::unsupported_model),
        help(
            "Add a profile for it to config.toml:\n\n\
             [[hardware]]\n\
             model = \"{model}\"\n\
             ports = <port count>\n\
             all_ports_enabled = <2^ports - 1>"
        )
    )]
    UnsupportedModel { model: String },

    // ── Device ───────────────────────────────────────────────────────
    #[error("Switch error: {message}")]
    #[diagnostic(code(poeswitch::device))]
    Device { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(poeswitch::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Switch '{name}' not found in configuration")]
    #[diagnostic(
        code(poeswitch::switch_not_found),
        help("Available switches: {available}")
    )]
    SwitchNotFound { name: String, available: String },

    #[error("No switch configured")]
    #[diagnostic(
        code(poeswitch::no_config),
        help(
            "Add a [switches.<name>] section to {path}\n\
             or pass --host and --password."
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(poeswitch::config))]
    Config { message: String },

    #[error("Keyring error: {reason}")]
    #[diagnostic(code(poeswitch::keyring))]
    Keyring { reason: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoPassword { .. } => exit_code::AUTH,
            Self::SessionConflict => exit_code::CONFLICT,
            Self::NotFound { .. } | Self::SwitchNotFound { .. } => exit_code::NOT_FOUND,
            Self::UnsupportedModel { .. } => exit_code::UNSUPPORTED,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::LoginRequired => CliError::AuthFailed {
                message: "session expired and could not be renewed".into(),
            },

            CoreError::SessionConflict => CliError::SessionConflict,

            CoreError::UnknownPort { index } => CliError::NotFound {
                resource_type: "port".into(),
                identifier: index.to_string(),
                list_command: "ports".into(),
            },

            CoreError::NotPoePort { index } => CliError::Validation {
                field: "port".into(),
                reason: format!("port {index} has no PoE output"),
            },

            CoreError::UnsupportedModel { model } => CliError::UnsupportedModel { model },

            // Report the underlying cause; attempt counts are in the logs.
            CoreError::RefreshFailed { source, .. } | CoreError::ChangeFailed { source, .. } => {
                CliError::from(*source)
            }

            CoreError::MalformedResponse { message } => CliError::Device { message },

            CoreError::NotReady => CliError::Device {
                message: "no state fetched from the switch yet".into(),
            },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownSwitch { name } => CliError::SwitchNotFound {
                name,
                available: "(run: poeswitch config show)".into(),
            },
            ConfigError::NoSwitchSelected => CliError::NoConfig {
                path: poeswitch_config::config_path().display().to_string(),
            },
            ConfigError::NoPassword { switch } => CliError::NoPassword { switch },
            ConfigError::Keyring(e) => CliError::Keyring {
                reason: e.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other @ (ConfigError::Serialization(_) | ConfigError::Figment(_)) => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
