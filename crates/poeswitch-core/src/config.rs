// ── Runtime switch configuration ──
//
// Describes *how* to talk to one switch: address, credential, polling
// cadence and retry tuning. Never touches disk; the CLI builds one from
// its config file and hands it in.

use std::time::Duration;

use poeswitch_api::TransportConfig;
use poeswitch_api::transport::{DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
use secrecy::SecretString;

use crate::error::CoreError;
use crate::hardware::HardwareProfile;

pub const MIN_SCAN_INTERVAL: Duration = Duration::from_secs(30);
pub const MAX_SCAN_INTERVAL: Duration = Duration::from_secs(300);
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(60);

/// Attempts per poll or change cycle.
pub const DEFAULT_CYCLE_ATTEMPTS: u32 = 2;

/// Configuration for one switch coordinator.
#[derive(Debug, Clone)]
pub struct SwitchConfig {
    /// Host name or address, optionally with scheme and port.
    pub host: String,
    pub password: SecretString,
    /// Friendly name; defaults to the host.
    pub name: Option<String>,
    /// Background poll period.
    pub scan_interval: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Attempts per HTTP call.
    pub http_attempts: u32,
    /// Attempts per poll or change cycle.
    pub cycle_attempts: u32,
    /// Pause between HTTP attempts and between cycle attempts.
    pub retry_delay: Duration,
    /// Extra model profiles, consulted before the built-ins.
    pub hardware: Vec<HardwareProfile>,
}

impl SwitchConfig {
    pub fn new(host: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            password,
            name: None,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            http_attempts: DEFAULT_MAX_ATTEMPTS,
            cycle_attempts: DEFAULT_CYCLE_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            hardware: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.host)
    }

    /// Reject values the coordinator cannot run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "switch host is empty".into(),
            });
        }
        if !(MIN_SCAN_INTERVAL..=MAX_SCAN_INTERVAL).contains(&self.scan_interval) {
            return Err(CoreError::Config {
                message: format!(
                    "scan interval {}s is outside {}..={}s",
                    self.scan_interval.as_secs(),
                    MIN_SCAN_INTERVAL.as_secs(),
                    MAX_SCAN_INTERVAL.as_secs()
                ),
            });
        }
        if self.cycle_attempts == 0 || self.http_attempts == 0 {
            return Err(CoreError::Config {
                message: "attempt counts must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            max_attempts: self.http_attempts,
            retry_delay: self.retry_delay,
            cookie_jar: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SwitchConfig {
        SwitchConfig::new("192.168.1.3", SecretString::from("1234".to_string()))
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = config();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.scan_interval, Duration::from_secs(60));
        assert_eq!(cfg.display_name(), "192.168.1.3");
    }

    #[test]
    fn scan_interval_bounds() {
        let mut cfg = config();
        cfg.scan_interval = Duration::from_secs(29);
        assert!(matches!(cfg.validate(), Err(CoreError::Config { .. })));
        cfg.scan_interval = Duration::from_secs(300);
        assert!(cfg.validate().is_ok());
        cfg.scan_interval = Duration::from_secs(301);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_host_rejected() {
        let mut cfg = config();
        cfg.host = "  ".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn name_overrides_host() {
        let mut cfg = config();
        cfg.name = Some("garage".into());
        assert_eq!(cfg.display_name(), "garage");
    }
}
