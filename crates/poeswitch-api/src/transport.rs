// Transport configuration for building the switch's reqwest::Client.
//
// Timeout and retry tuning live here so the client, the CLI, and tests
// all share one set of defaults. The device speaks plain HTTP only, so
// there is no TLS mode to configure.

use std::sync::Arc;
use std::time::Duration;

use crate::cookie::SessionJar;
use crate::error::Error;

/// Per-request timeout the device firmware tolerates.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Attempts per HTTP call before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Fixed pause between attempts. No growth, no jitter.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Transport configuration for a single switch connection.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub cookie_jar: Option<Arc<SessionJar>>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            cookie_jar: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("poeswitch/", env!("CARGO_PKG_VERSION")));

        if let Some(ref jar) = self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder.build().map_err(|e| Error::Client(e.to_string()))
    }

    /// Create a config with a fresh session jar.
    pub fn with_cookie_jar(mut self) -> Self {
        self.cookie_jar = Some(Arc::new(SessionJar::default()));
        self
    }

    /// Override the pause between attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Clamp to at least one attempt.
    pub(crate) fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
