// Switch HTTP client
//
// Wraps `reqwest::Client` with the device's URL layout, bounded retry,
// and login-page detection. Endpoint calls (status scripts, config
// writes) live in separate files as inherent methods so this module
// only deals with transport mechanics.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::cookie::SessionJar;
use crate::error::Error;
use crate::scrape::is_login_page;
use crate::transport::TransportConfig;

/// Device paths, relative to the switch root.
pub mod paths {
    pub const LOGIN: &str = "/login.cgi";
    pub const LOGOUT: &str = "/logout.html";
    pub const PORT_STATE: &str = "/port_state_data.js";
    pub const POWER: &str = "/poe_data.js";
    pub const SYSTEM: &str = "/system_data.js";
    pub const LINK: &str = "/link_data.js";
    pub const PORT_STATE_SET: &str = "/port_state_set.cgi";
    pub const LED_CONFIG: &str = "/led_cfg.cgi";
}

/// HTTP method subset the device understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// Form fields for a POST body, in submission order.
pub type Form = Vec<(String, String)>;

/// Raw HTTP client for one switch.
///
/// Owns the session cookie jar. Every call is retried on transport
/// failure or non-success status; a login form in place of data clears
/// the session and fails with [`Error::LoginRequired`].
pub struct SwitchClient {
    http: reqwest::Client,
    base_url: Url,
    jar: Arc<SessionJar>,
    max_attempts: u32,
    retry_delay: Duration,
}

impl SwitchClient {
    /// Create a client for `host`.
    ///
    /// A bare host (`192.168.1.3`, `switch.lan:8080`) is reached over plain
    /// HTTP; a value with an explicit scheme is used as given.
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let jar = config
            .cookie_jar
            .clone()
            .unwrap_or_else(|| Arc::new(SessionJar::default()));
        let http = config.build_client()?;

        Ok(Self {
            http,
            base_url: base_url(host)?,
            jar,
            max_attempts: config.attempts(),
            retry_delay: config.retry_delay,
        })
    }

    /// The switch base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a session token is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.jar.has_token()
    }

    /// Forget the session token.
    pub fn clear_session(&self) {
        self.jar.clear();
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url.join(path).map_err(Error::InvalidUrl)
    }

    /// Perform one logical request with bounded retry.
    ///
    /// Returns the response text. Transport errors and non-2xx statuses are
    /// retried up to the configured attempt count with a fixed pause; the
    /// last failure is returned once attempts run out.
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        form: Option<&Form>,
    ) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!(%method, path, "executing request");

        let mut last_err = None;
        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                debug!(%method, path, attempt, max = self.max_attempts, "retrying request");
                tokio::time::sleep(self.retry_delay).await;
            }

            let builder = match method {
                Method::Get => self.http.get(url.clone()),
                Method::Post => self.http.post(url.clone()).form(form.map_or(&[][..], Vec::as_slice)),
            };

            let resp = match builder.send().await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(%method, path, attempt, error = %e, "request failed");
                    last_err = Some(Error::Transport(e));
                    continue;
                }
            };

            let status = resp.status();
            debug!(%method, path, status = status.as_u16(), "response received");
            if !status.is_success() {
                warn!(%method, path, attempt, status = status.as_u16(), "unexpected status");
                last_err = Some(Error::HttpStatus {
                    status: status.as_u16(),
                    path: path.to_owned(),
                });
                continue;
            }

            let text = match resp.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(%method, path, attempt, error = %e, "failed to read body");
                    last_err = Some(Error::Transport(e));
                    continue;
                }
            };

            if checks_session(path) && is_login_page(&text) {
                debug!(path, "login form served instead of data");
                self.clear_session();
                return Err(Error::LoginRequired);
            }

            return Ok(text);
        }

        Err(last_err.unwrap_or_else(|| Error::HttpStatus {
            status: 0,
            path: path.to_owned(),
        }))
    }

    pub(crate) async fn get(&self, path: &str) -> Result<String, Error> {
        self.execute(Method::Get, path, None).await
    }

    pub(crate) async fn post(&self, path: &str, form: &Form) -> Result<String, Error> {
        self.execute(Method::Post, path, Some(form)).await
    }
}

/// Login and logout legitimately return the login page.
fn checks_session(path: &str) -> bool {
    path != paths::LOGIN && path != paths::LOGOUT
}

fn base_url(host: &str) -> Result<Url, Error> {
    let host = host.trim().trim_end_matches('/');
    let raw = if host.contains("://") {
        host.to_owned()
    } else {
        format!("http://{host}")
    };
    Ok(Url::parse(&raw)?)
}
