// Session authentication
//
// Cookie-based login/logout. A successful login POST leaves a `token`
// cookie in the client's jar; presence of that cookie is the only
// reliable success signal, since the firmware answers 200 either way.

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::client::{Form, SwitchClient, paths};
use crate::error::Error;
use crate::obfuscate;

/// Body fragment the firmware sends when another session is active.
const ALREADY_LOGGED_IN: &str = "logged in already";

impl SwitchClient {
    /// Authenticate with the switch.
    ///
    /// Returns immediately if a session token is already held. Otherwise
    /// POSTs the obfuscated password to `/login.cgi`.
    pub async fn login(&self, password: &SecretString) -> Result<(), Error> {
        if self.is_authenticated() {
            debug!("session token still held, skipping login");
            return Ok(());
        }

        debug!("logging in at {}", self.base_url());
        let form: Form = vec![(
            "password".into(),
            obfuscate::encode(password.expose_secret())?,
        )];
        let text = self.post(paths::LOGIN, &form).await?;

        if self.is_authenticated() {
            info!("logged in");
            return Ok(());
        }

        if text.contains(ALREADY_LOGGED_IN) {
            warn!("another session is still active on the switch");
            return Err(Error::SessionConflict);
        }

        let preview: String = text.chars().take(200).collect();
        Err(Error::Authentication {
            message: format!("no session token after login: {preview}"),
        })
    }

    /// End the current session.
    ///
    /// Best effort: failures are logged and swallowed, and the local token
    /// is dropped either way.
    pub async fn logout(&self) {
        info!("logging out");
        if let Err(e) = self.get(paths::LOGOUT).await {
            warn!(error = %e, "logout failed (non-fatal)");
        }
        self.clear_session();
    }
}
