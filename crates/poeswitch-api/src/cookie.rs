// Session cookie store
//
// `reqwest::cookie::Jar` cannot forget cookies, but the device's session
// has to be dropped the moment a response shows the login form again.
// `CookieStoreMutex` wraps the same RFC 6265 store the jar uses and
// exposes `clear()`.

use std::fmt;

use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest_cookie_store::CookieStoreMutex;
use tracing::{debug, trace, warn};
use url::Url;

/// Name of the cookie the firmware sets after a successful login.
pub const SESSION_COOKIE: &str = "token";

/// Clearable cookie store holding the device session.
#[derive(Default)]
pub struct SessionJar {
    store: CookieStoreMutex,
}

impl SessionJar {
    /// Whether an unexpired, non-empty session token is currently held.
    pub fn has_token(&self) -> bool {
        self.store
            .lock()
            .expect("cookie lock poisoned")
            .iter_unexpired()
            .any(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
    }

    /// Drop every cookie, returning the session to `Unauthenticated`.
    pub fn clear(&self) {
        debug!("clearing session cookies");
        self.store.lock().expect("cookie lock poisoned").clear();
    }

    /// Store one `Set-Cookie` header value received from `url`.
    ///
    /// An already-expired cookie (`Max-Age=0` or a past `Expires`) evicts
    /// the matching stored one.
    pub fn store(&self, set_cookie: &str, url: &Url) {
        let mut store = self.store.lock().expect("cookie lock poisoned");
        match store.parse(set_cookie, url) {
            Ok(_) => trace!("cookie stored"),
            Err(e) => warn!(error = %e, "ignoring unusable Set-Cookie header"),
        }
    }
}

impl fmt::Debug for SessionJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionJar")
            .field("has_token", &self.has_token())
            .finish()
    }
}

impl CookieStore for SessionJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        for header in cookie_headers {
            if let Ok(raw) = header.to_str() {
                self.store(raw, url);
            }
        }
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        CookieStore::cookies(&self.store, url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn device() -> Url {
        Url::parse("http://192.168.1.3/login.cgi").unwrap()
    }

    fn request_header(jar: &SessionJar, path: &str) -> Option<String> {
        let url = device().join(path).unwrap();
        jar.cookies(&url).map(|h| h.to_str().unwrap().to_owned())
    }

    #[test]
    fn stores_and_clears_token() {
        let jar = SessionJar::default();
        assert!(!jar.has_token());

        jar.store("token=abc123; path=/", &device());
        assert!(jar.has_token());
        assert_eq!(
            request_header(&jar, "/port_state_data.js").as_deref(),
            Some("token=abc123")
        );

        jar.clear();
        assert!(!jar.has_token());
        assert!(request_header(&jar, "/port_state_data.js").is_none());
    }

    #[test]
    fn past_expiry_drops_token() {
        let jar = SessionJar::default();
        jar.store("token=abc; path=/", &device());
        jar.store(
            "token=deleted; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/",
            &device(),
        );
        assert!(!jar.has_token());
        assert!(request_header(&jar, "/").is_none());
    }

    #[test]
    fn zero_max_age_drops_token() {
        let jar = SessionJar::default();
        jar.store("token=abc; path=/", &device());
        jar.store("token=abc; Max-Age=0; path=/", &device());
        assert!(!jar.has_token());
    }

    #[test]
    fn empty_token_is_not_a_session() {
        let jar = SessionJar::default();
        jar.store("token=; path=/", &device());
        assert!(!jar.has_token());
    }

    #[test]
    fn foreign_domain_is_rejected() {
        let jar = SessionJar::default();
        jar.store("token=abc; domain=example.com; path=/", &device());
        assert!(!jar.has_token());
    }

    #[test]
    fn ignores_garbage_headers() {
        let jar = SessionJar::default();
        jar.store("no-equals-sign", &device());
        assert!(request_header(&jar, "/").is_none());
    }

    #[test]
    fn sends_every_cookie_for_the_path() {
        let jar = SessionJar::default();
        jar.store("lang=en; path=/", &device());
        jar.store("token=t1; path=/", &device());
        let header = request_header(&jar, "/system_data.js").unwrap();
        assert!(header.contains("lang=en"));
        assert!(header.contains("token=t1"));
    }
}
