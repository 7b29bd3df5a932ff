//! Configuration for the poeswitch CLI.
//!
//! TOML switch profiles, password resolution (env + keyring + plaintext),
//! and translation to `poeswitch_core::SwitchConfig`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use poeswitch_core::config::{DEFAULT_SCAN_INTERVAL, MAX_SCAN_INTERVAL, MIN_SCAN_INTERVAL};
use poeswitch_core::{HardwareProfile, SwitchConfig};

/// Keyring service name; entries are keyed `<switch>/password`.
pub const KEYRING_SERVICE: &str = "poeswitch";

/// Environment variable consulted after a profile's own `password_env`.
pub const PASSWORD_ENV: &str = "POESWITCH_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no switch named '{name}' in config")]
    UnknownSwitch { name: String },

    #[error("no switch selected and no default_switch configured")]
    NoSwitchSelected,

    #[error("no password configured for switch '{switch}'")]
    NoPassword { switch: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Switch used when `--switch` is not given.
    pub default_switch: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named switch profiles.
    #[serde(default)]
    pub switches: BTreeMap<String, SwitchProfile>,

    /// Extra model profiles, consulted before the built-in table.
    #[serde(default)]
    pub hardware: Vec<HardwareProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Background poll period in seconds.
    #[serde(default = "default_scan_interval")]
    pub scan_interval: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            scan_interval: default_scan_interval(),
            timeout: default_timeout(),
        }
    }
}

fn default_scan_interval() -> u64 {
    DEFAULT_SCAN_INTERVAL.as_secs()
}
fn default_timeout() -> u64 {
    5
}

/// A named switch.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SwitchProfile {
    /// Address, e.g. "192.168.1.3" or "http://switch.lan:8080".
    pub host: String,

    /// Display name; defaults to the host.
    pub name: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// Override the default scan interval.
    pub scan_interval: Option<u64>,

    /// Override the default timeout.
    pub timeout: Option<u64>,
}

impl Config {
    /// Pick a switch: the explicit name, else `default_switch`, else the
    /// only configured switch.
    pub fn switch(&self, name: Option<&str>) -> Result<(&str, &SwitchProfile), ConfigError> {
        let name = match name.or(self.default_switch.as_deref()) {
            Some(name) => name,
            None if self.switches.len() == 1 => {
                return self
                    .switches
                    .iter()
                    .next()
                    .map(|(n, p)| (n.as_str(), p))
                    .ok_or(ConfigError::NoSwitchSelected);
            }
            None => return Err(ConfigError::NoSwitchSelected),
        };

        self.switches
            .get_key_value(name)
            .map(|(n, p)| (n.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownSwitch { name: name.into() })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "poeswitch", "poeswitch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("poeswitch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load Config from `path` + environment. A missing file yields defaults.
///
/// Environment keys use `__` for nesting, e.g.
/// `POESWITCH_DEFAULTS__SCAN_INTERVAL=120`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("POESWITCH_").ignore(&["PASSWORD"]).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Password resolution ─────────────────────────────────────────────

pub fn keyring_entry(switch_name: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{switch_name}/password"),
    )?)
}

/// Resolve a switch password from the credential chain.
pub fn resolve_password(
    profile: &SwitchProfile,
    switch_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring_entry(switch_name) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoPassword {
        switch: switch_name.into(),
    })
}

/// Build a `SwitchConfig` for a named profile.
pub fn switch_to_config(cfg: &Config, switch_name: &str) -> Result<SwitchConfig, ConfigError> {
    let profile = cfg
        .switches
        .get(switch_name)
        .ok_or_else(|| ConfigError::UnknownSwitch {
            name: switch_name.into(),
        })?;
    let password = resolve_password(profile, switch_name)?;
    profile_to_switch_config(cfg, profile, password)
}

/// Build a `SwitchConfig` from a profile and an already-resolved password.
pub fn profile_to_switch_config(
    cfg: &Config,
    profile: &SwitchProfile,
    password: SecretString,
) -> Result<SwitchConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }

    let scan_interval =
        Duration::from_secs(profile.scan_interval.unwrap_or(cfg.defaults.scan_interval));
    if !(MIN_SCAN_INTERVAL..=MAX_SCAN_INTERVAL).contains(&scan_interval) {
        return Err(ConfigError::Validation {
            field: "scan_interval".into(),
            reason: format!(
                "{}s is outside {}..={}s",
                scan_interval.as_secs(),
                MIN_SCAN_INTERVAL.as_secs(),
                MAX_SCAN_INTERVAL.as_secs()
            ),
        });
    }

    let timeout = profile.timeout.unwrap_or(cfg.defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }

    let mut switch = SwitchConfig::new(profile.host.clone(), password);
    switch.name.clone_from(&profile.name);
    switch.scan_interval = scan_interval;
    switch.timeout = Duration::from_secs(timeout);
    switch.hardware.clone_from(&cfg.hardware);
    Ok(switch)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn profile(host: &str) -> SwitchProfile {
        SwitchProfile {
            host: host.into(),
            ..SwitchProfile::default()
        }
    }

    fn config_with(names: &[&str]) -> Config {
        let mut cfg = Config::default();
        for name in names {
            cfg.switches.insert((*name).into(), profile("192.168.1.3"));
        }
        cfg
    }

    #[test]
    fn explicit_switch_wins() {
        let mut cfg = config_with(&["garage", "office"]);
        cfg.default_switch = Some("garage".into());
        assert_eq!(cfg.switch(Some("office")).unwrap().0, "office");
        assert_eq!(cfg.switch(None).unwrap().0, "garage");
    }

    #[test]
    fn single_switch_is_implicit() {
        let cfg = config_with(&["garage"]);
        assert_eq!(cfg.switch(None).unwrap().0, "garage");
    }

    #[test]
    fn ambiguous_or_unknown_switch() {
        let cfg = config_with(&["garage", "office"]);
        assert!(matches!(cfg.switch(None), Err(ConfigError::NoSwitchSelected)));
        assert!(matches!(
            cfg.switch(Some("attic")),
            Err(ConfigError::UnknownSwitch { .. })
        ));
    }

    #[test]
    fn profile_overrides_defaults() {
        let mut cfg = Config::default();
        cfg.hardware.push(HardwareProfile::new("GS1900", 8, 255));
        let mut p = profile("switch.lan");
        p.name = Some("Garage".into());
        p.scan_interval = Some(120);

        let sc = profile_to_switch_config(&cfg, &p, SecretString::from("pw".to_string())).unwrap();
        assert_eq!(sc.host, "switch.lan");
        assert_eq!(sc.display_name(), "Garage");
        assert_eq!(sc.scan_interval, Duration::from_secs(120));
        assert_eq!(sc.timeout, Duration::from_secs(5));
        assert_eq!(sc.hardware.len(), 1);
        assert_eq!(sc.password.expose_secret(), "pw");
    }

    #[test]
    fn scan_interval_out_of_range() {
        let cfg = Config::default();
        let mut p = profile("switch.lan");
        p.scan_interval = Some(10);
        let err = profile_to_switch_config(&cfg, &p, SecretString::from(String::new())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "scan_interval"));
    }

    #[test]
    fn empty_host_rejected() {
        let cfg = Config::default();
        let err = profile_to_switch_config(&cfg, &profile(" "), SecretString::from(String::new()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "host"));
    }
}
