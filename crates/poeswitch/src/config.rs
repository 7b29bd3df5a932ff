//! CLI configuration: a thin wrapper around `poeswitch_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (`--switch`,
//! `--host`, `--password`).

use secrecy::SecretString;

use poeswitch_config::{ConfigError, SwitchProfile, profile_to_switch_config, resolve_password};
use poeswitch_core::SwitchConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use poeswitch_config::{Config, config_path, keyring_entry, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Name of the switch the command applies to, if one can be determined.
pub fn active_switch_name(global: &GlobalOpts, config: &Config) -> Option<String> {
    config
        .switch(global.switch.as_deref())
        .ok()
        .map(|(name, _)| name.to_owned())
        .or_else(|| global.switch.clone())
}

/// Build a `SwitchConfig` from the config file plus flag overrides.
///
/// `--host` alone (no profile) describes an ad-hoc switch; it then needs
/// `--password` or `POESWITCH_PASSWORD`.
pub fn build_switch_config(global: &GlobalOpts) -> Result<SwitchConfig, CliError> {
    let cfg = load_config()?;

    let (name, mut profile) = match cfg.switch(global.switch.as_deref()) {
        Ok((name, profile)) => (name.to_owned(), profile.clone()),
        Err(ConfigError::NoSwitchSelected) if global.host.is_some() => (
            "adhoc".to_owned(),
            SwitchProfile::default(),
        ),
        Err(ConfigError::UnknownSwitch { name }) => {
            return Err(CliError::SwitchNotFound {
                name,
                available: available_switches(&cfg),
            });
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }

    let password = match global.password {
        Some(ref pw) => SecretString::from(pw.clone()),
        None => resolve_password(&profile, &name)?,
    };

    tracing::debug!(switch = %name, host = %profile.host, "resolved switch");
    Ok(profile_to_switch_config(&cfg, &profile, password)?)
}

fn available_switches(cfg: &Config) -> String {
    if cfg.switches.is_empty() {
        "(none)".into()
    } else {
        cfg.switches.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
