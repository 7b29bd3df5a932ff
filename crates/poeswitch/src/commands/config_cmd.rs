//! Config subcommand handlers.

use std::fmt::Write as _;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "****";

/// Format config for display, masking passwords.
fn format_config_redacted(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_switch {
        let _ = writeln!(out, "default_switch = \"{default}\"");
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "scan_interval = {}", cfg.defaults.scan_interval);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    for (name, p) in &cfg.switches {
        let _ = writeln!(out);
        let _ = writeln!(out, "[switches.{name}]");
        let _ = writeln!(out, "host = \"{}\"", p.host);
        if let Some(ref n) = p.name {
            let _ = writeln!(out, "name = \"{n}\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"{REDACTED}\"");
        }
        if let Some(secs) = p.scan_interval {
            let _ = writeln!(out, "scan_interval = {secs}");
        }
        if let Some(secs) = p.timeout {
            let _ = writeln!(out, "timeout = {secs}");
        }
    }

    for hw in &cfg.hardware {
        let _ = writeln!(out);
        let _ = writeln!(out, "[[hardware]]");
        let _ = writeln!(out, "model = \"{}\"", hw.model);
        let _ = writeln!(out, "ports = {}", hw.ports);
        let _ = writeln!(out, "all_ports_enabled = {}", hw.all_ports_enabled);
    }

    out.trim_end().to_owned()
}

fn redact(cfg: &mut Config) {
    for profile in cfg.switches.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let mut cfg = config::load_config()?;
            redact(&mut cfg);
            let out = output::render_single(&global.output, &cfg, format_config_redacted, |_| {
                "config".into()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword { switch } => {
            let mut cfg = config::load_config()?;
            let name = switch
                .or_else(|| config::active_switch_name(global, &cfg))
                .ok_or_else(|| CliError::NoConfig {
                    path: config::config_path().display().to_string(),
                })?;

            let secret = rpassword::prompt_password(format!("Password for {name}: "))?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "must not be empty".into(),
                });
            }

            config::keyring_entry(&name)?
                .set_password(&secret)
                .map_err(|e| CliError::Keyring {
                    reason: format!("failed to store password: {e}"),
                })?;
            if !global.quiet {
                eprintln!("Password for '{name}' stored in system keyring");
            }

            // The keyring now wins over plaintext; drop the stale copy.
            let had_plaintext = cfg
                .switches
                .get_mut(&name)
                .is_some_and(|p| p.password.take().is_some());
            if had_plaintext {
                config::save_config(&cfg)?;
                if !global.quiet {
                    eprintln!("Removed plaintext password from config file");
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use poeswitch_config::SwitchProfile;

    use super::*;

    fn sample() -> Config {
        let mut switches = BTreeMap::new();
        switches.insert(
            "garage".to_owned(),
            SwitchProfile {
                host: "192.168.1.3".into(),
                password: Some("hunter2".into()),
                scan_interval: Some(120),
                ..SwitchProfile::default()
            },
        );
        Config {
            default_switch: Some("garage".into()),
            switches,
            ..Config::default()
        }
    }

    #[test]
    fn redacted_view_hides_password() {
        let text = format_config_redacted(&sample());
        assert!(text.contains("[switches.garage]"));
        assert!(text.contains("host = \"192.168.1.3\""));
        assert!(text.contains("password = \"****\""));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn structured_output_is_redacted_too() {
        let mut cfg = sample();
        redact(&mut cfg);
        let json = output::render_json_compact(&cfg);
        assert!(!json.contains("hunter2"));
        assert!(json.contains(REDACTED));
    }
}
