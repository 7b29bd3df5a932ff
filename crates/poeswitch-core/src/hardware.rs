// ── Hardware profiles ──
//
// The port-state write form differs per model: the "all ports enabled"
// value and the number of per-port speed fields. Profiles are matched by
// substring against the reported `model_name`.

use poeswitch_api::Form;
use serde::{Deserialize, Serialize};

/// Write-form parameters for one switch model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HardwareProfile {
    /// Substring of the device's reported model name.
    pub model: String,
    /// Physical port count; one `g_port_speed{n}` field is sent per port.
    pub ports: u8,
    /// Value of `g_port_state` that keeps every port administratively up.
    pub all_ports_enabled: u32,
}

impl HardwareProfile {
    pub fn new(model: impl Into<String>, ports: u8, all_ports_enabled: u32) -> Self {
        Self {
            model: model.into(),
            ports,
            all_ports_enabled,
        }
    }

    /// Build the `/port_state_set.cgi` form for a PoE bitmask.
    pub fn port_state_form(&self, poe_mask: u32) -> Form {
        let mut form: Form = vec![
            ("g_port_state".into(), self.all_ports_enabled.to_string()),
            ("g_port_flwcl".into(), "0".into()),
            ("g_port_poe".into(), poe_mask.to_string()),
        ];
        form.extend((0..self.ports).map(|n| (format!("g_port_speed{n}"), "0".into())));
        form
    }
}

/// Ordered model lookup. Earlier entries win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HardwareTable {
    profiles: Vec<HardwareProfile>,
}

impl HardwareTable {
    /// Models known to work out of the box.
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                HardwareProfile::new("GS1200-5HP v2", 5, 31),
                HardwareProfile::new("GS1200-8HP v2", 8, 255),
            ],
        }
    }

    /// Built-ins with `overrides` consulted first.
    pub fn with_overrides(overrides: &[HardwareProfile]) -> Self {
        let mut profiles = overrides.to_vec();
        profiles.extend(Self::builtin().profiles);
        Self { profiles }
    }

    /// First profile whose model string occurs in `model_name`.
    pub fn lookup(&self, model_name: &str) -> Option<&HardwareProfile> {
        self.profiles
            .iter()
            .find(|p| !p.model.is_empty() && model_name.contains(p.model.as_str()))
    }
}

impl Default for HardwareTable {
    fn default() -> Self {
        Self::builtin()
    }
}
