// ── Port domain types ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// PoE output (or LED eco) switch position.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PowerState {
    #[default]
    On,
    Off,
}

impl PowerState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on { Self::On } else { Self::Off }
    }
}

/// Physical link status.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LinkState {
    Up,
    #[default]
    Down,
}

impl From<bool> for LinkState {
    fn from(up: bool) -> Self {
        if up { Self::Up } else { Self::Down }
    }
}

/// One switch port, keyed by its 0-based device index.
///
/// `power_state` is the desired value after a local mutation and the
/// observed value after a poll. `power_watts` is only ever set on ports
/// that appear in the power report, which is also what makes them PoE
/// ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub index: u32,
    pub power_state: PowerState,
    pub power_watts: Option<f64>,
    pub link_state: LinkState,
    pub link_speed: String,
    pub is_poe_port: bool,
}

impl Port {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            power_state: PowerState::default(),
            power_watts: None,
            link_state: LinkState::default(),
            link_speed: String::new(),
            is_poe_port: false,
        }
    }
}
