// ── Device domain types ──

use serde::{Deserialize, Serialize};

use super::port::PowerState;

/// Switch identity and housekeeping values from `system_data.js`.
///
/// Model and firmware never change for a given switch; LED eco state and
/// uptime are re-read on every poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub mac_address: String,
    pub model: String,
    pub firmware_version: String,
    pub led_eco_state: PowerState,
    pub uptime_secs: u64,
}

impl From<poeswitch_api::SystemReport> for DeviceInfo {
    fn from(r: poeswitch_api::SystemReport) -> Self {
        Self {
            name: r.name,
            mac_address: r.mac_address,
            model: r.model,
            firmware_version: r.firmware_version,
            led_eco_state: PowerState::from(r.led_eco_on),
            uptime_secs: r.uptime_secs,
        }
    }
}
