// Raw endpoint payloads
//
// Typed views of what each status script reports, before any merging.
// Field names follow the device's variables loosely; the core crate
// converts these into its own domain types.

use serde::{Deserialize, Serialize};

/// `/port_state_data.js`: PoE enable flags, port 0 first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortStateReport {
    pub poe_enabled: Vec<bool>,
}

/// `/poe_data.js`: measured draw in watts, one entry per PoE port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerReport {
    pub watts: Vec<f64>,
}

/// `/system_data.js`: identity, firmware and housekeeping values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemReport {
    pub firmware_version: String,
    pub model: String,
    pub mac_address: String,
    pub name: String,
    pub led_eco_on: bool,
    pub uptime_secs: u64,
}

/// `/link_data.js`: link status and speed, aligned by port index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    pub link_up: Vec<bool>,
    pub speeds: Vec<String>,
}
