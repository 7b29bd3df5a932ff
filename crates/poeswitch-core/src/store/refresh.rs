// ── Poll result application ──
//
// A poll fetches four independent reports. They are collected first and
// merged together, so a half-failed poll never leaves mixed state.

use chrono::Utc;
use poeswitch_api::{LinkReport, PortStateReport, PowerReport, SystemReport};
use tracing::debug;

use super::DataStore;
use crate::model::{DeviceInfo, LinkState, PowerState};

/// All reports fetched during one successful poll attempt.
pub(crate) struct RefreshSnapshot {
    pub port_state: PortStateReport,
    pub power: PowerReport,
    pub system: SystemReport,
    pub link: LinkReport,
}

impl DataStore {
    /// Merge a full poll into the store and publish once.
    ///
    /// Reported fields overwrite desired values. Ports absent from a
    /// report keep whatever they had.
    pub(crate) fn apply_snapshot(&self, snap: RefreshSnapshot) {
        for (index, on) in (0u32..).zip(snap.port_state.poe_enabled) {
            self.ports.update(index, |p| p.power_state = PowerState::from(on));
        }

        for (index, watts) in (0u32..).zip(snap.power.watts) {
            self.ports.update(index, |p| {
                p.power_watts = Some(watts);
                p.is_poe_port = true;
            });
        }

        for (index, up) in (0u32..).zip(snap.link.link_up) {
            self.ports.update(index, |p| p.link_state = LinkState::from(up));
        }

        for (index, speed) in (0u32..).zip(snap.link.speeds) {
            self.ports.update(index, |p| p.link_speed = speed);
        }

        let device = DeviceInfo::from(snap.system);
        self.observed_led_eco.send_replace(Some(device.led_eco_state));
        self.device.send_replace(Some(device));
        self.last_refresh.send_replace(Some(Utc::now()));

        self.ports.publish();
        debug!(ports = self.ports.len(), "poll merged");
    }
}
