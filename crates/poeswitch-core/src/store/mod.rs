// ── Switch state store ──
//
// Per-port and per-device state for one switch. Polls merge into it
// through `apply_snapshot`; local mutations write desired values that
// the change cycle later submits.

mod collection;
mod refresh;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use self::collection::PortCollection;
pub(crate) use self::refresh::RefreshSnapshot;
use crate::error::CoreError;
use crate::model::{DeviceInfo, Port, PowerState};

/// In-memory state of one switch.
///
/// Ports are created the first time any endpoint reports them and are
/// never removed. `device` holds desired LED eco state after a local
/// mutation; `observed_led_eco` holds what the switch last reported.
pub struct DataStore {
    pub(crate) ports: PortCollection,
    pub(crate) device: watch::Sender<Option<DeviceInfo>>,
    pub(crate) observed_led_eco: watch::Sender<Option<PowerState>>,
    pub(crate) last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DataStore {
    pub fn new() -> Self {
        let (device, _) = watch::channel(None);
        let (observed_led_eco, _) = watch::channel(None);
        let (last_refresh, _) = watch::channel(None);

        Self {
            ports: PortCollection::new(),
            device,
            observed_led_eco,
            last_refresh,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn port(&self, index: u32) -> Option<Port> {
        self.ports.get(index)
    }

    pub fn ports_snapshot(&self) -> Arc<Vec<Port>> {
        self.ports.snapshot()
    }

    /// PoE-capable ports in index order.
    pub fn poe_ports(&self) -> Vec<Port> {
        self.ports
            .snapshot()
            .iter()
            .filter(|p| p.is_poe_port)
            .cloned()
            .collect()
    }

    pub fn device_info(&self) -> Option<DeviceInfo> {
        self.device.borrow().clone()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }

    pub fn subscribe_ports(&self) -> watch::Receiver<Arc<Vec<Port>>> {
        self.ports.subscribe()
    }

    /// Desired LED eco state, if it differs from the last observed one.
    pub fn pending_led_eco(&self) -> Option<PowerState> {
        let desired = self.device.borrow().as_ref()?.led_eco_state;
        let observed = (*self.observed_led_eco.borrow())?;
        (desired != observed).then_some(desired)
    }

    /// Desired PoE states of the PoE-capable ports, index order.
    pub(crate) fn poe_power_states(&self) -> Vec<bool> {
        self.poe_ports()
            .iter()
            .map(|p| p.power_state.is_on())
            .collect()
    }

    // ── Local mutations ──────────────────────────────────────────────

    /// Set the desired PoE state of a port.
    pub fn set_port_power_state(&self, index: u32, state: PowerState) -> Result<(), CoreError> {
        let port = self.ports.get(index).ok_or(CoreError::UnknownPort { index })?;
        if !port.is_poe_port {
            return Err(CoreError::NotPoePort { index });
        }
        self.ports.modify(index, |p| p.power_state = state);
        self.ports.publish();
        Ok(())
    }

    /// Set the desired LED eco state.
    pub fn set_led_eco_state(&self, state: PowerState) -> Result<(), CoreError> {
        let mut known = false;
        self.device.send_modify(|device| {
            if let Some(device) = device {
                device.led_eco_state = state;
                known = true;
            }
        });
        if known { Ok(()) } else { Err(CoreError::NotReady) }
    }

    /// Record that the switch accepted an LED eco write.
    pub(crate) fn commit_led_eco(&self, state: PowerState) {
        self.observed_led_eco.send_replace(Some(state));
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn device(led: PowerState) -> DeviceInfo {
        DeviceInfo {
            name: "garage".into(),
            mac_address: "BC:CF:4F:00:11:22".into(),
            model: "GS1200-5HP v2".into(),
            firmware_version: "V2.00".into(),
            led_eco_state: led,
            uptime_secs: 10,
        }
    }

    #[test]
    fn unknown_port_is_rejected() {
        let store = DataStore::new();
        assert!(matches!(
            store.set_port_power_state(7, PowerState::Off),
            Err(CoreError::UnknownPort { index: 7 })
        ));
    }

    #[test]
    fn non_poe_port_is_rejected() {
        let store = DataStore::new();
        store.ports.update(4, |_| {});
        assert!(matches!(
            store.set_port_power_state(4, PowerState::Off),
            Err(CoreError::NotPoePort { index: 4 })
        ));
    }

    #[test]
    fn poe_port_mutation_is_published() {
        let store = DataStore::new();
        store.ports.update(0, |p| p.is_poe_port = true);
        store.ports.update(1, |p| p.is_poe_port = true);
        store.ports.update(4, |_| {});
        store.ports.publish();

        store.set_port_power_state(1, PowerState::Off).unwrap();
        assert_eq!(store.port(1).unwrap().power_state, PowerState::Off);
        assert_eq!(store.ports_snapshot()[1].power_state, PowerState::Off);
        assert_eq!(store.poe_power_states(), vec![true, false]);
        assert_eq!(store.poe_ports().len(), 2);
    }

    #[test]
    fn led_eco_needs_device_info() {
        let store = DataStore::new();
        assert!(matches!(
            store.set_led_eco_state(PowerState::On),
            Err(CoreError::NotReady)
        ));
        assert!(store.pending_led_eco().is_none());
    }

    #[test]
    fn led_eco_pending_until_committed() {
        let store = DataStore::new();
        store.device.send_replace(Some(device(PowerState::Off)));
        store.observed_led_eco.send_replace(Some(PowerState::Off));
        assert!(store.pending_led_eco().is_none());

        store.set_led_eco_state(PowerState::On).unwrap();
        assert_eq!(store.pending_led_eco(), Some(PowerState::On));

        store.commit_led_eco(PowerState::On);
        assert!(store.pending_led_eco().is_none());
    }
}
