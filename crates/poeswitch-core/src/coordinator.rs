// ── Poll/change coordinator ──
//
// Owns one switch's session client and state store. Every poll and every
// change holds the client lock for the whole cycle, so at most one HTTP
// call to the device is in flight at any time.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use poeswitch_api::SwitchClient;
use poeswitch_api::bits::bool_list_to_int;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::SwitchConfig;
use crate::error::CoreError;
use crate::hardware::HardwareTable;
use crate::model::{DeviceInfo, LinkState, Port, PowerState};
use crate::store::{DataStore, RefreshSnapshot};

/// Where the coordinator currently is in a poll or change cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Polling { attempt: u32 },
    ChangeRequested,
    Applying { attempt: u32 },
}

// ── Coordinator ──────────────────────────────────────────────────────

/// Session and state owner for one switch.
///
/// Cheaply cloneable via `Arc<CoordinatorInner>`. Construction does no I/O;
/// call [`refresh()`](Self::refresh) or [`start()`](Self::start) to talk to
/// the device, and [`shutdown()`](Self::shutdown) to log out.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    config: SwitchConfig,
    hardware: HardwareTable,
    store: DataStore,
    client: Mutex<SwitchClient>,
    cycle_state: watch::Sender<CycleState>,
    poller: Mutex<Option<(CancellationToken, JoinHandle<()>)>>,
}

impl Coordinator {
    /// Validate `config` and build the session client.
    pub fn new(config: SwitchConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let client = SwitchClient::new(&config.host, &config.transport())?;
        let hardware = HardwareTable::with_overrides(&config.hardware);
        let (cycle_state, _) = watch::channel(CycleState::Idle);

        Ok(Self {
            inner: Arc::new(CoordinatorInner {
                config,
                hardware,
                store: DataStore::new(),
                client: Mutex::new(client),
                cycle_state,
                poller: Mutex::new(None),
            }),
        })
    }

    pub fn config(&self) -> &SwitchConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &DataStore {
        &self.inner.store
    }

    pub fn cycle_state(&self) -> watch::Receiver<CycleState> {
        self.inner.cycle_state.subscribe()
    }

    fn set_cycle(&self, state: CycleState) {
        self.inner.cycle_state.send_replace(state);
    }

    // ── Poll cycle ───────────────────────────────────────────────────

    /// Fetch all four status endpoints and merge them into the store.
    ///
    /// Up to `cycle_attempts` attempts with `retry_delay` between them.
    /// On failure the store keeps its previous values.
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let client = self.inner.client.lock().await;
        let attempts = self.inner.config.cycle_attempts;
        let mut attempt = 0;

        let result = loop {
            attempt += 1;
            self.set_cycle(CycleState::Polling { attempt });

            match self.poll_once(&client).await {
                Ok(snapshot) => break Ok(snapshot),
                Err(e) if e.is_fatal() || attempt >= attempts => break Err(e),
                Err(e) => {
                    warn!(attempt, error = %e, "poll failed, retrying");
                    tokio::time::sleep(self.inner.config.retry_delay).await;
                }
            }
        };
        self.set_cycle(CycleState::Idle);

        match result {
            Ok(snapshot) => {
                self.inner.store.apply_snapshot(snapshot);
                debug!(switch = self.inner.config.display_name(), attempt, "refresh complete");
                Ok(())
            }
            Err(e) => {
                warn!(attempts = attempt, error = %e, "refresh failed");
                Err(CoreError::RefreshFailed {
                    attempts: attempt,
                    source: Box::new(e),
                })
            }
        }
    }

    async fn poll_once(&self, client: &SwitchClient) -> Result<RefreshSnapshot, CoreError> {
        let port_state = self.authenticated(client, SwitchClient::fetch_port_state).await?;
        let power = self.authenticated(client, SwitchClient::fetch_power).await?;
        let system = self.authenticated(client, SwitchClient::fetch_system_info).await?;
        let link = self.authenticated(client, SwitchClient::fetch_link_info).await?;

        Ok(RefreshSnapshot {
            port_state,
            power,
            system,
            link,
        })
    }

    /// Log in, run `op`, and on `LoginRequired` log in again and run it
    /// once more.
    async fn authenticated<'a, T, F, Fut>(
        &self,
        client: &'a SwitchClient,
        op: F,
    ) -> Result<T, CoreError>
    where
        F: Fn(&'a SwitchClient) -> Fut,
        Fut: Future<Output = Result<T, poeswitch_api::Error>>,
    {
        let mut relogged = false;
        loop {
            client.login(&self.inner.config.password).await?;
            match op(client).await {
                Err(e) if e.is_login_required() && !relogged => {
                    debug!("session expired mid-cycle, logging in again");
                    relogged = true;
                }
                other => return other.map_err(CoreError::from),
            }
        }
    }

    // ── Change cycle ─────────────────────────────────────────────────

    /// Submit desired state to the switch, then refresh.
    ///
    /// A pending LED eco change is sent on its own; otherwise the PoE
    /// bitmask of all PoE ports is written with the model's form. A failed
    /// follow-up refresh is logged only.
    pub async fn change_state(&self) -> Result<(), CoreError> {
        let device = self.inner.store.device_info().ok_or(CoreError::NotReady)?;

        {
            let client = self.inner.client.lock().await;
            self.set_cycle(CycleState::ChangeRequested);

            let attempts = self.inner.config.cycle_attempts;
            let mut attempt = 0;
            let result = loop {
                attempt += 1;
                self.set_cycle(CycleState::Applying { attempt });

                match self.apply_once(&client, &device).await {
                    Ok(()) => break Ok(()),
                    Err(e) if e.is_fatal() => break Err(e),
                    Err(e) if attempt >= attempts => {
                        break Err(CoreError::ChangeFailed {
                            attempts: attempt,
                            source: Box::new(e),
                        });
                    }
                    Err(e) => {
                        warn!(attempt, error = %e, "change failed, retrying");
                        tokio::time::sleep(self.inner.config.retry_delay).await;
                    }
                }
            };
            self.set_cycle(CycleState::Idle);

            if let Err(e) = result {
                warn!(error = %e, "change not applied");
                return Err(e);
            }
        }

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "refresh after change failed");
        }
        Ok(())
    }

    async fn apply_once(&self, client: &SwitchClient, device: &DeviceInfo) -> Result<(), CoreError> {
        let store = &self.inner.store;

        if let Some(led) = store.pending_led_eco() {
            let on = led.is_on();
            self.authenticated(client, move |c| c.set_led_eco(on)).await?;
            store.commit_led_eco(led);
            info!(state = %led, "LED eco state applied");
            return Ok(());
        }

        let profile = self
            .inner
            .hardware
            .lookup(&device.model)
            .ok_or_else(|| CoreError::UnsupportedModel {
                model: device.model.clone(),
            })?;

        let mask = bool_list_to_int(&store.poe_power_states());
        let form = profile.port_state_form(mask);
        let form = &form;
        self.authenticated(client, move |c| c.set_port_state(form)).await?;
        info!(mask, model = %profile.model, "PoE port state applied");
        Ok(())
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn get_port_state(&self, index: u32) -> Option<PowerState> {
        self.inner.store.port(index).map(|p| p.power_state)
    }

    /// Set the desired PoE state. Takes effect on [`change_state()`](Self::change_state).
    pub fn set_port_state(&self, index: u32, state: PowerState) -> Result<(), CoreError> {
        self.inner.store.set_port_power_state(index, state)
    }

    pub fn get_port_power(&self, index: u32) -> Option<f64> {
        self.inner.store.port(index).and_then(|p| p.power_watts)
    }

    pub fn get_port_link_state(&self, index: u32) -> Option<LinkState> {
        self.inner.store.port(index).map(|p| p.link_state)
    }

    pub fn get_port_link_speed(&self, index: u32) -> Option<String> {
        self.inner.store.port(index).map(|p| p.link_speed)
    }

    pub fn get_led_eco_state(&self) -> Option<PowerState> {
        self.inner.store.device_info().map(|d| d.led_eco_state)
    }

    /// Set the desired LED eco state. Takes effect on [`change_state()`](Self::change_state).
    pub fn set_led_eco_state(&self, state: PowerState) -> Result<(), CoreError> {
        self.inner.store.set_led_eco_state(state)
    }

    pub fn get_uptime(&self) -> Option<Duration> {
        self.inner
            .store
            .device_info()
            .map(|d| Duration::from_secs(d.uptime_secs))
    }

    pub fn device_info(&self) -> Option<DeviceInfo> {
        self.inner.store.device_info()
    }

    pub fn ports(&self) -> Arc<Vec<Port>> {
        self.inner.store.ports_snapshot()
    }

    pub fn poe_ports(&self) -> Vec<Port> {
        self.inner.store.poe_ports()
    }

    pub fn subscribe_ports(&self) -> watch::Receiver<Arc<Vec<Port>>> {
        self.inner.store.subscribe_ports()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.store.last_refresh()
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Run an initial refresh, then poll every `scan_interval` in the
    /// background until [`shutdown()`](Self::shutdown).
    pub async fn start(&self) -> Result<(), CoreError> {
        let mut poller = self.inner.poller.lock().await;
        if poller.is_some() {
            debug!("poller already running");
            return Ok(());
        }

        self.refresh().await?;

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_task(
            self.clone(),
            self.inner.config.scan_interval,
            cancel.clone(),
        ));
        *poller = Some((cancel, handle));
        info!(
            switch = self.inner.config.display_name(),
            interval_secs = self.inner.config.scan_interval.as_secs(),
            "background polling started"
        );
        Ok(())
    }

    /// Stop background polling and log out.
    pub async fn shutdown(&self) {
        if let Some((cancel, handle)) = self.inner.poller.lock().await.take() {
            cancel.cancel();
            if let Err(e) = handle.await {
                warn!(error = %e, "poll task ended abnormally");
            }
        }
        self.logout().await;
        debug!("coordinator shut down");
    }

    /// End the device session. Failures are logged and swallowed.
    pub async fn logout(&self) {
        let client = self.inner.client.lock().await;
        if !client.is_authenticated() {
            debug!("no session to end");
            return;
        }
        client.logout().await;
    }
}

// ── Background task ──────────────────────────────────────────────────

/// First tick one `period` from now. A refresh that overruns the period
/// pushes later ticks back rather than firing the missed ones in a burst.
fn poll_interval(period: Duration) -> Interval {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

async fn poll_task(coordinator: Coordinator, period: Duration, cancel: CancellationToken) {
    let mut interval = poll_interval(period);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = coordinator.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn poll_interval_delays_after_overrun() {
        let period = Duration::from_secs(30);
        let start = Instant::now();
        let mut interval = poll_interval(period);
        assert_eq!(interval.missed_tick_behavior(), MissedTickBehavior::Delay);

        interval.tick().await;
        assert_eq!(start.elapsed(), period);

        // Simulate a refresh that ran past two periods.
        tokio::time::advance(Duration::from_secs(70)).await;
        interval.tick().await;
        let after_overrun = Instant::now();

        // The next tick is a full period later, not immediately.
        interval.tick().await;
        assert_eq!(after_overrun.elapsed(), period);
    }
}
