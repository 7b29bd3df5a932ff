//! Session coordinator and state model for small PoE switches.
//!
//! Sits between `poeswitch-api` (raw HTTP calls and scraping) and the
//! `poeswitch` CLI:
//!
//! - **[`Coordinator`]**: owns one switch's session. [`refresh()`](Coordinator::refresh)
//!   fetches every status endpoint and merges the results;
//!   [`change_state()`](Coordinator::change_state) submits desired PoE or LED
//!   eco state and re-polls. [`start()`](Coordinator::start) adds a background
//!   poll loop, stopped by [`shutdown()`](Coordinator::shutdown).
//!
//! - **[`DataStore`]**: per-port state in a `DashMap` with a sorted snapshot
//!   published through `tokio::sync::watch`, plus device info and the last
//!   observed LED eco value.
//!
//! - **[`HardwareTable`]**: model substring to write-form parameters. Config
//!   can prepend profiles for hardware the built-ins do not know.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod hardware;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::SwitchConfig;
pub use coordinator::{Coordinator, CycleState};
pub use error::CoreError;
pub use hardware::{HardwareProfile, HardwareTable};
pub use model::{DeviceInfo, LinkState, Port, PowerState};
pub use store::DataStore;
