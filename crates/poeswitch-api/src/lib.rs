// poeswitch-api: Async client for the cookie-session web UI of small PoE switches

pub mod auth;
pub mod bits;
pub mod client;
pub mod control;
pub mod cookie;
pub mod error;
pub mod models;
pub mod obfuscate;
pub mod scrape;
pub mod status;
pub mod transport;

pub use client::{Form, Method, SwitchClient};
pub use cookie::SessionJar;
pub use error::Error;
pub use models::{LinkReport, PortStateReport, PowerReport, SystemReport};
pub use transport::TransportConfig;
