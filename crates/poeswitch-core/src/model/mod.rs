// ── Domain model ──

pub mod device;
pub mod port;

pub use device::DeviceInfo;
pub use port::{LinkState, Port, PowerState};
