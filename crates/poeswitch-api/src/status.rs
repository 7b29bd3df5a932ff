// Status endpoints
//
// One GET per status script, parsed into the typed reports in `models`.

use tracing::debug;

use crate::client::{SwitchClient, paths};
use crate::error::Error;
use crate::models::{LinkReport, PortStateReport, PowerReport, SystemReport};
use crate::scrape;

impl SwitchClient {
    /// PoE enable flags.
    ///
    /// `GET /port_state_data.js`
    pub async fn fetch_port_state(&self) -> Result<PortStateReport, Error> {
        let text = self.get(paths::PORT_STATE).await?;
        let report = scrape::parse_port_state(&text)?;
        debug!(poe = ?report.poe_enabled, "port state fetched");
        Ok(report)
    }

    /// Per-port power draw.
    ///
    /// `GET /poe_data.js`
    pub async fn fetch_power(&self) -> Result<PowerReport, Error> {
        let text = self.get(paths::POWER).await?;
        let report = scrape::parse_power(&text)?;
        debug!(watts = ?report.watts, "port power fetched");
        Ok(report)
    }

    /// Firmware, model, MAC, name, LED eco flag and uptime.
    ///
    /// `GET /system_data.js`
    pub async fn fetch_system_info(&self) -> Result<SystemReport, Error> {
        let text = self.get(paths::SYSTEM).await?;
        let report = scrape::parse_system_info(&text)?;
        debug!(model = %report.model, firmware = %report.firmware_version, "system info fetched");
        Ok(report)
    }

    /// Link state and negotiated speed per port.
    ///
    /// `GET /link_data.js`
    pub async fn fetch_link_info(&self) -> Result<LinkReport, Error> {
        let text = self.get(paths::LINK).await?;
        let report = scrape::parse_link_info(&text)?;
        debug!(ports = report.link_up.len(), "link info fetched");
        Ok(report)
    }
}
