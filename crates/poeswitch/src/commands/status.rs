//! Status command: device info plus the port table.

use chrono::{DateTime, Utc};
use serde::Serialize;

use poeswitch_core::{Coordinator, CoreError, DeviceInfo, Port};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::ports::PortRow;

#[derive(Serialize)]
struct StatusView {
    switch: String,
    device: DeviceInfo,
    ports: Vec<Port>,
    last_refresh: Option<DateTime<Utc>>,
}

fn detail(view: &StatusView, color: bool) -> String {
    let d = &view.device;
    let lines = [
        format!("Switch:   {}", view.switch),
        format!("Name:     {}", d.name),
        format!("Model:    {}", d.model),
        format!("MAC:      {}", d.mac_address),
        format!("Firmware: {}", d.firmware_version),
        format!("Uptime:   {}", output::format_uptime(d.uptime_secs)),
        format!("LED eco:  {}", output::paint_power(d.led_eco_state, color)),
    ];
    let rows: Vec<PortRow> = view.ports.iter().map(PortRow::new).collect();
    format!("{}\n\n{}", lines.join("\n"), output::render_table(&rows))
}

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    coordinator.refresh().await?;
    let device = coordinator.device_info().ok_or(CoreError::NotReady)?;

    let view = StatusView {
        switch: coordinator.config().display_name().to_owned(),
        device,
        ports: coordinator.ports().to_vec(),
        last_refresh: coordinator.last_refresh(),
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, color),
        |v| v.device.model.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
