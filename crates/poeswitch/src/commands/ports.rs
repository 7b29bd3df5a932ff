//! Port listing and shared port rendering.

use tabled::Tabled;

use poeswitch_core::{Coordinator, Port};

use crate::cli::{GlobalOpts, PortsArgs};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct PortRow {
    #[tabled(rename = "Port")]
    index: u32,
    #[tabled(rename = "PoE")]
    poe: String,
    #[tabled(rename = "Power")]
    watts: String,
    #[tabled(rename = "Link")]
    link: String,
    #[tabled(rename = "Speed")]
    speed: String,
}

impl PortRow {
    pub(crate) fn new(p: &Port) -> Self {
        Self {
            index: p.index,
            poe: if p.is_poe_port {
                p.power_state.to_string()
            } else {
                "-".into()
            },
            watts: p.power_watts.map_or_else(|| "-".into(), |w| format!("{w:.1} W")),
            link: p.link_state.to_string(),
            speed: if p.link_speed.is_empty() {
                "-".into()
            } else {
                p.link_speed.clone()
            },
        }
    }
}

pub(crate) fn detail(p: &Port, color: bool) -> String {
    let mut lines = vec![
        format!("Port:   {}", p.index),
        format!("Link:   {}", output::paint_link(p.link_state, color)),
        format!(
            "Speed:  {}",
            if p.link_speed.is_empty() { "-" } else { &p.link_speed }
        ),
    ];
    if p.is_poe_port {
        lines.push(format!("PoE:    {}", output::paint_power(p.power_state, color)));
        if let Some(w) = p.power_watts {
            lines.push(format!("Power:  {w:.1} W"));
        }
    } else {
        lines.push("PoE:    not available".into());
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    coordinator: &Coordinator,
    args: PortsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    coordinator.refresh().await?;

    let ports: Vec<Port> = if args.poe {
        coordinator.poe_ports()
    } else {
        coordinator.ports().to_vec()
    };

    let out = output::render_list(&global.output, &ports, PortRow::new, |p| {
        format!("{} {}", p.index, p.power_state)
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
