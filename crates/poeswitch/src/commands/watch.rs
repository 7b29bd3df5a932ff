//! Watch: keep the coordinator polling and print each refresh until Ctrl-C.

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use poeswitch_core::{Coordinator, Port};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct WatchEvent<'a> {
    at: DateTime<Utc>,
    ports: &'a [Port],
}

fn summary_line(at: DateTime<Utc>, ports: &[Port], color: bool) -> String {
    let cells: Vec<String> = ports
        .iter()
        .map(|p| {
            let mut cell = format!("{}:{}", p.index, output::paint_link(p.link_state, color));
            if p.is_poe_port {
                cell.push('/');
                cell.push_str(&output::paint_power(p.power_state, color));
                if let Some(w) = p.power_watts {
                    let _ = write!(cell, " {w:.1}W");
                }
            }
            cell
        })
        .collect();
    format!("{}  {}", at.format("%H:%M:%S"), cells.join("  "))
}

fn render(global: &GlobalOpts, ports: &[Port], color: bool) -> String {
    let at = Utc::now();
    match global.output {
        // One object per line so the stream stays parseable.
        OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
            output::render_json_compact(&WatchEvent { at, ports })
        }
        OutputFormat::Table | OutputFormat::Plain => summary_line(at, ports, color),
    }
}

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let mut rx = coordinator.subscribe_ports();

    if let Err(e) = coordinator.start().await {
        coordinator.logout().await;
        return Err(e.into());
    }

    let color = output::should_color(&global.color);
    let initial: Arc<Vec<Port>> = rx.borrow_and_update().clone();
    output::print_output(&render(global, &initial, color), global.quiet);

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted");
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let ports = rx.borrow_and_update().clone();
                output::print_output(&render(global, &ports, color), global.quiet);
            }
        }
    }

    coordinator.shutdown().await;
    Ok(())
}
