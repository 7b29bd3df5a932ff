//! Single-port PoE toggle.

use tracing::info;

use poeswitch_core::{Coordinator, CoreError, PowerState};

use crate::cli::{GlobalOpts, PortArgs};
use crate::error::CliError;
use crate::output;

use super::ports;

pub async fn handle(
    coordinator: &Coordinator,
    args: PortArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    coordinator.refresh().await?;

    let desired = PowerState::from(args.state);
    coordinator.set_port_state(args.index, desired)?;
    coordinator.change_state().await?;
    info!(port = args.index, state = %desired, "port state submitted");

    let port = coordinator
        .ports()
        .iter()
        .find(|p| p.index == args.index)
        .cloned()
        .ok_or(CoreError::UnknownPort { index: args.index })?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &port,
        |p| ports::detail(p, color),
        |p| p.power_state.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
