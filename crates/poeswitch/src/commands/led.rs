//! LED eco toggle.

use poeswitch_core::{Coordinator, PowerState};

use crate::cli::{GlobalOpts, LedArgs};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    coordinator: &Coordinator,
    args: LedArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    coordinator.refresh().await?;
    coordinator.set_led_eco_state(PowerState::from(args.state))?;
    coordinator.change_state().await?;

    let state = coordinator
        .get_led_eco_state()
        .unwrap_or(PowerState::from(args.state));
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &state,
        |s| format!("LED eco: {}", output::paint_power(*s, color)),
        ToString::to_string,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
