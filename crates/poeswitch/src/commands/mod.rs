//! Command dispatch: bridges CLI args -> coordinator calls -> output formatting.

pub mod config_cmd;
pub mod led;
pub mod port;
pub mod ports;
pub mod status;
pub mod watch;

use poeswitch_core::Coordinator;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a switch-bound command to the appropriate handler.
///
/// One-shot commands log out afterwards whatever the outcome; `watch`
/// manages its own session lifetime.
pub async fn dispatch(
    cmd: Command,
    coordinator: &Coordinator,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let result = match cmd {
        Command::Watch => return watch::handle(coordinator, global).await,
        Command::Status => status::handle(coordinator, global).await,
        Command::Ports(args) => ports::handle(coordinator, args, global).await,
        Command::Port(args) => port::handle(coordinator, args, global).await,
        Command::Led(args) => led::handle(coordinator, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    };
    coordinator.logout().await;
    result
}
