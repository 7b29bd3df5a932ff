mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use poeswitch_core::Coordinator;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Log to stderr so `-o json` output on stdout stays parseable.
/// `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    match command {
        Command::Config(args) => commands::config_cmd::handle(args, &global),
        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "poeswitch",
                &mut std::io::stdout(),
            );
            Ok(())
        }
        cmd => {
            let coordinator = connect(&global)?;
            tracing::debug!(command = ?cmd, switch = coordinator.config().display_name(), "dispatching");
            commands::dispatch(cmd, &coordinator, &global).await
        }
    }
}

/// Resolve the target switch and build its coordinator. No I/O happens
/// until a command calls `refresh()` or `start()`.
fn connect(global: &GlobalOpts) -> Result<Coordinator, CliError> {
    let switch = config::build_switch_config(global)?;
    Ok(Coordinator::new(switch)?)
}
