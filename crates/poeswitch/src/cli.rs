//! Clap derive structures for the `poeswitch` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

use poeswitch_core::PowerState;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// poeswitch -- PoE port control for small web-managed switches
#[derive(Debug, Parser)]
#[command(
    name = "poeswitch",
    version,
    about = "Control PoE ports and LED eco mode on Zyxel GS1200 class switches",
    long_about = "Talks to the switch's web interface: logs in, reads port state,\n\
        power draw and link status, and writes PoE and LED eco changes back.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Switch profile to use
    #[arg(long, short = 's', env = "POESWITCH_SWITCH", global = true)]
    pub switch: Option<String>,

    /// Switch address (overrides profile)
    #[arg(long, env = "POESWITCH_HOST", global = true)]
    pub host: Option<String>,

    /// Switch password
    #[arg(long, env = "POESWITCH_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "POESWITCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// On/off argument for port and LED commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for PowerState {
    fn from(t: Toggle) -> Self {
        match t {
            Toggle::On => PowerState::On,
            Toggle::Off => PowerState::Off,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show device info and all ports
    #[command(alias = "st")]
    Status,

    /// List ports
    #[command(alias = "ls")]
    Ports(PortsArgs),

    /// Turn PoE on or off for one port
    Port(PortArgs),

    /// Turn LED eco mode on or off
    Led(LedArgs),

    /// Poll in the background and print every refresh until Ctrl-C
    Watch,

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct PortsArgs {
    /// Only PoE-capable ports
    #[arg(long)]
    pub poe: bool,
}

#[derive(Debug, Args)]
pub struct PortArgs {
    /// Port index (0-based, as the switch reports it)
    pub index: u32,

    /// Desired PoE state
    pub state: Toggle,
}

#[derive(Debug, Args)]
pub struct LedArgs {
    /// Desired LED eco state
    pub state: Toggle,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// Show current configuration (passwords redacted)
    Show,

    /// Store a switch password in the system keyring
    SetPassword {
        /// Switch profile name (defaults to the active switch)
        switch: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
