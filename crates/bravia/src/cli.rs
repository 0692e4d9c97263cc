//! Clap derive structures for the `bravia` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

use bravia_api::DEFAULT_AUDIO_OUTPUT;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// bravia -- remote control for Sony Bravia TVs
#[derive(Debug, Parser)]
#[command(
    name = "bravia",
    version,
    about = "Control Sony Bravia TVs from the command line",
    long_about = "A command-line remote for Sony Bravia TVs.\n\n\
        Talks to the set's IP control interface (JSON services and IRCC\n\
        remote codes) after pairing with the PIN shown on screen.",
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
    /// TV profile to use
    #[arg(long, short = 'p', env = "BRAVIA_PROFILE", global = true)]
    pub profile: Option<String>,

    /// TV address, IP or host[:port] (overrides profile)
    #[arg(long, short = 'H', env = "BRAVIA_HOST", global = true)]
    pub host: Option<String>,

    /// TV MAC address for Wake-on-LAN (overrides profile)
    #[arg(long, env = "BRAVIA_MAC", global = true)]
    pub mac: Option<String>,

    /// Pairing PIN (overrides profile)
    #[arg(long, env = "BRAVIA_PIN", global = true, hide_env_values = true)]
    pub pin: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "BRAVIA_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "BRAVIA_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Pair with a TV using the PIN shown on screen
    Pair(PairArgs),

    /// Turn the TV on or off, or show its power state
    #[command(alias = "pw")]
    Power(PowerArgs),

    /// Volume and mute
    #[command(alias = "vol")]
    Volume(VolumeArgs),

    /// List and select inputs, channels and apps
    #[command(alias = "src")]
    Sources(SourcesArgs),

    /// List and launch installed apps
    Apps(AppsArgs),

    /// List and switch picture scenes
    Scenes(ScenesArgs),

    /// Playback transport controls
    Media(MediaArgs),

    /// Press a remote-control button by name
    #[command(name = "command", alias = "key")]
    Press(PressArgs),

    /// List the remote-control buttons the TV knows
    Commands,

    /// Show system or now-playing information
    Info(InfoArgs),

    /// Send Wake-on-LAN packets to the TV
    Wake,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Pair ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PairArgs {
    /// Name the TV shows for this client in its device list
    #[arg(long)]
    pub nickname: Option<String>,
}

// ── Power ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PowerArgs {
    #[command(subcommand)]
    pub command: PowerCommand,
}

#[derive(Debug, Subcommand)]
pub enum PowerCommand {
    /// Wake the TV and switch it on
    On,
    /// Put the TV into standby
    Off,
    /// Show the power state
    Status,
}

// ── Volume ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VolumeArgs {
    /// Audio output to address
    #[arg(long, short = 't', default_value = DEFAULT_AUDIO_OUTPUT)]
    pub target: String,

    #[command(subcommand)]
    pub command: VolumeCommand,
}

#[derive(Debug, Subcommand)]
pub enum VolumeCommand {
    /// One step louder
    Up,
    /// One step quieter
    Down,
    /// Set the volume as a fraction between 0.0 and 1.0
    Set {
        /// Volume level (0.0 - 1.0)
        level: f64,
    },
    /// Show volume and mute state
    Get,
    /// Mute the TV
    Mute,
    /// Unmute the TV
    Unmute,
    /// Toggle mute
    Toggle,
    /// List audio outputs
    Outputs,
}

// ── Sources / Apps / Scenes ──────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SourcesArgs {
    #[command(subcommand)]
    pub command: SourcesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SourcesCommand {
    /// List inputs, channels and apps
    #[command(alias = "ls")]
    List,
    /// Switch to a source by title
    Select {
        /// Source title as shown by `sources list`
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct AppsArgs {
    #[command(subcommand)]
    pub command: AppsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AppsCommand {
    /// List installed apps
    #[command(alias = "ls")]
    List,
    /// Launch an app by title
    Launch {
        /// App title as shown by `apps list`
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct ScenesArgs {
    #[command(subcommand)]
    pub command: ScenesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ScenesCommand {
    /// List available scenes
    #[command(alias = "ls")]
    List,
    /// Show the active scene
    Current,
    /// Switch scene by name
    Set {
        /// Scene name as shown by `scenes list`
        name: String,
    },
}

// ── Media / Commands ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct MediaArgs {
    #[command(subcommand)]
    pub command: MediaCommand,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum MediaCommand {
    Play,
    Pause,
    Stop,
    /// Next track or channel
    Next,
    /// Previous track or channel
    Prev,
}

#[derive(Debug, Args)]
pub struct PressArgs {
    /// Button name as shown by `commands` (e.g. "Home", "VolumeUp")
    pub name: String,
}

// ── Info ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InfoArgs {
    #[command(subcommand)]
    pub command: InfoCommand,
}

#[derive(Debug, Subcommand)]
pub enum InfoCommand {
    /// Model, serial, MAC and firmware details
    System,
    /// What is currently on screen
    Playing,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration (PINs redacted)
    Show,

    /// Print the config file path
    Path,

    /// Set the TV address (and optionally MAC) of the active profile
    SetHost {
        /// IP or host[:port]
        host: String,

        /// MAC address for Wake-on-LAN
        #[arg(long)]
        mac: Option<String>,
    },

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
