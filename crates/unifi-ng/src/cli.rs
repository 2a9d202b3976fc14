//! Clap derive structures for the `unifi-ng` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept free
//! of crate-internal imports so build.rs can compile it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// unifi-ng -- scriptable access to UniFi Network controllers
#[derive(Debug, Parser)]
#[command(
    name = "unifi-ng",
    version,
    about = "Manage UniFi Network controllers from the command line",
    long_about = "Talks to self-hosted Network Applications and UniFi OS consoles alike.\n\n\
        The controller flavor is detected at login; the same commands work\n\
        against both.",
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
    /// Controller profile to use
    #[arg(long, short = 'p', env = "UNIFI_NG_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Full controller URL (overrides host/port)
    #[arg(long, short = 'c', env = "UNIFI_NG_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Controller hostname or IP
    #[arg(long, env = "UNIFI_NG_HOST", global = true)]
    pub host: Option<String>,

    /// Controller HTTPS port (443 for consoles, 8443 for self-hosted)
    #[arg(long, env = "UNIFI_NG_PORT", global = true)]
    pub port: Option<u16>,

    /// Site name
    #[arg(long, short = 's', env = "UNIFI_NG_SITE", global = true)]
    pub site: Option<String>,

    /// Login username
    #[arg(long, short = 'u', env = "UNIFI_NG_USERNAME", global = true)]
    pub username: Option<String>,

    /// Login password
    #[arg(long, env = "UNIFI_NG_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Verify the controller's TLS certificate
    #[arg(long, env = "UNIFI_NG_VERIFY_TLS", global = true)]
    pub verify_tls: bool,

    /// Request timeout in seconds
    #[arg(long, env = "UNIFI_NG_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "UNIFI_NG_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List adopted devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// List active and historical clients
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Read and edit firewall policies
    #[command(alias = "fw")]
    Firewall(FirewallArgs),

    /// Import DHCP reservations (fixed IPs, local DNS records)
    #[command(alias = "res")]
    Reservations(ReservationsArgs),

    /// Manage network member groups
    #[command(alias = "grp")]
    Groups(GroupsArgs),

    /// Controller-wide site listing
    Sites(SitesArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List adopted devices
    #[command(alias = "ls")]
    List,
}

// ── Clients ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// Currently connected clients
    Active,

    /// Clients seen in the past, including offline ones
    History {
        /// Include blocked clients
        #[arg(long)]
        include_blocked: bool,

        /// Leave UniFi devices out of the listing
        #[arg(long)]
        exclude_unifi_devices: bool,

        /// Only clients seen within this many hours (0 = no limit)
        #[arg(long, default_value = "0")]
        within_hours: u32,
    },
}

// ── Firewall ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FirewallArgs {
    #[command(subcommand)]
    pub command: FirewallCommand,
}

#[derive(Debug, Subcommand)]
pub enum FirewallCommand {
    /// List firewall policies
    #[command(alias = "ls")]
    List,

    /// Show one firewall policy
    Get {
        /// Policy ID (`_id`)
        id: String,
    },

    /// Replace a policy with the JSON in a file
    Update {
        /// Policy ID (`_id`)
        id: String,

        /// JSON file holding the full policy
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Point a policy's IP list at a hostname's current IPv4 addresses
    SetIps {
        /// Description that identifies the policy (e.g. "wl001")
        #[arg(long)]
        description: String,

        /// Hostname to resolve
        #[arg(long)]
        hostname: String,

        /// Which side of the policy receives the addresses
        #[arg(long, value_enum, default_value = "source")]
        target: PolicyTarget,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyTarget {
    Source,
    Destination,
}

// ── Reservations ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ReservationsArgs {
    #[command(subcommand)]
    pub command: ReservationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReservationsCommand {
    /// Upload reservations from a CSV file or a router configuration dump
    Import {
        /// Input file
        file: PathBuf,

        /// Input format
        #[arg(long, short = 'f', value_enum, default_value = "csv")]
        format: ImportFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ImportFormat {
    /// Columns: mac, fixed_ip, name, local_dns_record, note
    Csv,
    /// EdgeRouter `static-mapping` configuration
    #[value(alias = "er")]
    Edgerouter,
    /// OPNsense `<staticmap>` XML configuration
    #[value(alias = "opns")]
    Opnsense,
}

// ── Groups ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List network member groups
    #[command(alias = "ls")]
    List,

    /// Create a group
    Add {
        /// Group name
        name: String,

        /// Member MAC address (repeatable)
        #[arg(long = "member", short = 'm')]
        members: Vec<String>,

        /// Group type
        #[arg(long = "type", default_value = "CLIENTS")]
        group_type: String,
    },

    /// Create missing groups and set memberships from a CSV (columns: mac, group_name)
    Sync {
        /// CSV file
        file: PathBuf,
    },
}

// ── Sites ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// Paged overview of all sites on the controller
    Overview {
        #[arg(long, default_value = "1000")]
        page_size: u32,

        #[arg(long, default_value = "0")]
        page_number: u32,

        /// Filter by name
        #[arg(long, default_value = "")]
        search: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a profile with guided setup
    Init,

    /// Display the current configuration
    Show,

    /// Store a profile's password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        name: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
