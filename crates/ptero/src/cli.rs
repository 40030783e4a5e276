//! Clap derive structures for the `ptero` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// ptero -- manage Pterodactyl game servers from the command line
#[derive(Debug, Parser)]
#[command(
    name = "ptero",
    version,
    about = "Manage Pterodactyl game servers from the command line",
    long_about = "A CLI for the Pterodactyl panel.\n\n\
        Uses the client API for servers, files, backups and the live console,\n\
        and the application API for panel administration.",
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
    /// Panel profile to use
    #[arg(long, short = 'p', env = "PTERO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Panel URL (overrides profile)
    #[arg(long, env = "PTERO_HOST", global = true)]
    pub host: Option<String>,

    /// Client API key
    #[arg(long, env = "PTERO_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Application API key, if different from the client key
    #[arg(long, env = "PTERO_APPLICATION_KEY", global = true, hide_env_values = true)]
    pub application_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PTERO_OUTPUT",
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

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PTERO_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PTERO_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
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
    /// Show the account that owns the API key
    Account,

    /// List, inspect and control servers
    #[command(alias = "srv", alias = "s")]
    Servers(ServersArgs),

    /// Manage server backups
    #[command(alias = "bk")]
    Backups(BackupsArgs),

    /// Browse server files
    Files(FilesArgs),

    /// Attach to a server console and stream its output
    Console(ConsoleArgs),

    /// Panel nodes (application API)
    Nodes(NodesArgs),

    /// Panel users (application API)
    Users(UsersArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Servers ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ServersArgs {
    #[command(subcommand)]
    pub command: ServersCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServersCommand {
    /// List servers visible to the API key
    #[command(alias = "ls")]
    List,

    /// Show server details
    Show { server: String },

    /// Show live resource usage
    Usage { server: String },

    /// Start a server
    Start { server: String },

    /// Stop a server
    Stop { server: String },

    /// Restart a server
    Restart { server: String },

    /// Kill a server process
    Kill { server: String },

    /// Send a console command
    Command {
        server: String,
        /// Command line to send, e.g. `say hello`
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

// ── Backups ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BackupsArgs {
    #[command(subcommand)]
    pub command: BackupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BackupsCommand {
    /// List backups of a server
    #[command(alias = "ls")]
    List { server: String },

    /// Create a backup
    Create {
        server: String,
        /// Backup name (defaults to a timestamped name)
        #[arg(long, short = 'n')]
        name: Option<String>,
        /// Lock the backup against deletion
        #[arg(long)]
        locked: bool,
    },

    /// Show backup details
    Show { server: String, backup: String },

    /// Print a signed download URL
    DownloadUrl { server: String, backup: String },

    /// Delete a backup
    #[command(alias = "rm")]
    Delete { server: String, backup: String },
}

// ── Files ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FilesArgs {
    #[command(subcommand)]
    pub command: FilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// List a directory
    #[command(alias = "ls")]
    List {
        server: String,
        /// Directory to list (defaults to the server root)
        directory: Option<String>,
    },

    /// Print a file's contents
    Cat { server: String, path: String },
}

// ── Console ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConsoleArgs {
    pub server: String,

    /// Send this command once authenticated
    #[arg(long, short = 'c')]
    pub command: Option<String>,

    /// Also print resource stats frames
    #[arg(long)]
    pub stats: bool,
}

// ── Application API ──────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct NodesArgs {
    #[command(subcommand)]
    pub command: NodesCommand,
}

#[derive(Debug, Subcommand)]
pub enum NodesCommand {
    /// List nodes
    #[command(alias = "ls")]
    List,

    /// Show node details
    Show { node: u64 },
}

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List panel users
    #[command(alias = "ls")]
    List,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration (secrets redacted)
    Show,

    /// Print the config file location
    Path,

    /// Add or replace a profile
    SetProfile {
        name: String,
        /// Panel URL
        #[arg(long)]
        panel: String,
        /// Environment variable holding the client API key
        #[arg(long)]
        api_key_env: Option<String>,
        /// Make this the default profile
        #[arg(long)]
        default: bool,
    },

    /// Store an API key in the OS keyring (read from stdin)
    SetKey {
        /// Profile the key belongs to
        name: String,
        /// Store the application key instead of the client key
        #[arg(long)]
        application: bool,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
