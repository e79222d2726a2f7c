//! Clap derive structures for the `genieacs` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// genieacs -- drive a GenieACS server from the command line
#[derive(Debug, Parser)]
#[command(
    name = "genieacs",
    version,
    about = "Manage GenieACS devices, tasks and provisioning from the command line",
    long_about = "A CLI for the GenieACS northbound interface (NBI).\n\n\
        Queries CPE devices, queues TR-069 tasks, and manages presets,\n\
        objects, provisions, files and faults.",
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
    /// Server profile to use
    #[arg(long, short = 'p', env = "GENIEACS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// NBI host name or IP (overrides profile)
    #[arg(long, short = 'H', env = "GENIEACS_HOST", global = true)]
    pub host: Option<String>,

    /// NBI port (overrides profile)
    #[arg(long, env = "GENIEACS_PORT", global = true)]
    pub port: Option<u16>,

    /// Connect over HTTPS
    #[arg(long, global = true)]
    pub tls: bool,

    /// Verify the server certificate (with --tls)
    #[arg(long, global = true, requires = "tls")]
    pub verify_tls: bool,

    /// URL path prefix when the NBI sits behind a reverse proxy
    #[arg(long, env = "GENIEACS_PATH_PREFIX", global = true)]
    pub path_prefix: Option<String>,

    /// Basic-auth user name
    #[arg(long, short = 'u', env = "GENIEACS_USERNAME", global = true)]
    pub username: Option<String>,

    /// Basic-auth password
    #[arg(long, env = "GENIEACS_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "GENIEACS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Queue tasks without asking the server to contact the device now
    #[arg(long, global = true)]
    pub no_connection_request: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "GENIEACS_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

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

// ── Output Format ────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Query and delete CPE devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Queue, list, retry and delete device tasks
    #[command(alias = "t")]
    Tasks(TasksArgs),

    /// Manage device tags
    Tags(TagsArgs),

    /// Manage presets
    Presets(RecordsArgs),

    /// Manage objects
    Objects(RecordsArgs),

    /// Manage provision scripts
    Provisions(RecordsArgs),

    /// Manage stored files (firmware, configuration)
    Files(FilesArgs),

    /// View and clear device faults
    Faults(FaultsArgs),

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
    /// List device IDs
    #[command(alias = "ls")]
    List {
        /// MongoDB-style filter as JSON, e.g. '{"_tags":"lab"}'
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },

    /// Show a full device document
    Get {
        /// Device ID, or WAN MAC address with --mac
        device: String,

        /// Look the device up by WAN MAC address
        #[arg(long)]
        mac: bool,
    },

    /// Read parameter values from the server's last known state
    #[command(alias = "params")]
    Param {
        /// Device ID
        device: String,

        /// Comma-separated parameter paths
        paths: String,
    },

    /// Delete a device and its data from the server
    #[command(alias = "rm")]
    Delete {
        /// Device ID
        device: String,
    },
}

// ── Tasks ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

#[derive(Debug, Subcommand)]
pub enum TasksCommand {
    /// List pending tasks of a device
    #[command(alias = "ls")]
    List {
        /// Device ID
        device: String,
    },

    /// Refresh an object or parameter from the device
    Refresh {
        /// Device ID
        device: String,

        /// Object or parameter path
        object: String,
    },

    /// Set parameter values (PATH=VALUE pairs)
    Set {
        /// Device ID
        device: String,

        /// Assignments such as Device.ManagementServer.PeriodicInformInterval=300
        #[arg(required = true, value_name = "PATH=VALUE")]
        values: Vec<String>,

        /// xsd type applied to every value (e.g. xsd:unsignedInt)
        #[arg(long = "type", value_name = "XSD_TYPE")]
        value_type: Option<String>,
    },

    /// Fetch parameter values from the device
    Get {
        /// Device ID
        device: String,

        /// Parameter paths
        #[arg(required = true)]
        parameters: Vec<String>,
    },

    /// Add an instance of a multi-instance object
    AddObject {
        /// Device ID
        device: String,

        /// Object path, e.g. InternetGatewayDevice.WANDevice.1.WANConnectionDevice.
        object: String,
    },

    /// Reboot a device
    Reboot {
        /// Device ID
        device: String,
    },

    /// Factory-reset a device
    FactoryReset {
        /// Device ID
        device: String,
    },

    /// Push a stored file to a device
    Download {
        /// Device ID
        device: String,

        /// Name of the file on the server
        file: String,

        /// TR-069 file type
        #[arg(long, default_value = "1 Firmware Upgrade Image")]
        file_type: String,

        /// File name on the device
        #[arg(long)]
        target: Option<String>,
    },

    /// Retry a faulted task
    Retry {
        /// Task ID
        task: String,
    },

    /// Delete a queued task
    #[command(alias = "rm")]
    Delete {
        /// Task ID
        task: String,
    },

    /// Write a device's pending tasks to a JSON file
    Export {
        /// Device ID
        device: String,

        /// Destination file
        file: PathBuf,
    },

    /// Queue every task in a JSON file on its device
    Import {
        /// Source file
        file: PathBuf,
    },
}

// ── Tags ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    /// List a device's tags
    #[command(alias = "ls")]
    List {
        /// Device ID
        device: String,
    },

    /// Tag a device
    Add {
        /// Device ID
        device: String,
        /// Tag name
        tag: String,
    },

    /// Untag a device
    #[command(alias = "rm")]
    Remove {
        /// Device ID
        device: String,
        /// Tag name
        tag: String,
    },
}

// ── Presets / Objects / Provisions ───────────────────────────────────

/// Shared by the three name-keyed configuration collections.
#[derive(Debug, Args)]
pub struct RecordsArgs {
    #[command(subcommand)]
    pub command: RecordsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordsCommand {
    /// List every record
    #[command(alias = "ls")]
    List,

    /// Show one record
    Get {
        /// Record name
        name: String,
    },

    /// Create or replace a record
    Put {
        /// Record name
        name: String,

        /// JSON body (presets, objects) or script text (provisions)
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record name
        name: String,
    },

    /// Write every record to a JSON file
    Export {
        /// Destination file
        file: PathBuf,
    },

    /// Create or replace every record in a JSON file
    Import {
        /// Source file
        file: PathBuf,
    },
}

// ── Files ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FilesArgs {
    #[command(subcommand)]
    pub command: FilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum FilesCommand {
    /// List stored files
    #[command(alias = "ls")]
    List,

    /// Show a stored file's metadata
    Get {
        /// File name
        name: String,
    },

    /// Upload a local file
    #[command(disable_version_flag = true)]
    Upload {
        /// Name to store the file under
        name: String,

        /// Local file to upload
        source: PathBuf,

        /// TR-069 file type
        #[arg(long, default_value = "1 Firmware Upgrade Image")]
        file_type: String,

        /// Manufacturer OUI the file applies to
        #[arg(long, default_value = "")]
        oui: String,

        /// Product class the file applies to
        #[arg(long, default_value = "")]
        product_class: String,

        /// Software version of the file
        #[arg(long, default_value = "")]
        version: String,
    },

    /// Download a stored file
    Download {
        /// File name
        name: String,

        /// Destination path (defaults to the file name in the current directory)
        dest: Option<PathBuf>,
    },

    /// Delete a stored file
    #[command(alias = "rm")]
    Delete {
        /// File name
        name: String,
    },
}

// ── Faults ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FaultsArgs {
    #[command(subcommand)]
    pub command: FaultsCommand,
}

#[derive(Debug, Subcommand)]
pub enum FaultsCommand {
    /// List faults
    #[command(alias = "ls")]
    List {
        /// Only faults of this device
        #[arg(long, short = 'd')]
        device: Option<String>,
    },

    /// Clear a fault
    #[command(alias = "rm")]
    Delete {
        /// Fault ID ({device}:{channel})
        fault: String,
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
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile to store the password for (defaults to the active profile)
        #[arg(long)]
        for_profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
