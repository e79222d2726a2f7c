//! CLI error types with miette diagnostics.
//!
//! Maps library and config errors into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use genieacs_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to GenieACS at {url}")]
    #[diagnostic(
        code(genieacs::connection_failed),
        help(
            "Check that the NBI is running and reachable.\n\
             URL: {url}\n\
             The NBI listens on port 7557 unless configured otherwise."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(genieacs::tls_error),
        help("Drop --verify-tls to accept a self-signed certificate.")
    )]
    TlsError { message: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(genieacs::timeout),
        help("Increase timeout with --timeout or check server responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed")]
    #[diagnostic(
        code(genieacs::auth_failed),
        help(
            "Verify the NBI username and password.\n\
             Run: genieacs config set-password --for-profile {profile}"
        )
    )]
    AuthFailed { profile: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(genieacs::no_credentials),
        help(
            "Store one with: genieacs config set-password\n\
             Or set the GENIEACS_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(genieacs::not_found),
        help("Run: genieacs {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Server returned HTTP {status}: {body}")]
    #[diagnostic(code(genieacs::http))]
    Http { status: u16, body: String },

    #[error("Malformed data: {message}")]
    #[diagnostic(
        code(genieacs::malformed),
        help("Check the JSON file contents and try again.")
    )]
    Malformed { message: String },

    #[error("{succeeded} of {total} records imported")]
    #[diagnostic(
        code(genieacs::partial_import),
        help("The failed records were logged above; fix them and import again.")
    )]
    PartialImport { succeeded: usize, total: usize },

    #[error(transparent)]
    #[diagnostic(code(genieacs::api))]
    Api(genieacs_api::Error),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(genieacs::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(genieacs::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: genieacs config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(genieacs::no_config),
        help(
            "Create a profile with: genieacs config init\n\
             Or pass --host. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(genieacs::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(genieacs::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(genieacs::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } | Self::Http { status: 404, .. } => {
                exit_code::NOT_FOUND
            }
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error mapping ────────────────────────────────────────────

impl From<genieacs_api::Error> for CliError {
    fn from(err: genieacs_api::Error) -> Self {
        use genieacs_api::Error;

        match err {
            Error::Connection { url, source } => CliError::ConnectionFailed {
                url,
                source: Box::new(source),
            },
            Error::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },
            Error::Tls(message) => CliError::TlsError { message },
            Error::Http { status: 401, .. } => CliError::AuthFailed {
                profile: "current".into(),
            },
            Error::Http { status, body } => CliError::Http { status, body },
            Error::MalformedData { message } => CliError::Malformed { message },
            other => CliError::Api(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
