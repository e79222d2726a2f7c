//! Shared configuration for GenieACS tools.
//!
//! TOML profiles, password resolution (env + keyring + plaintext), and
//! translation to `genieacs_api::ConnectionConfig`. The CLI layers its
//! flag overrides on top of what this crate produces.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use genieacs_api::{ConnectionConfig, Credentials, DEFAULT_PORT};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Keyring service name under which passwords are stored.
pub const KEYRING_SERVICE: &str = "genieacs";

/// Prefix of environment variables overriding config values.
pub const ENV_PREFIX: &str = "GENIEACS_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Ask the server to contact devices immediately when queueing tasks.
    #[serde(default = "default_connection_request")]
    pub connection_request: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            connection_request: default_connection_request(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}
fn default_connection_request() -> bool {
    true
}

/// A named server profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Server host name or IP.
    pub host: String,

    /// NBI port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Use HTTPS.
    #[serde(default)]
    pub tls: bool,

    /// Verify the server certificate (HTTPS only).
    #[serde(default)]
    pub verify_tls: bool,

    /// Path prefix when the NBI sits behind a reverse proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,

    /// Basic-auth user name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Plaintext password. Prefer the keyring or `password_env`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Environment variable name containing the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_env: Option<String>,

    /// Override timeout (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Profile {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            tls: false,
            verify_tls: false,
            path_prefix: None,
            username: None,
            password: None,
            password_env: None,
            timeout: None,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "genieacs", "genieacs").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("genieacs");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + environment.
///
/// Nested keys are separated by a double underscore, e.g.
/// `GENIEACS_DEFAULTS__TIMEOUT=30`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&["password"]));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist or is invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Profile selection ───────────────────────────────────────────────

/// Pick the profile name: explicit request, else `default_profile`, else
/// `"default"`.
pub fn active_profile_name(requested: Option<&str>, cfg: &Config) -> String {
    requested
        .map(str::to_owned)
        .or_else(|| cfg.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the profile's password.
///
/// Order: the profile's `password_env` variable, then `GENIEACS_PASSWORD`,
/// then the system keyring, then plaintext in the profile.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global env var
    if let Ok(val) = std::env::var("GENIEACS_PASSWORD") {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })?;
    entry
        .set_password(password.expose_secret())
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

/// Build a `ConnectionConfig` from a profile alone, without CLI flag overrides.
///
/// A profile without `username` connects unauthenticated; one with a
/// username must resolve a password.
pub fn profile_to_connection_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<ConnectionConfig, ConfigError> {
    if profile.host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }

    let credentials = match profile.username {
        Some(ref username) => Some(Credentials {
            username: username.clone(),
            password: resolve_password(profile, profile_name)?,
        }),
        None => None,
    };

    let config = ConnectionConfig {
        host: profile.host.clone(),
        port: profile.port,
        tls: profile.tls,
        verify_tls: profile.verify_tls,
        credentials,
        path_prefix: profile.path_prefix.clone().unwrap_or_default(),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    };

    // Surface a bad host/prefix here rather than on first request.
    config.base_url().map_err(|e| ConfigError::Validation {
        field: "host".into(),
        reason: e.to_string(),
    })?;

    Ok(config)
}
