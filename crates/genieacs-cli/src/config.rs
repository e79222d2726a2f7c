//! CLI configuration: a thin wrapper around `genieacs_config` shared types.
//!
//! Re-exports the shared types and layers the `GlobalOpts` flag overrides
//! (--host, --port, --username, ...) on top of the selected profile.

use genieacs_api::{ConnectionConfig, Credentials};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use genieacs_config::{
    Config, Defaults, Profile, config_path, load_config_or_default, save_config, store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    genieacs_config::active_profile_name(global.profile.as_deref(), config)
}

/// Connection settings for one CLI invocation.
#[derive(Debug)]
pub struct Resolved {
    pub connection: ConnectionConfig,
    /// Whether queued tasks should trigger an immediate connection request.
    pub connection_request: bool,
}

/// Build connection settings from the config file, profile, and CLI overrides.
///
/// Without a matching profile, `--host` alone is enough to connect.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let base = match (cfg.profiles.get(&profile_name), global.host.as_deref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(host)) => Profile::new(host),
        (None, None) if global.profile.is_some() => {
            let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let connection = resolve_profile(base, &profile_name, global, &cfg.defaults)?;
    Ok(Resolved {
        connection,
        connection_request: cfg.defaults.connection_request && !global.no_connection_request,
    })
}

/// Translate a `Profile` + global flags into a `ConnectionConfig`.
///
/// CLI flag overrides take priority over profile values.
fn resolve_profile(
    mut profile: Profile,
    profile_name: &str,
    global: &GlobalOpts,
    defaults: &Defaults,
) -> Result<ConnectionConfig, CliError> {
    if let Some(ref host) = global.host {
        profile.host.clone_from(host);
    }
    if let Some(port) = global.port {
        profile.port = port;
    }
    if global.tls {
        profile.tls = true;
        profile.verify_tls = global.verify_tls;
    }
    if let Some(ref prefix) = global.path_prefix {
        profile.path_prefix = Some(prefix.clone());
    }
    if let Some(ref username) = global.username {
        profile.username = Some(username.clone());
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    // An explicit --password bypasses the env/keyring/plaintext chain.
    let Some(ref password) = global.password else {
        return Ok(genieacs_config::profile_to_connection_config(
            &profile,
            profile_name,
            defaults,
        )?);
    };
    let username = profile.username.take().ok_or_else(|| CliError::Validation {
        field: "password".into(),
        reason: "--password needs a username (--username or profile)".into(),
    })?;

    let mut connection =
        genieacs_config::profile_to_connection_config(&profile, profile_name, defaults)?;
    connection.credentials = Some(Credentials::new(username, password.clone()));
    Ok(connection)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["genieacs"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["faults", "list"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn lab_config() -> Config {
        let mut profile = Profile::new("acs.lab");
        profile.port = 8080;
        profile.timeout = Some(20);

        let mut cfg = Config::default();
        cfg.default_profile = Some("lab".into());
        cfg.profiles.insert("lab".into(), profile);
        cfg
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let resolved = resolve(&global(&[]), &lab_config()).unwrap();
        assert_eq!(resolved.connection.host, "acs.lab");
        assert_eq!(resolved.connection.port, 8080);
        assert_eq!(resolved.connection.timeout, Duration::from_secs(20));
        assert!(resolved.connection_request);
    }

    #[test]
    fn flags_override_profile() {
        let g = global(&[
            "--host",
            "10.1.1.1",
            "--port",
            "7557",
            "--tls",
            "--timeout",
            "3",
            "--no-connection-request",
        ]);
        let resolved = resolve(&g, &lab_config()).unwrap();
        assert_eq!(resolved.connection.host, "10.1.1.1");
        assert_eq!(resolved.connection.port, 7557);
        assert!(resolved.connection.tls);
        assert!(!resolved.connection.verify_tls);
        assert_eq!(resolved.connection.timeout, Duration::from_secs(3));
        assert!(!resolved.connection_request);
    }

    #[test]
    fn explicit_password_builds_credentials() {
        let g = global(&["--username", "admin", "--password", "hunter2"]);
        let resolved = resolve(&g, &lab_config()).unwrap();
        let creds = resolved.connection.credentials.unwrap();
        assert_eq!(creds.username, "admin");
    }

    #[test]
    fn host_flag_works_without_profile() {
        let g = global(&["--host", "acs.local"]);
        let resolved = resolve(&g, &Config::default()).unwrap();
        assert_eq!(resolved.connection.host, "acs.local");
        assert_eq!(resolved.connection.port, 7557);
    }

    #[test]
    fn unknown_profile_is_reported() {
        let g = global(&["--profile", "missing"]);
        let err = resolve(&g, &lab_config()).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { ref available, .. } if available == "lab"));
    }

    #[test]
    fn nothing_configured_is_no_config() {
        let err = resolve(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }
}
