//! Config subcommand handlers.

use dialoguer::{Confirm, Input, Password, Select};
use secrecy::SecretString;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "connection_request = {}", cfg.defaults.connection_request);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "host = \"{}\"", p.host);
        let _ = writeln!(out, "port = {}", p.port);
        let _ = writeln!(out, "tls = {}", p.tls);
        let _ = writeln!(out, "verify_tls = {}", p.verify_tls);
        if let Some(ref prefix) = p.path_prefix {
            let _ = writeln!(out, "path_prefix = \"{prefix}\"");
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref env) = p.password_env {
            let _ = writeln!(out, "password_env = \"{env}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// The config as JSON with plaintext passwords masked.
fn redacted_value(cfg: &Config) -> serde_json::Value {
    let mut value = serde_json::to_value(cfg).unwrap_or_default();
    if let Some(profiles) = value.get_mut("profiles").and_then(serde_json::Value::as_object_mut) {
        for profile in profiles.values_mut() {
            if let Some(pw) = profile.get_mut("password") {
                *pw = "****".into();
            }
        }
    }
    value
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Offer to store the password in the system keyring or return it for plaintext config.
///
/// Returns `Some(password)` if the user chose plaintext, `None` if stored in keyring.
fn prompt_password_storage(password: String, profile_name: &str) -> Result<Option<String>, CliError> {
    let choices = &[
        "Store in system keyring (recommended)",
        "Save to config file (plaintext)",
    ];
    let selection = Select::new()
        .with_prompt("Where to store the password?")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    if selection == 0 {
        config::store_password(profile_name, &SecretString::from(password))?;
        eprintln!("   ✓ Password stored in system keyring");
        Ok(None)
    } else {
        Ok(Some(password))
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("GenieACS CLI configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let host: String = Input::new()
                .with_prompt("NBI host")
                .default("localhost".into())
                .interact_text()
                .map_err(prompt_err)?;

            let port: u16 = Input::new()
                .with_prompt("NBI port")
                .default(genieacs_api::DEFAULT_PORT)
                .interact_text()
                .map_err(prompt_err)?;

            let tls = Confirm::new()
                .with_prompt("Use HTTPS?")
                .default(false)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile::new(host);
            profile.port = port;
            profile.tls = tls;

            let username: String = Input::new()
                .with_prompt("Username (empty for none)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            if !username.is_empty() {
                let password = Password::new()
                    .with_prompt("Password")
                    .interact()
                    .map_err(prompt_err)?;
                profile.username = Some(username);
                profile.password = prompt_password_storage(password, &profile_name)?;
            }

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: genieacs devices list");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(
                &global.output,
                &redacted_value(&cfg),
                |_| format_config_redacted(&cfg),
                |_| "config".into(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: genieacs config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
                available.sort();
                return Err(CliError::ProfileNotFound {
                    name,
                    available: if available.is_empty() {
                        "(none)".into()
                    } else {
                        available.join(", ")
                    },
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── Set password ───────────────────────────────────────────
        ConfigCommand::SetPassword { for_profile } => {
            let cfg = config::load_config_or_default();
            let profile_name =
                for_profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));

            let password = Password::new()
                .with_prompt(format!("Password for profile '{profile_name}'"))
                .interact()
                .map_err(prompt_err)?;
            config::store_password(&profile_name, &SecretString::from(password))?;
            eprintln!("✓ Password stored in system keyring for '{profile_name}'");
            Ok(())
        }
    }
}
