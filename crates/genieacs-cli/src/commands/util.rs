//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use genieacs_api::ImportReport;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Refuses outright when stdin isn't a terminal so scripts fail loudly
/// instead of hanging on a prompt.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

pub fn not_found(resource_type: &str, identifier: &str, list_command: &str) -> CliError {
    CliError::NotFound {
        resource_type: resource_type.into(),
        identifier: identifier.into(),
        list_command: list_command.into(),
    }
}

/// Print an import summary; any failed record turns into a non-zero exit.
pub fn finish_import(report: &ImportReport, quiet: bool) -> Result<(), CliError> {
    if !quiet {
        eprintln!(
            "Imported {} of {} records",
            report.imported.len(),
            report.total()
        );
        for failure in &report.failures {
            let key = failure.key.as_deref().unwrap_or("<no key>");
            eprintln!("  ✗ #{} {key}: {}", failure.index, failure.error);
        }
    }
    if report.is_complete() {
        Ok(())
    } else {
        Err(CliError::PartialImport {
            succeeded: report.imported.len(),
            total: report.total(),
        })
    }
}

/// Split `PATH=VALUE` on the first `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), CliError> {
    match raw.split_once('=') {
        Some((path, value)) if !path.is_empty() => Ok((path.to_owned(), value.to_owned())),
        _ => Err(CliError::Validation {
            field: "values".into(),
            reason: format!("expected PATH=VALUE, got '{raw}'"),
        }),
    }
}
