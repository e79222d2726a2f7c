//! Command dispatch: bridges CLI args -> GenieClient calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod faults;
pub mod files;
pub mod records;
pub mod tags;
pub mod tasks;
pub mod util;

use genieacs_api::{CollectionKind, GenieClient};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub fn dispatch(
    cmd: Command,
    client: &GenieClient,
    global: &GlobalOpts,
    connection_request: bool,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(client, args, global),
        Command::Tasks(args) => tasks::handle(client, args, global, connection_request),
        Command::Tags(args) => tags::handle(client, args, global),
        Command::Presets(args) => records::handle(client, CollectionKind::Presets, args, global),
        Command::Objects(args) => records::handle(client, CollectionKind::Objects, args, global),
        Command::Provisions(args) => {
            records::handle(client, CollectionKind::Provisions, args, global)
        }
        Command::Files(args) => files::handle(client, args, global),
        Command::Faults(args) => faults::handle(client, args, global),
        // Handled in main before a client exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
