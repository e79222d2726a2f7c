//! Fault command handlers.

use tabled::Tabled;

use genieacs_api::{Fault, GenieClient};

use crate::cli::{FaultsArgs, FaultsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FaultRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Message")]
    message: String,
    #[tabled(rename = "Retries")]
    retries: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
}

impl From<&Fault> for FaultRow {
    fn from(f: &Fault) -> Self {
        Self {
            id: f.id.clone(),
            code: output::opt_cell(f.code.as_ref()),
            message: output::opt_cell(f.message.as_ref()),
            retries: output::opt_cell(f.retries.as_ref()),
            timestamp: output::opt_cell(f.timestamp.as_ref()),
        }
    }
}

pub fn handle(client: &GenieClient, args: FaultsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        FaultsCommand::List { device } => {
            let faults = match device {
                Some(ref id) => client.faults_for_device(id)?,
                None => client.faults()?,
            };
            let out = output::render_list(
                &global.output,
                &faults,
                |f| FaultRow::from(f),
                |f| f.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FaultsCommand::Delete { fault } => {
            client.delete_fault(&fault)?;
            if !global.quiet {
                eprintln!("Fault {fault} cleared");
            }
            Ok(())
        }
    }
}
