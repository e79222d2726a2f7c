//! Task command handlers.

use tabled::Tabled;

use genieacs_api::{GenieClient, ParameterValue, Task};

use crate::cli::{GlobalOpts, TasksArgs, TasksCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Retries")]
    retries: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            timestamp: output::opt_cell(t.timestamp.as_ref()),
            retries: output::opt_cell(t.retries.as_ref()),
        }
    }
}

fn queued(global: &GlobalOpts, what: &str, device: &str, connection_request: bool) {
    if global.quiet {
        return;
    }
    if connection_request {
        eprintln!("{what} queued for {device}");
    } else {
        eprintln!("{what} queued for {device} (applied at next inform)");
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub fn handle(
    client: &GenieClient,
    args: TasksArgs,
    global: &GlobalOpts,
    connection_request: bool,
) -> Result<(), CliError> {
    match args.command {
        TasksCommand::List { device } => {
            let tasks = client.tasks_for_device(&device)?;
            let out = output::render_list(&global.output, &tasks, |t| TaskRow::from(t), |t| t.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TasksCommand::Refresh { device, object } => {
            client.refresh_object(&device, &object, connection_request)?;
            queued(global, "refreshObject", &device, connection_request);
            Ok(())
        }

        TasksCommand::Set {
            device,
            values,
            value_type,
        } => {
            let parameter_values = values
                .iter()
                .map(|raw| {
                    let (path, value) = util::parse_assignment(raw)?;
                    let pv = ParameterValue::new(path, value);
                    Ok(match value_type {
                        Some(ref t) => pv.typed(t.clone()),
                        None => pv,
                    })
                })
                .collect::<Result<Vec<_>, CliError>>()?;
            client.set_parameter_values(&device, parameter_values, connection_request)?;
            queued(global, "setParameterValues", &device, connection_request);
            Ok(())
        }

        TasksCommand::Get { device, parameters } => {
            client.get_parameter_values(&device, parameters, connection_request)?;
            queued(global, "getParameterValues", &device, connection_request);
            Ok(())
        }

        TasksCommand::AddObject { device, object } => {
            client.add_object(&device, &object, connection_request)?;
            queued(global, "addObject", &device, connection_request);
            Ok(())
        }

        TasksCommand::Reboot { device } => {
            if !util::confirm(&format!("Reboot {device}?"), global.yes)? {
                return Ok(());
            }
            client.reboot(&device, connection_request)?;
            queued(global, "reboot", &device, connection_request);
            Ok(())
        }

        TasksCommand::FactoryReset { device } => {
            if !util::confirm(
                &format!("Factory-reset {device}? All device configuration will be lost."),
                global.yes,
            )? {
                return Ok(());
            }
            client.factory_reset(&device, connection_request)?;
            queued(global, "factoryReset", &device, connection_request);
            Ok(())
        }

        TasksCommand::Download {
            device,
            file,
            file_type,
            target,
        } => {
            client.download(
                &device,
                &file_type,
                &file,
                target.as_deref(),
                connection_request,
            )?;
            queued(global, "download", &device, connection_request);
            Ok(())
        }

        TasksCommand::Retry { task } => {
            client.retry_task(&task)?;
            if !global.quiet {
                eprintln!("Task {task} retried");
            }
            Ok(())
        }

        TasksCommand::Delete { task } => {
            client.delete_task(&task)?;
            if !global.quiet {
                eprintln!("Task {task} deleted");
            }
            Ok(())
        }

        TasksCommand::Export { device, file } => {
            let tasks = client.export_tasks(&device, &file)?;
            if !global.quiet {
                eprintln!("Exported {} tasks to {}", tasks.len(), file.display());
            }
            Ok(())
        }

        TasksCommand::Import { file } => {
            let report = client.import_tasks(&file, connection_request)?;
            util::finish_import(&report, global.quiet)
        }
    }
}
