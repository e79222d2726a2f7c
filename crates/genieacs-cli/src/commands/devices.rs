//! Device command handlers.

use serde_json::Value;
use tabled::Tabled;

use genieacs_api::{Filter, GenieClient, Projection};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
}

#[derive(Tabled)]
struct ParamRow {
    #[tabled(rename = "Parameter")]
    path: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn detail(device: &Value) -> String {
    let id = device.get("_id").map_or_else(|| "-".into(), output::cell);
    let last_inform = device
        .get("_lastInform")
        .map_or_else(|| "-".into(), output::cell);
    let tags = device
        .get("_tags")
        .and_then(Value::as_array)
        .map(|tags| tags.iter().map(output::cell).collect::<Vec<_>>().join(", "))
        .unwrap_or_default();

    [
        format!("ID:          {id}"),
        format!("Last inform: {last_inform}"),
        format!("Tags:        {tags}"),
        String::new(),
        output::render_json_pretty(device),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(client: &GenieClient, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List { filter } => {
            let ids = match filter {
                None => client.device_ids()?,
                Some(raw) => {
                    let filter = Filter::from_value(serde_json::from_str(&raw)?)?;
                    client
                        .devices(Some(&filter), Some(&Projection::parse("_id")))?
                        .iter()
                        .filter_map(|d| d.get("_id").and_then(Value::as_str).map(str::to_owned))
                        .collect()
                }
            };
            let out = output::render_list(
                &global.output,
                &ids,
                |id| DeviceRow { id: id.clone() },
                Clone::clone,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device, mac } => {
            let found = if mac {
                client.device_by_mac(&device)?
            } else {
                client.device_by_id(&device)?
            };
            let device_doc = found.ok_or_else(|| util::not_found("device", &device, "devices list"))?;
            let out = output::render_single(&global.output, &device_doc, detail, |d| {
                d.get("_id").map(output::cell).unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Param { device, paths } => {
            if Projection::parse(&paths).paths().is_empty() {
                return Err(CliError::Validation {
                    field: "paths".into(),
                    reason: "expected at least one parameter path, e.g. Device.DeviceInfo.SoftwareVersion"
                        .into(),
                });
            }
            let tree = client.device_parameters(&device, &paths)?;
            if tree.is_empty() {
                return Err(util::not_found("device", &device, "devices list"));
            }
            let rows: Vec<(String, Value)> = tree
                .leaves()
                .into_iter()
                .map(|(path, value)| (path, value.clone()))
                .collect();
            let out = match global.output {
                OutputFormat::Table => output::render_list(
                    &global.output,
                    &rows,
                    |(path, value)| ParamRow {
                        path: path.clone(),
                        value: output::cell(value),
                    },
                    |(_, value)| output::cell(value),
                ),
                // Structured formats keep the nesting of the parameter tree.
                _ => output::render_single(&global.output, &tree, |_| String::new(), |_| {
                    rows.iter()
                        .map(|(_, value)| output::cell(value))
                        .collect::<Vec<_>>()
                        .join("\n")
                }),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Delete { device } => {
            if !util::confirm(&format!("Delete device {device} and all its data?"), global.yes)? {
                return Ok(());
            }
            client.delete_device(&device)?;
            if !global.quiet {
                eprintln!("Device {device} deleted");
            }
            Ok(())
        }
    }
}
