//! Preset, object and provision command handlers.
//!
//! The three collections share one command tree; `CollectionKind` picks
//! the endpoint and how `put --from-file` reads its body.

use serde_json::Value;
use tabled::Tabled;

use genieacs_api::{CollectionKind, GenieClient};

use crate::cli::{GlobalOpts, RecordsArgs, RecordsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

fn record_name(doc: &Value) -> String {
    doc.get("_id").map(output::cell).unwrap_or_default()
}

fn summary(kind: CollectionKind, doc: &Value) -> String {
    match kind {
        CollectionKind::Presets => format!(
            "channel={} weight={}",
            doc.get("channel").map_or_else(|| "-".into(), output::cell),
            doc.get("weight").map_or_else(|| "-".into(), output::cell),
        ),
        CollectionKind::Provisions => {
            let script = doc.get("script").and_then(Value::as_str).unwrap_or_default();
            format!("{} lines", script.lines().count())
        }
        CollectionKind::Objects => doc
            .as_object()
            .map(|map| {
                map.keys()
                    .filter(|k| !k.starts_with('_'))
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default(),
    }
}

fn singular(kind: CollectionKind) -> &'static str {
    match kind {
        CollectionKind::Presets => "preset",
        CollectionKind::Objects => "object",
        CollectionKind::Provisions => "provision",
    }
}

pub fn handle(
    client: &GenieClient,
    kind: CollectionKind,
    args: RecordsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let collection = client.collection(kind);

    match args.command {
        RecordsCommand::List => {
            let docs = collection.list()?;
            let out = output::render_list(
                &global.output,
                &docs,
                |d| RecordRow {
                    name: record_name(d),
                    summary: summary(kind, d),
                },
                record_name,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordsCommand::Get { name } => {
            let doc = collection
                .get(&name)?
                .ok_or_else(|| util::not_found(singular(kind), &name, &format!("{kind} list")))?;
            let out = output::render_single(
                &global.output,
                &doc,
                |d| match (kind, d.get("script").and_then(Value::as_str)) {
                    (CollectionKind::Provisions, Some(script)) => script.to_owned(),
                    _ => output::render_json_pretty(d),
                },
                record_name,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordsCommand::Put { name, from_file } => {
            let body = match kind {
                CollectionKind::Provisions => Value::String(std::fs::read_to_string(&from_file)?),
                _ => util::read_json_file(&from_file)?,
            };
            collection.put(&name, body)?;
            if !global.quiet {
                eprintln!("Saved {} '{name}'", singular(kind));
            }
            Ok(())
        }

        RecordsCommand::Delete { name } => {
            if !util::confirm(&format!("Delete {} '{name}'?", singular(kind)), global.yes)? {
                return Ok(());
            }
            collection.delete(&name)?;
            if !global.quiet {
                eprintln!("Deleted {} '{name}'", singular(kind));
            }
            Ok(())
        }

        RecordsCommand::Export { file } => {
            let docs = collection.export(&file)?;
            if !global.quiet {
                eprintln!("Exported {} {kind} to {}", docs.len(), file.display());
            }
            Ok(())
        }

        RecordsCommand::Import { file } => {
            let report = collection.import(&file)?;
            util::finish_import(&report, global.quiet)
        }
    }
}
