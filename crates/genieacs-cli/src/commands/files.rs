//! Stored file command handlers.

use std::path::PathBuf;

use tabled::Tabled;

use genieacs_api::{FileMetadata, GenieClient, StoredFile};

use crate::cli::{FilesArgs, FilesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    file_type: String,
    #[tabled(rename = "OUI")]
    oui: String,
    #[tabled(rename = "Product class")]
    product_class: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Size")]
    length: String,
}

impl From<&StoredFile> for FileRow {
    fn from(f: &StoredFile) -> Self {
        Self {
            name: f.id.clone(),
            file_type: f.metadata.file_type.clone(),
            oui: f.metadata.oui.clone(),
            product_class: f.metadata.product_class.clone(),
            version: f.metadata.version.clone(),
            length: output::opt_cell(f.length.as_ref()),
        }
    }
}

fn detail(f: &StoredFile) -> String {
    [
        format!("Name:          {}", f.id),
        format!("Type:          {}", f.metadata.file_type),
        format!("OUI:           {}", f.metadata.oui),
        format!("Product class: {}", f.metadata.product_class),
        format!("Version:       {}", f.metadata.version),
        format!("Size:          {}", output::opt_cell(f.length.as_ref())),
        format!("Uploaded:      {}", output::opt_cell(f.upload_date.as_ref())),
    ]
    .join("\n")
}

pub fn handle(client: &GenieClient, args: FilesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        FilesCommand::List => {
            let files = client.files()?;
            let out = output::render_list(
                &global.output,
                &files,
                |f| FileRow::from(f),
                |f| f.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FilesCommand::Get { name } => {
            let file = client
                .file_metadata(&name)?
                .ok_or_else(|| util::not_found("file", &name, "files list"))?;
            let out = output::render_single(&global.output, &file, detail, |f| f.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FilesCommand::Upload {
            name,
            source,
            file_type,
            oui,
            product_class,
            version,
        } => {
            let metadata = FileMetadata {
                file_type,
                oui,
                product_class,
                version,
            };
            client.upload_file(&name, &source, &metadata)?;
            if !global.quiet {
                eprintln!("Uploaded {} as '{name}'", source.display());
            }
            Ok(())
        }

        FilesCommand::Download { name, dest } => {
            let dest = dest.unwrap_or_else(|| PathBuf::from(&name));
            let size = client.download_file(&name, &dest)?;
            if !global.quiet {
                eprintln!("Wrote {size} bytes to {}", dest.display());
            }
            Ok(())
        }

        FilesCommand::Delete { name } => {
            if !util::confirm(&format!("Delete file '{name}'?"), global.yes)? {
                return Ok(());
            }
            client.delete_file(&name)?;
            if !global.quiet {
                eprintln!("Deleted file '{name}'");
            }
            Ok(())
        }
    }
}
