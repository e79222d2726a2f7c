//! Tag command handlers.

use tabled::Tabled;

use genieacs_api::GenieClient;

use crate::cli::{GlobalOpts, TagsArgs, TagsCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct TagRow {
    #[tabled(rename = "Tag")]
    tag: String,
}

pub fn handle(client: &GenieClient, args: TagsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        TagsCommand::List { device } => {
            let tags = client.tags(&device)?;
            let out = output::render_list(
                &global.output,
                &tags,
                |t| TagRow { tag: t.clone() },
                Clone::clone,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TagsCommand::Add { device, tag } => {
            client.assign_tag(&device, &tag)?;
            if !global.quiet {
                eprintln!("Tagged {device} with '{tag}'");
            }
            Ok(())
        }

        TagsCommand::Remove { device, tag } => {
            client.remove_tag(&device, &tag)?;
            if !global.quiet {
                eprintln!("Removed tag '{tag}' from {device}");
            }
            Ok(())
        }
    }
}
