//! File command handlers.

use tabled::Tabled;

use ptero_api::PteroClient;
use ptero_api::schema::FileObject;

use crate::cli::{FilesArgs, FilesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct FileRow {
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&FileObject> for FileRow {
    fn from(f: &FileObject) -> Self {
        Self {
            mode: f.mode.clone(),
            size: if f.is_directory() {
                "-".into()
            } else {
                output::bytes(f.size)
            },
            modified: f.modified_at.to_string(),
            name: if f.is_directory() {
                format!("{}/", f.name)
            } else {
                f.name.clone()
            },
        }
    }
}

pub async fn handle(
    client: &PteroClient,
    args: FilesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FilesCommand::List { server, directory } => {
            let mut entries = client.files().list(&server, directory.as_deref()).await?;
            // Directories first, then by name
            entries.sort_by(|a, b| {
                b.is_directory()
                    .cmp(&a.is_directory())
                    .then_with(|| a.name.cmp(&b.name))
            });
            let out = output::render_list(
                global.output,
                &entries,
                |f| FileRow::from(f),
                |f| f.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        FilesCommand::Cat { server, path } => {
            let content = client.files().get_content(&server, &path).await?;
            if !global.quiet {
                print!("{content}");
            }
            Ok(())
        }
    }
}
