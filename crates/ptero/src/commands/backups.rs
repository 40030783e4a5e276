//! Backup command handlers.

use tabled::Tabled;

use ptero_api::schema::Backup;
use ptero_api::{BackupOptions, PteroClient};

use crate::cli::{BackupsArgs, BackupsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct BackupRow {
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&Backup> for BackupRow {
    fn from(b: &Backup) -> Self {
        Self {
            uuid: b.uuid.clone(),
            name: b.name.clone(),
            size: output::bytes(b.bytes),
            state: state(b).into(),
            created: b.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn state(b: &Backup) -> &'static str {
    match (b.is_complete(), b.is_successful, b.is_locked) {
        (false, _, _) => "pending",
        (true, false, _) => "failed",
        (true, true, true) => "locked",
        (true, true, false) => "ok",
    }
}

fn detail(b: &Backup) -> String {
    [
        format!("UUID:      {}", b.uuid),
        format!("Name:      {}", b.name),
        format!("State:     {}", state(b)),
        format!("Size:      {}", output::bytes(b.bytes)),
        format!("Checksum:  {}", util::or_dash(b.checksum.as_deref())),
        format!("Created:   {}", b.created_at.to_rfc3339()),
        format!(
            "Completed: {}",
            b.completed_at
                .map_or_else(|| "-".into(), |at| at.to_rfc3339())
        ),
        format!(
            "Ignored:   {}",
            if b.ignored_files.is_empty() {
                "-".into()
            } else {
                b.ignored_files.join(", ")
            }
        ),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &PteroClient,
    args: BackupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BackupsCommand::List { server } => {
            let page = client.backups().list(&server).await?;
            let out = output::render_list(
                global.output,
                &page.items,
                |b| BackupRow::from(b),
                |b| b.uuid.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BackupsCommand::Create {
            server,
            name,
            locked,
        } => {
            let backup = client
                .backups()
                .create(&server, BackupOptions { name, locked })
                .await?;
            let out = output::render_single(global.output, &backup, detail, |b| b.uuid.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BackupsCommand::Show { server, backup } => {
            let backup = client.backups().get_details(&server, &backup).await?;
            let out = output::render_single(global.output, &backup, detail, |b| b.uuid.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BackupsCommand::DownloadUrl { server, backup } => {
            let url = client.backups().get_download_link(&server, &backup).await?;
            output::print_output(url.as_str(), global.quiet);
            Ok(())
        }

        BackupsCommand::Delete { server, backup } => {
            if !util::confirm(
                &format!("Delete backup '{backup}' of server '{server}'?"),
                "delete backup",
                global.yes,
            )? {
                return Ok(());
            }
            client.backups().delete(&server, &backup).await?;
            output::notice("Backup deleted", global.quiet);
            Ok(())
        }
    }
}
