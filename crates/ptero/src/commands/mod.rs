//! Command dispatch: bridges CLI args -> manager calls -> output formatting.

pub mod account;
pub mod backups;
pub mod config_cmd;
pub mod console;
pub mod files;
pub mod nodes;
pub mod servers;
pub mod users;
pub mod util;

use ptero_api::PteroClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a panel-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &PteroClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Account => account::handle(client, global).await,
        Command::Servers(args) => servers::handle(client, args, global).await,
        Command::Backups(args) => backups::handle(client, args, global).await,
        Command::Files(args) => files::handle(client, args, global).await,
        Command::Console(args) => console::handle(client, args, global).await,
        Command::Nodes(args) => nodes::handle(client, args, global).await,
        Command::Users(args) => users::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
