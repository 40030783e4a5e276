//! User command handlers (application API).

use tabled::Tabled;

use ptero_api::PteroClient;
use ptero_api::schema::User;

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Admin")]
    admin: String,
    #[tabled(rename = "2FA")]
    two_factor: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            admin: if u.root_admin { "yes" } else { "no" }.into(),
            two_factor: if u.two_factor { "on" } else { "off" }.into(),
        }
    }
}

pub async fn handle(
    client: &PteroClient,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        UsersCommand::List => {
            let page = client.users().list().await?;
            let out = output::render_list(
                global.output,
                &page.items,
                |u| UserRow::from(u),
                |u| u.username.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
