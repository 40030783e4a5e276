//! Account command handler.

use ptero_api::PteroClient;
use ptero_api::schema::AccountDetails;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

fn detail(a: &AccountDetails) -> String {
    [
        format!("ID:       {}", a.id),
        format!("Username: {}", a.username),
        format!("Email:    {}", a.email),
        format!("Name:     {} {}", a.first_name, a.last_name),
        format!("Language: {}", a.language),
        format!("Admin:    {}", if a.admin { "yes" } else { "no" }),
    ]
    .join("\n")
}

pub async fn handle(client: &PteroClient, global: &GlobalOpts) -> Result<(), CliError> {
    let account = client.account().get_details().await?;
    let out = output::render_single(global.output, &account, detail, |a| a.username.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
