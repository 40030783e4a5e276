//! Server command handlers.

use tabled::Tabled;

use ptero_api::schema::{ResourceUsage, Server};
use ptero_api::{PowerSignal, PteroClient};

use crate::cli::{GlobalOpts, ServersArgs, ServersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ServerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Node")]
    node: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Server> for ServerRow {
    fn from(s: &Server) -> Self {
        Self {
            id: s.identifier.clone(),
            name: s.name.clone(),
            node: s.node.clone(),
            address: default_address(s).unwrap_or_default(),
            status: status(s).into(),
        }
    }
}

fn default_address(s: &Server) -> Option<String> {
    let allocations = s.relationships.allocations.items();
    allocations
        .iter()
        .find(|a| a.is_default)
        .or_else(|| allocations.first())
        .map(|a| format!("{}:{}", a.ip_alias.as_deref().unwrap_or(&a.ip), a.port))
}

fn status(s: &Server) -> &str {
    if s.is_suspended {
        "suspended"
    } else if s.is_installing {
        "installing"
    } else if s.is_transferring {
        "transferring"
    } else {
        util::or_dash(s.status.as_deref())
    }
}

fn limit(value: i64, unit: &str) -> String {
    match value {
        0 => "unlimited".into(),
        v if v < 0 => "disabled".into(),
        v => format!("{v} {unit}"),
    }
}

fn detail(s: &Server) -> String {
    [
        format!("ID:       {}", s.identifier),
        format!("UUID:     {}", s.uuid),
        format!("Name:     {}", s.name),
        format!("Node:     {}", s.node),
        format!("Status:   {}", status(s)),
        format!("Address:  {}", default_address(s).as_deref().unwrap_or("-")),
        format!("SFTP:     {}:{}", s.sftp_details.ip, s.sftp_details.port),
        format!("Image:    {}", s.docker_image),
        format!("Memory:   {}", limit(s.limits.memory, "MiB")),
        format!("Disk:     {}", limit(s.limits.disk, "MiB")),
        format!("CPU:      {}", limit(s.limits.cpu, "%")),
        format!(
            "Features: {} databases, {} allocations, {} backups",
            s.feature_limits.databases, s.feature_limits.allocations, s.feature_limits.backups
        ),
    ]
    .join("\n")
}

fn usage_detail(u: &ResourceUsage, color: bool) -> String {
    [
        format!("State:    {}", output::power_state(u.current_state, color)),
        format!("CPU:      {:.1}%", u.resources.cpu_absolute),
        format!("Memory:   {}", output::bytes(u.resources.memory_bytes)),
        format!("Disk:     {}", output::bytes(u.resources.disk_bytes)),
        format!(
            "Network:  rx {} / tx {}",
            output::bytes(u.resources.network_rx_bytes),
            output::bytes(u.resources.network_tx_bytes)
        ),
        format!("Uptime:   {}s", u.resources.uptime / 1000),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &PteroClient,
    args: ServersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ServersCommand::List => {
            let page = client.servers().list().await?;
            let out = output::render_list(
                global.output,
                &page.items,
                |s| ServerRow::from(s),
                |s| s.identifier.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServersCommand::Show { server } => {
            let details = client.servers().get_details(&server).await?;
            let out = output::render_single(global.output, &details, detail, |s| {
                s.identifier.clone()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServersCommand::Usage { server } => {
            let usage = client.servers().resource_usage(&server).await?;
            let color = output::should_color(global.color);
            let out = output::render_single(
                global.output,
                &usage,
                |u| usage_detail(u, color),
                |u| u.current_state.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServersCommand::Start { server } => power(client, &server, PowerSignal::Start, global).await,
        ServersCommand::Stop { server } => power(client, &server, PowerSignal::Stop, global).await,
        ServersCommand::Restart { server } => {
            power(client, &server, PowerSignal::Restart, global).await
        }
        ServersCommand::Kill { server } => {
            if !util::confirm(
                &format!("Kill server '{server}'? Unsaved data may be lost."),
                "kill",
                global.yes,
            )? {
                return Ok(());
            }
            power(client, &server, PowerSignal::Kill, global).await
        }

        ServersCommand::Command { server, command } => {
            let line = command.join(" ");
            client.servers().send_command(&server, &line).await?;
            output::notice(&format!("Sent to {server}: {line}"), global.quiet);
            Ok(())
        }
    }
}

async fn power(
    client: &PteroClient,
    server: &str,
    signal: PowerSignal,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    client.servers().power(server, signal)?.await?;
    output::notice(&format!("Sent {signal} signal to {server}"), global.quiet);
    Ok(())
}
