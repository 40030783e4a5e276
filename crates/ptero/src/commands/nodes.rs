//! Node command handlers (application API).

use tabled::Tabled;

use ptero_api::PteroClient;
use ptero_api::schema::Node;

use crate::cli::{GlobalOpts, NodesArgs, NodesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "FQDN")]
    fqdn: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "Disk")]
    disk: String,
    #[tabled(rename = "Maintenance")]
    maintenance: String,
}

impl From<&Node> for NodeRow {
    fn from(n: &Node) -> Self {
        Self {
            id: n.id,
            name: n.name.clone(),
            fqdn: n.fqdn.clone(),
            memory: format!("{} MiB", n.memory),
            disk: format!("{} MiB", n.disk),
            maintenance: if n.maintenance_mode { "yes" } else { "no" }.into(),
        }
    }
}

fn detail(n: &Node) -> String {
    [
        format!("ID:          {}", n.id),
        format!("UUID:        {}", n.uuid),
        format!("Name:        {}", n.name),
        format!("Location:    {}", n.location_id),
        format!("Daemon:      {}://{}:{}", n.scheme, n.fqdn, n.daemon_listen),
        format!("SFTP port:   {}", n.daemon_sftp),
        format!("Memory:      {} MiB ({}% overallocate)", n.memory, n.memory_overallocate),
        format!("Disk:        {} MiB ({}% overallocate)", n.disk, n.disk_overallocate),
        format!("Public:      {}", if n.public { "yes" } else { "no" }),
        format!("Maintenance: {}", if n.maintenance_mode { "yes" } else { "no" }),
    ]
    .join("\n")
}

pub async fn handle(
    client: &PteroClient,
    args: NodesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NodesCommand::List => {
            let page = client.nodes().list().await?;
            let out = output::render_list(
                global.output,
                &page.items,
                |n| NodeRow::from(n),
                |n| n.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NodesCommand::Show { node } => {
            let node = client.nodes().get(node).await?;
            let out = output::render_single(global.output, &node, detail, |n| n.id.to_string())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
