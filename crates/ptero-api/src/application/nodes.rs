use std::sync::Arc;

use serde::Serialize;

use crate::dispatcher::Dispatcher;
use crate::endpoint::application;
use crate::error::{Error, Failure};
use crate::resource::{Page, Resource};
use crate::schema::{self, Allocation, Node, NodeConfiguration};

/// Body for [`NodeManager::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewNode {
    pub name: String,
    pub location_id: u64,
    pub fqdn: String,
    /// `http` or `https`.
    pub scheme: String,
    pub memory: u64,
    pub memory_overallocate: i64,
    pub disk: u64,
    pub disk_overallocate: i64,
    pub upload_size: u64,
    pub daemon_listen: u16,
    pub daemon_sftp: u16,
}

/// Body for [`NodeManager::update`]. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_overallocate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_overallocate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daemon_listen: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daemon_sftp: Option<u16>,
}

pub struct NodeManager {
    nodes: Resource<Node>,
}

impl NodeManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            nodes: Resource::new(dispatcher, application::NODES, application::NODE),
        }
    }

    pub async fn list(&self) -> Result<Page<Node>, Error> {
        self.nodes
            .list(&[], &[], || "Failed to list nodes!".to_owned())
            .await
    }

    pub async fn get(&self, node_id: u64) -> Result<Node, Error> {
        let id = node_id.to_string();
        self.nodes
            .get(&[("node_id", id.as_str())], || format!("Failed to get node {node_id}!"))
            .await
    }

    /// The daemon configuration document (`config.yml` contents) for a node.
    pub async fn configuration(&self, node_id: u64) -> Result<NodeConfiguration, Error> {
        let id = node_id.to_string();
        let dispatcher = self.nodes.dispatcher();
        let url = dispatcher.url(application::NODE_CONFIGURATION, &[("node_id", id.as_str())])?;
        let result: Result<_, Failure> = async {
            let body = dispatcher.get(url).await?;
            Ok(schema::validate::<NodeConfiguration>(&body)?)
        }
        .await;
        result.map_err(|failure| {
            failure.normalize(|| format!("Failed to get configuration of node {node_id}!"))
        })
    }

    pub async fn create(&self, node: &NewNode) -> Result<Node, Error> {
        self.nodes
            .create(&[], node, || format!("Failed to create node {}!", node.name))
            .await
    }

    pub async fn update(&self, node_id: u64, update: &NodeUpdate) -> Result<Node, Error> {
        let id = node_id.to_string();
        self.nodes
            .update(&[("node_id", id.as_str())], update, || {
                format!("Failed to update node {node_id}!")
            })
            .await
    }

    pub async fn delete(&self, node_id: u64) -> Result<(), Error> {
        let id = node_id.to_string();
        self.nodes
            .delete(&[("node_id", id.as_str())], || {
                format!("Failed to delete node {node_id}!")
            })
            .await
    }
}

/// Body for [`AllocationManager::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAllocations {
    pub ip: String,
    /// Single ports (`"25565"`) or ranges (`"25565-25570"`).
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// IP/port allocations of a node.
pub struct AllocationManager {
    allocations: Resource<Allocation>,
}

impl AllocationManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            allocations: Resource::new(
                dispatcher,
                application::ALLOCATIONS,
                application::ALLOCATION,
            ),
        }
    }

    pub async fn list(&self, node_id: u64) -> Result<Page<Allocation>, Error> {
        let id = node_id.to_string();
        self.allocations
            .list(&[("node_id", id.as_str())], &[], || {
                format!("Failed to list allocations of node {node_id}!")
            })
            .await
    }

    /// Add allocations. The panel answers with no body.
    pub async fn create(&self, node_id: u64, allocations: &NewAllocations) -> Result<(), Error> {
        let id = node_id.to_string();
        self.allocations
            .submit(&[("node_id", id.as_str())], allocations, || {
                format!("Failed to create allocations on node {node_id}!")
            })
            .await
    }

    pub async fn delete(&self, node_id: u64, allocation_id: u64) -> Result<(), Error> {
        let node = node_id.to_string();
        let allocation = allocation_id.to_string();
        self.allocations
            .delete(
                &[("node_id", node.as_str()), ("allocation_id", allocation.as_str())],
                || format!("Failed to delete allocation {allocation_id} of node {node_id}!"),
            )
            .await
    }
}
