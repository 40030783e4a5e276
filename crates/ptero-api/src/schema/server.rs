// Client-API server schemas: server listing, resource usage, power.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::nullable;
use super::{NestedList, Schema};

/// A server visible to the client key (`object: "server"`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Server {
    pub server_owner: bool,
    pub identifier: String,
    pub internal_id: u64,
    pub uuid: String,
    pub name: String,
    pub node: String,
    pub sftp_details: SftpDetails,
    pub description: String,
    pub limits: ServerLimits,
    pub invocation: String,
    pub docker_image: String,
    pub egg_features: Vec<String>,
    pub feature_limits: FeatureLimits,
    #[serde(deserialize_with = "nullable")]
    pub status: Option<String>,
    pub is_suspended: bool,
    pub is_installing: bool,
    pub is_transferring: bool,
    pub relationships: ServerRelationships,
}

impl Schema for Server {
    const OBJECT: &'static str = "server";
    type Entity = Self;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SftpDetails {
    pub ip: String,
    pub port: u16,
}

/// Resource limits. `-1` and `0` carry panel-specific meaning (unlimited).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerLimits {
    pub memory: i64,
    pub swap: i64,
    pub disk: i64,
    pub io: i64,
    pub cpu: i64,
    #[serde(deserialize_with = "nullable")]
    pub threads: Option<String>,
    pub oom_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FeatureLimits {
    pub databases: u64,
    pub allocations: u64,
    pub backups: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerRelationships {
    pub allocations: NestedList<ServerAllocation>,
}

/// A network allocation assigned to a server (`object: "allocation"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerAllocation {
    pub id: u64,
    pub ip: String,
    #[serde(deserialize_with = "nullable")]
    pub ip_alias: Option<String>,
    pub port: u16,
    #[serde(deserialize_with = "nullable")]
    pub notes: Option<String>,
    pub is_default: bool,
}

impl Schema for ServerAllocation {
    const OBJECT: &'static str = "allocation";
    type Entity = Self;
}

// ── Power ────────────────────────────────────────────────────────────

/// Lifecycle state reported by the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    Running,
    Offline,
    Starting,
    Stopping,
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Running => "running",
            Self::Offline => "offline",
            Self::Starting => "starting",
            Self::Stopping => "stopping",
        })
    }
}

impl std::str::FromStr for PowerState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "offline" => Ok(Self::Offline),
            "starting" => Ok(Self::Starting),
            "stopping" => Ok(Self::Stopping),
            other => Err(format!("unknown power state `{other}`")),
        }
    }
}

/// A power action requested over HTTP or the console channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerSignal {
    Start,
    Stop,
    Restart,
    Kill,
}

impl PowerSignal {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
            Self::Kill => "kill",
        }
    }
}

impl fmt::Display for PowerSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Resource usage ───────────────────────────────────────────────────

/// A point-in-time usage snapshot (`object: "stats"`).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ResourceUsage {
    pub current_state: PowerState,
    pub is_suspended: bool,
    pub resources: ServerResources,
}

impl Schema for ResourceUsage {
    const OBJECT: &'static str = "stats";
    type Entity = Self;
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerResources {
    pub memory_bytes: u64,
    pub cpu_absolute: f64,
    pub disk_bytes: u64,
    pub network_rx_bytes: u64,
    pub network_tx_bytes: u64,
    pub uptime: u64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::schema::{ListMeta, validate_list, validate_single};

    pub(crate) fn server_json(identifier: &str) -> serde_json::Value {
        json!({
            "object": "server",
            "attributes": {
                "server_owner": true,
                "identifier": identifier,
                "internal_id": 12,
                "uuid": "fe564c9a-3c8e-4a6d-9c4b-7b0b2bb0e8f1",
                "name": "Survival",
                "node": "node-1",
                "sftp_details": { "ip": "sftp.example.com", "port": 2022 },
                "description": "",
                "limits": {
                    "memory": 4096, "swap": -1, "disk": 20480, "io": 500,
                    "cpu": 200, "threads": null, "oom_disabled": true
                },
                "invocation": "java -jar server.jar",
                "docker_image": "ghcr.io/pterodactyl/yolks:java_17",
                "egg_features": ["eula"],
                "feature_limits": { "databases": 1, "allocations": 2, "backups": 3 },
                "status": null,
                "is_suspended": false,
                "is_installing": false,
                "is_transferring": false,
                "relationships": {
                    "allocations": {
                        "object": "list",
                        "data": [{
                            "object": "allocation",
                            "attributes": {
                                "id": 1, "ip": "10.0.0.5", "ip_alias": null,
                                "port": 25565, "notes": null, "is_default": true
                            }
                        }]
                    },
                    "variables": { "object": "list", "data": [] }
                }
            }
        })
    }

    #[test]
    fn server_with_nested_allocations_validates() {
        let server: Server = validate_single(&server_json("fe564c9a")).unwrap();
        assert_eq!(server.identifier, "fe564c9a");
        assert_eq!(server.limits.swap, -1);
        let allocations = server.relationships.allocations.items();
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].port, 25565);
    }

    #[test]
    fn nested_allocation_discriminator_is_checked() {
        let mut value = server_json("a");
        value["attributes"]["relationships"]["allocations"]["data"][0]["object"] = json!("node");
        assert!(validate_single::<Server>(&value).is_err());
    }

    #[test]
    fn server_list_validates() {
        let value = json!({ "object": "list", "data": [server_json("a"), server_json("b")] });
        let list = validate_list::<Server, Option<ListMeta>>(&value).unwrap();
        assert_eq!(list.data.len(), 2);
    }

    #[test]
    fn usage_state_is_a_closed_set() {
        let usage = json!({
            "object": "stats",
            "attributes": {
                "current_state": "running",
                "is_suspended": false,
                "resources": {
                    "memory_bytes": 1024, "cpu_absolute": 12.5, "disk_bytes": 2048,
                    "network_rx_bytes": 1, "network_tx_bytes": 2, "uptime": 3600
                }
            }
        });
        let parsed: ResourceUsage = validate_single(&usage).unwrap();
        assert_eq!(parsed.current_state, PowerState::Running);

        let mut bad = usage;
        bad["attributes"]["current_state"] = json!("exploding");
        assert!(validate_single::<ResourceUsage>(&bad).is_err());
    }

    #[test]
    fn power_signal_serializes_lowercase() {
        assert_eq!(serde_json::to_value(PowerSignal::Restart).unwrap(), json!("restart"));
        assert_eq!("stopping".parse::<PowerState>().unwrap(), PowerState::Stopping);
    }
}
