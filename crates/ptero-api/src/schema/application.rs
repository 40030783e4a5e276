// Application-API schemas (`/api/application`).
//
// Administrative timestamps are kept as strings; only the fields that
// downstream code reads are typed more tightly.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::common::nullable;
use super::{Schema, Tagged};

macro_rules! identity_schema {
    ($ty:ty, $object:literal) => {
        impl Schema for $ty {
            const OBJECT: &'static str = $object;
            type Entity = Self;
        }
    };
}

// ── Users ────────────────────────────────────────────────────────────

/// A panel user as seen by an administrator (`object: "user"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub external_id: Option<String>,
    pub uuid: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub language: String,
    pub root_admin: bool,
    #[serde(rename = "2fa", default)]
    pub two_factor: bool,
    pub created_at: String,
    pub updated_at: String,
}

identity_schema!(User, "user");

// ── Nodes ────────────────────────────────────────────────────────────

/// A daemon host (`object: "node"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Node {
    pub id: u64,
    pub uuid: String,
    pub public: bool,
    pub name: String,
    pub description: String,
    pub location_id: u64,
    pub fqdn: String,
    pub scheme: String,
    pub behind_proxy: bool,
    pub maintenance_mode: bool,
    pub memory: u64,
    pub memory_overallocate: i64,
    pub disk: u64,
    pub disk_overallocate: i64,
    pub upload_size: u64,
    pub daemon_listen: u16,
    pub daemon_sftp: u16,
    pub daemon_base: String,
    pub created_at: String,
    pub updated_at: String,
}

identity_schema!(Node, "node");

/// Daemon configuration document for a node. Not enveloped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeConfiguration {
    pub debug: bool,
    pub uuid: String,
    pub token_id: String,
    pub token: String,
    pub api: NodeApiConfiguration,
    pub system: NodeSystemConfiguration,
    pub remote: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeApiConfiguration {
    pub host: String,
    pub port: u16,
    pub upload_limit: u64,
    pub ssl: NodeSslConfiguration,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeSslConfiguration {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeSystemConfiguration {
    pub data: String,
    pub sftp: NodeSftpConfiguration,
    pub disk_overallocate: i64,
    pub memory_overallocate: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeSftpConfiguration {
    pub bind_address: String,
    pub port: u16,
}

// ── Allocations ──────────────────────────────────────────────────────

/// An IP/port pair on a node (`object: "allocation"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Allocation {
    pub id: u64,
    pub ip: String,
    #[serde(deserialize_with = "nullable")]
    pub alias: Option<String>,
    pub port: u16,
    #[serde(deserialize_with = "nullable")]
    pub notes: Option<String>,
    pub assigned: bool,
}

identity_schema!(Allocation, "allocation");

// ── Locations ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Location {
    pub id: u64,
    pub short: String,
    pub long: String,
    pub created_at: String,
    pub updated_at: String,
}

identity_schema!(Location, "location");

// ── Nests & eggs ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Nest {
    pub id: u64,
    pub uuid: String,
    pub author: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

identity_schema!(Nest, "nest");

/// A server template inside a nest (`object: "egg"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Egg {
    pub id: u64,
    pub uuid: String,
    pub name: String,
    pub nest: u64,
    pub author: String,
    pub description: String,
    pub docker_image: String,
    pub config: EggConfig,
    pub startup: String,
    #[serde(default)]
    pub script: Value,
    pub created_at: String,
    pub updated_at: String,
}

identity_schema!(Egg, "egg");

/// Daemon-side egg configuration. The panel stores these as free-form JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EggConfig {
    #[serde(default)]
    pub files: Value,
    #[serde(default)]
    pub startup: Value,
    #[serde(default)]
    pub stop: Value,
    #[serde(default)]
    pub logs: Value,
    #[serde(default)]
    pub extends: Value,
}

// ── Databases ────────────────────────────────────────────────────────

/// A server database (`object: "database"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Database {
    pub id: u64,
    pub server: u64,
    pub host: u64,
    pub database: String,
    pub username: String,
    pub remote: String,
    #[serde(deserialize_with = "nullable")]
    pub max_connections: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
    /// Present only when requested with `?include=password,host`.
    #[serde(default)]
    pub relationships: Option<DatabaseRelationships>,
}

identity_schema!(Database, "database");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseRelationships {
    #[serde(default, deserialize_with = "tagged_opt")]
    pub password: Option<DatabasePassword>,
    #[serde(default, deserialize_with = "tagged_opt")]
    pub host: Option<DatabaseHost>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabasePassword {
    pub password: String,
}

identity_schema!(DatabasePassword, "DatabasePassword");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatabaseHost {
    pub id: u64,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(deserialize_with = "nullable")]
    pub node: Option<u64>,
    pub created_at: String,
    pub updated_at: String,
}

identity_schema!(DatabaseHost, "database_host");

/// An optional relationship entry, validated through its own envelope.
fn tagged_opt<'de, D, S>(deserializer: D) -> Result<Option<S>, D::Error>
where
    D: Deserializer<'de>,
    S: Schema,
{
    Ok(Option::<Tagged<S>>::deserialize(deserializer)?.map(|tagged| tagged.0))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::schema::{validate, validate_single};

    #[test]
    fn database_relationships_are_validated_when_present() {
        let value = json!({
            "object": "database",
            "attributes": {
                "id": 1, "server": 5, "host": 4,
                "database": "s5_main", "username": "u5_abc", "remote": "%",
                "max_connections": null,
                "created_at": "2024-01-01T00:00:00+00:00",
                "updated_at": "2024-01-01T00:00:00+00:00",
                "relationships": {
                    "password": {
                        "object": "DatabasePassword",
                        "attributes": { "password": "hunter2" }
                    },
                    "host": {
                        "object": "database_host",
                        "attributes": {
                            "id": 4, "name": "primary", "host": "10.0.0.9", "port": 3306,
                            "username": "ptero", "node": null,
                            "created_at": "2024-01-01T00:00:00+00:00",
                            "updated_at": "2024-01-01T00:00:00+00:00"
                        }
                    }
                }
            }
        });

        let db: Database = validate_single(&value).unwrap();
        let rel = db.relationships.unwrap();
        assert_eq!(rel.password.unwrap().password, "hunter2");
        assert_eq!(rel.host.unwrap().port, 3306);
    }

    #[test]
    fn database_without_relationships_validates() {
        let value = json!({
            "object": "database",
            "attributes": {
                "id": 1, "server": 5, "host": 4,
                "database": "s5_main", "username": "u5_abc", "remote": "%",
                "max_connections": 10,
                "created_at": "2024-01-01T00:00:00+00:00",
                "updated_at": "2024-01-01T00:00:00+00:00"
            }
        });
        let db: Database = validate_single(&value).unwrap();
        assert!(db.relationships.is_none());
        assert_eq!(db.max_connections, Some(10));
    }

    #[test]
    fn wrong_relationship_discriminator_is_rejected() {
        let value = json!({
            "password": { "object": "password", "attributes": { "password": "x" } }
        });
        assert!(validate::<DatabaseRelationships>(&value).is_err());
    }

    #[test]
    fn egg_config_accepts_free_form_values() {
        let value = json!({
            "object": "egg",
            "attributes": {
                "id": 3, "uuid": "e1", "name": "Paper", "nest": 1,
                "author": "parker@pterodactyl.io", "description": "",
                "docker_image": "ghcr.io/pterodactyl/yolks:java_17",
                "config": {
                    "files": {"server.properties": {"parser": "properties"}},
                    "startup": {"done": ")! For help, type "},
                    "stop": "stop",
                    "logs": [],
                    "extends": null
                },
                "startup": "java -jar {{SERVER_JARFILE}}",
                "created_at": "2024-01-01T00:00:00+00:00",
                "updated_at": "2024-01-01T00:00:00+00:00"
            }
        });
        let egg: Egg = validate_single(&value).unwrap();
        assert_eq!(egg.config.stop, json!("stop"));
        assert_eq!(egg.script, Value::Null);
    }

    #[test]
    fn user_two_factor_is_renamed() {
        let value = json!({
            "object": "user",
            "attributes": {
                "id": 1, "external_id": null, "uuid": "u1", "username": "admin",
                "email": "admin@example.com", "first_name": "Ada", "last_name": "Admin",
                "language": "en", "root_admin": true, "2fa": true,
                "created_at": "2024-01-01T00:00:00+00:00",
                "updated_at": "2024-01-01T00:00:00+00:00"
            }
        });
        let user: User = validate_single(&value).unwrap();
        assert!(user.two_factor);
        assert!(user.root_admin);
    }
}
