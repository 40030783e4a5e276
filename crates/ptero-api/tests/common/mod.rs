// Shared fixtures for the wiremock-backed integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use serde_json::{Value, json};
use wiremock::MockServer;

use ptero_api::PteroClient;

pub const SERVER_ID: &str = "fe564c9a";
pub const API_KEY: &str = "ptlc_test_key";

pub async fn setup() -> (MockServer, PteroClient) {
    let server = MockServer::start().await;
    let client = PteroClient::new(&server.uri(), API_KEY).unwrap();
    (server, client)
}

pub fn pagination(total: u64) -> Value {
    json!({
        "total": total,
        "count": total,
        "per_page": 50,
        "current_page": 1,
        "total_pages": 1,
        "links": {}
    })
}

pub fn backup(uuid: &str, name: &str) -> Value {
    json!({
        "object": "backup",
        "attributes": {
            "uuid": uuid,
            "is_successful": true,
            "is_locked": false,
            "name": name,
            "ignored_files": [],
            "checksum": "sha1:0123abcd",
            "bytes": 2048,
            "created_at": "2024-02-10T03:00:00+00:00",
            "completed_at": "2024-02-10T03:01:12+00:00"
        }
    })
}

pub fn pending_backup(uuid: &str, name: &str) -> Value {
    let mut value = backup(uuid, name);
    value["attributes"]["checksum"] = Value::Null;
    value["attributes"]["completed_at"] = Value::Null;
    value["attributes"]["bytes"] = json!(0);
    value
}

pub fn file_object(name: &str, is_file: bool) -> Value {
    json!({
        "object": "file_object",
        "attributes": {
            "name": name,
            "mode": if is_file { "-rw-r--r--" } else { "drwxr-xr-x" },
            "mode_bits": if is_file { "644" } else { "755" },
            "size": if is_file { 1024 } else { 4096 },
            "is_file": is_file,
            "is_symlink": false,
            "mimetype": if is_file { "text/plain" } else { "inode/directory" },
            "created_at": "2024-01-05T10:00:00+00:00",
            "modified_at": "2024-01-06T11:30:00+00:00"
        }
    })
}

pub fn server(identifier: &str, name: &str) -> Value {
    json!({
        "object": "server",
        "attributes": {
            "server_owner": true,
            "identifier": identifier,
            "internal_id": 12,
            "uuid": format!("{identifier}-3c8e-4a6d-9c4b-7b0b2bb0e8f1"),
            "name": name,
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
                }
            }
        }
    })
}

pub fn location(id: u64, short: &str) -> Value {
    json!({
        "object": "location",
        "attributes": {
            "id": id,
            "short": short,
            "long": format!("{short} datacenter"),
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        }
    })
}

pub fn user(id: u64, username: &str) -> Value {
    json!({
        "object": "user",
        "attributes": {
            "id": id,
            "external_id": null,
            "uuid": "c4022c6c-9bf1-4a23-bff9-519cceb38335",
            "username": username,
            "email": format!("{username}@example.com"),
            "first_name": "Ada",
            "last_name": "Lovelace",
            "language": "en",
            "root_admin": false,
            "2fa": false,
            "created_at": "2024-01-01T00:00:00+00:00",
            "updated_at": "2024-01-01T00:00:00+00:00"
        }
    })
}

pub fn list(items: Vec<Value>) -> Value {
    let total = items.len() as u64;
    json!({
        "object": "list",
        "data": items,
        "meta": { "pagination": pagination(total) }
    })
}

pub fn api_error(status: &str, code: &str, detail: &str) -> Value {
    json!({
        "errors": [{ "code": code, "status": status, "detail": detail }]
    })
}
