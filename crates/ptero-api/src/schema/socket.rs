// Console websocket payloads: connection credentials and stats frames.

use serde::{Deserialize, Serialize};
use url::Url;

use super::server::PowerState;

/// Short-lived credentials for a server's console socket.
///
/// Arrives as `{ "data": { "token", "socket" } }`, without an object envelope.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SocketCredentials {
    pub token: String,
    pub socket: Url,
}

impl std::fmt::Debug for SocketCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketCredentials")
            .field("token", &"[REDACTED]")
            .field("socket", &self.socket.as_str())
            .finish()
    }
}

#[derive(Deserialize)]
pub(crate) struct CredentialsEnvelope {
    pub(crate) data: SocketCredentials,
}

/// A resource snapshot pushed by the daemon in a `stats` frame.
///
/// The frame's single argument is itself a JSON document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerStats {
    pub memory_bytes: u64,
    pub memory_limit_bytes: u64,
    pub cpu_absolute: f64,
    pub network: NetworkStats,
    pub state: PowerState,
    pub disk_bytes: u64,
    #[serde(default)]
    pub uptime: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct NetworkStats {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;
    use crate::schema::validate;

    #[test]
    fn credentials_envelope_validates() {
        let value = json!({
            "data": {
                "token": "eyJ0eXAiOiJKV1Qi",
                "socket": "wss://node.example.com:8080/api/servers/fe564c9a/ws"
            }
        });
        let envelope: CredentialsEnvelope = validate(&value).unwrap();
        assert_eq!(envelope.data.socket.scheme(), "wss");
        assert!(!format!("{:?}", envelope.data).contains("eyJ0"));
    }

    #[test]
    fn credentials_require_a_socket_url() {
        let value = json!({ "data": { "token": "t" } });
        assert!(validate::<CredentialsEnvelope>(&value).is_err());
    }

    #[test]
    fn stats_document_parses() {
        let raw = r#"{"memory_bytes":524288000,"memory_limit_bytes":1073741824,
            "cpu_absolute":37.4,"network":{"rx_bytes":1200,"tx_bytes":3400},
            "state":"running","disk_bytes":2147483648,"uptime":9000}"#;
        let stats: ServerStats = serde_json::from_str(raw).unwrap();
        assert_eq!(stats.state, PowerState::Running);
        assert_eq!(stats.network.tx_bytes, 3400);
    }
}
