// ── PteroClient facade ──
//
// One entry point per panel. Credentials are validated once at construction,
// a single HTTP client is built, and every manager shares the dispatchers
// built on top of it.

use std::sync::Arc;

use tracing::debug;

use crate::application::{
    AllocationManager, DatabaseManager, EggManager, LocationManager, NestManager, NodeManager,
    UserManager,
};
use crate::auth::{Credentials, bearer};
use crate::client::{AccountManager, BackupManager, FileManager, ServerManager};
use crate::dispatcher::Dispatcher;
use crate::error::Error;
use crate::transport::ClientOptions;
use crate::websocket::WebsocketManager;

/// Client for one Pterodactyl panel.
///
/// Cheaply cloneable; clones share the connection pool and managers.
#[derive(Clone)]
pub struct PteroClient {
    inner: Arc<Managers>,
}

struct Managers {
    credentials: Credentials,
    account: AccountManager,
    servers: ServerManager,
    files: FileManager,
    backups: BackupManager,
    websocket: WebsocketManager,
    users: UserManager,
    nodes: NodeManager,
    allocations: AllocationManager,
    locations: LocationManager,
    nests: NestManager,
    eggs: EggManager,
    databases: DatabaseManager,
}

impl PteroClient {
    /// Build a client with default transport options.
    ///
    /// Fails with [`Error::InvalidCredentials`] when either value is empty.
    pub fn new(host: &str, api_key: &str) -> Result<Self, Error> {
        Self::from_credentials(Credentials::new(host, api_key)?, &ClientOptions::default())
    }

    pub fn from_credentials(credentials: Credentials, options: &ClientOptions) -> Result<Self, Error> {
        let http = options.build_client()?;

        let client_api = Arc::new(Dispatcher::new(
            http.clone(),
            credentials.host().clone(),
            bearer(credentials.api_key())?,
        ));
        let application_api = if credentials.has_separate_application_key() {
            debug!("using a separate application API key");
            Arc::new(Dispatcher::new(
                http,
                credentials.host().clone(),
                bearer(credentials.application_key())?,
            ))
        } else {
            Arc::clone(&client_api)
        };

        let managers = Managers {
            account: AccountManager::new(Arc::clone(&client_api)),
            servers: ServerManager::new(Arc::clone(&client_api)),
            files: FileManager::new(Arc::clone(&client_api)),
            backups: BackupManager::new(Arc::clone(&client_api)),
            websocket: WebsocketManager::new(client_api, credentials.origin()),
            users: UserManager::new(Arc::clone(&application_api)),
            nodes: NodeManager::new(Arc::clone(&application_api)),
            allocations: AllocationManager::new(Arc::clone(&application_api)),
            locations: LocationManager::new(Arc::clone(&application_api)),
            nests: NestManager::new(Arc::clone(&application_api)),
            eggs: EggManager::new(Arc::clone(&application_api)),
            databases: DatabaseManager::new(application_api),
            credentials,
        };

        Ok(Self {
            inner: Arc::new(managers),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    // ── Client API ───────────────────────────────────────────────────

    pub fn account(&self) -> &AccountManager {
        &self.inner.account
    }

    pub fn servers(&self) -> &ServerManager {
        &self.inner.servers
    }

    pub fn files(&self) -> &FileManager {
        &self.inner.files
    }

    pub fn backups(&self) -> &BackupManager {
        &self.inner.backups
    }

    pub fn websocket(&self) -> &WebsocketManager {
        &self.inner.websocket
    }

    // ── Application API ──────────────────────────────────────────────

    pub fn users(&self) -> &UserManager {
        &self.inner.users
    }

    pub fn nodes(&self) -> &NodeManager {
        &self.inner.nodes
    }

    pub fn allocations(&self) -> &AllocationManager {
        &self.inner.allocations
    }

    pub fn locations(&self) -> &LocationManager {
        &self.inner.locations
    }

    pub fn nests(&self) -> &NestManager {
        &self.inner.nests
    }

    pub fn eggs(&self) -> &EggManager {
        &self.inner.eggs
    }

    pub fn databases(&self) -> &DatabaseManager {
        &self.inner.databases
    }
}

impl std::fmt::Debug for PteroClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PteroClient")
            .field("host", &self.inner.credentials.host().as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn rejects_blank_credentials() {
        let err = PteroClient::new("  ", "ptlc_key").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }

    #[test]
    fn debug_shows_host_only() {
        let client = PteroClient::new("https://panel.example.com", "ptlc_secret").unwrap();
        let rendered = format!("{client:?}");
        assert!(rendered.contains("panel.example.com"));
        assert!(!rendered.contains("ptlc_secret"));
    }
}
