use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::PowerAction;
use crate::dispatcher::Dispatcher;
use crate::endpoint::client;
use crate::error::{Error, Failure};
use crate::resource::{Page, Resource};
use crate::schema::{self, PowerSignal, ResourceUsage, Server};

/// Servers visible to the client key, plus their power controls.
pub struct ServerManager {
    servers: Resource<Server>,
}

impl ServerManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            servers: Resource::new(dispatcher, client::SERVERS, client::SERVER),
        }
    }

    fn dispatcher(&self) -> &Arc<Dispatcher> {
        self.servers.dispatcher()
    }

    pub async fn list(&self) -> Result<Page<Server>, Error> {
        self.servers
            .list(&[], &[], || "Failed to list servers!".to_owned())
            .await
    }

    pub async fn get_details(&self, server_id: &str) -> Result<Server, Error> {
        self.servers
            .get(&[("server_id", server_id)], || {
                format!("Failed to get details of server {server_id}!")
            })
            .await
    }

    pub async fn resource_usage(&self, server_id: &str) -> Result<ResourceUsage, Error> {
        let url = self
            .dispatcher()
            .url(client::RESOURCES, &[("server_id", server_id)])?;
        let result: Result<_, Failure> = async {
            let body = self.dispatcher().get(url).await?;
            Ok(schema::validate_single::<ResourceUsage>(&body)?)
        }
        .await;
        result.map_err(|failure| {
            failure.normalize(|| format!("Failed to get resource usage of server {server_id}!"))
        })
    }

    /// Send a console command over HTTP. The daemon must be running.
    pub async fn send_command(&self, server_id: &str, command: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            command: &'a str,
        }

        let url = self
            .dispatcher()
            .url(client::COMMAND, &[("server_id", server_id)])?;
        debug!(server = server_id, "sending console command");
        self.dispatcher()
            .post(url, &Body { command })
            .await
            .map(drop)
            .map_err(|err| {
                Failure::from(err)
                    .normalize(|| format!("Failed to send command to server {server_id}!"))
            })
    }

    // ── Power ────────────────────────────────────────────────────────

    /// Request a power state change without waiting for the panel.
    ///
    /// Must be called within a Tokio runtime. The returned [`PowerAction`]
    /// resolves to the outcome.
    pub fn power(&self, server_id: &str, signal: PowerSignal) -> Result<PowerAction, Error> {
        let url = self
            .dispatcher()
            .url(client::POWER, &[("server_id", server_id)])?;
        Ok(PowerAction::spawn(
            Arc::clone(self.dispatcher()),
            url,
            server_id,
            signal,
        ))
    }

    pub fn start(&self, server_id: &str) -> Result<PowerAction, Error> {
        self.power(server_id, PowerSignal::Start)
    }

    pub fn stop(&self, server_id: &str) -> Result<PowerAction, Error> {
        self.power(server_id, PowerSignal::Stop)
    }

    pub fn restart(&self, server_id: &str) -> Result<PowerAction, Error> {
        self.power(server_id, PowerSignal::Restart)
    }

    pub fn kill(&self, server_id: &str) -> Result<PowerAction, Error> {
        self.power(server_id, PowerSignal::Kill)
    }
}
