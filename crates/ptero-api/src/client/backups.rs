use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use url::Url;

use crate::dispatcher::Dispatcher;
use crate::endpoint::client;
use crate::error::{Error, Failure};
use crate::resource::{Page, Resource};
use crate::schema::{self, Backup, BackupAttributes, BackupListMeta, SignedUrl};

/// Options for [`BackupManager::create`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupOptions {
    /// Backup name. Empty or unset falls back to a timestamped default.
    pub name: Option<String>,
    /// Locked backups cannot be deleted until unlocked.
    pub locked: bool,
}

impl BackupOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            locked: false,
        }
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

#[derive(Serialize)]
struct CreateBody<'a> {
    name: &'a str,
    is_locked: bool,
}

/// Backups of a server.
pub struct BackupManager {
    backups: Resource<BackupAttributes, BackupListMeta>,
}

impl BackupManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            backups: Resource::new(dispatcher, client::BACKUPS, client::BACKUP),
        }
    }

    pub async fn list(&self, server_id: &str) -> Result<Page<Backup, BackupListMeta>, Error> {
        self.backups
            .list(&[("server_id", server_id)], &[], || {
                format!("Failed to list backups for {server_id}!")
            })
            .await
    }

    /// Start a backup. The returned backup is usually still in progress.
    pub async fn create(&self, server_id: &str, options: BackupOptions) -> Result<Backup, Error> {
        let name = match options.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => default_backup_name(),
        };
        let body = CreateBody {
            name: &name,
            is_locked: options.locked,
        };
        self.backups
            .create(&[("server_id", server_id)], &body, || {
                format!("Failed to create backup of server {server_id}!")
            })
            .await
    }

    pub async fn get_details(&self, server_id: &str, backup_id: &str) -> Result<Backup, Error> {
        self.backups
            .get(&[("server_id", server_id), ("backup_id", backup_id)], || {
                format!("Cannot get details for {backup_id} of server: {server_id}!")
            })
            .await
    }

    /// A signed, short-lived URL for downloading the backup archive.
    pub async fn get_download_link(&self, server_id: &str, backup_id: &str) -> Result<Url, Error> {
        let dispatcher = self.backups.dispatcher();
        let url = dispatcher.url(
            client::BACKUP_DOWNLOAD,
            &[("server_id", server_id), ("backup_id", backup_id)],
        )?;
        let result: Result<_, Failure> = async {
            let body = dispatcher.get(url).await?;
            Ok(schema::validate_single::<SignedUrl>(&body)?.url)
        }
        .await;
        result.map_err(|failure| {
            failure.normalize(|| {
                format!("Cannot get a download link for {backup_id} of server: {server_id}!")
            })
        })
    }

    pub async fn delete(&self, server_id: &str, backup_id: &str) -> Result<(), Error> {
        self.backups
            .delete(&[("server_id", server_id), ("backup_id", backup_id)], || {
                format!("Cannot delete {backup_id} from server: {server_id}!")
            })
            .await
    }
}

/// Computed per call, with sub-second precision so back-to-back backups differ.
fn default_backup_name() -> String {
    format!(
        "Backup at {} with {}.",
        Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
        env!("CARGO_PKG_NAME")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_is_recomputed() {
        let first = default_backup_name();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = default_backup_name();

        assert!(first.starts_with("Backup at "));
        assert!(first.ends_with(" with ptero-api."));
        assert_ne!(first, second);
    }

    #[test]
    fn options_builder() {
        let opts = BackupOptions::named("pre-update").locked();
        assert_eq!(opts.name.as_deref(), Some("pre-update"));
        assert!(opts.locked);
        assert_eq!(BackupOptions::default().name, None);
    }
}
