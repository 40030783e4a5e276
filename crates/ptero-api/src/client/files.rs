// Server file management.
//
// Directory roots are normalized to `/dir/`; file paths to `/path`. Query
// values (`directory`, `file`) are percent-encoded by the HTTP layer.

use std::sync::Arc;

use serde::Serialize;
use url::Url;

use crate::dispatcher::Dispatcher;
use crate::endpoint::{Endpoint, client};
use crate::error::{Error, Failure};
use crate::schema::{self, FileObject, SignedUrl};

/// Arguments for [`FileManager::rename`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOptions {
    pub from: String,
    pub to: String,
    /// Directory both names are relative to. Defaults to `/`.
    pub directory: Option<String>,
}

#[derive(Serialize)]
struct RenameBody<'a> {
    root: &'a str,
    files: [RenamePair<'a>; 1],
}

#[derive(Serialize)]
struct RenamePair<'a> {
    from: &'a str,
    to: &'a str,
}

#[derive(Serialize)]
struct RootedFiles<'a> {
    root: &'a str,
    files: &'a [&'a str],
}

/// Files of one server at a time.
pub struct FileManager {
    dispatcher: Arc<Dispatcher>,
}

impl FileManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    fn url(&self, endpoint: Endpoint, server_id: &str) -> Result<Url, Error> {
        self.dispatcher.url(endpoint, &[("server_id", server_id)])
    }

    async fn post_unit<B: Serialize + Sync>(
        &self,
        url: Url,
        body: &B,
        context: impl FnOnce() -> String,
    ) -> Result<(), Error> {
        self.dispatcher
            .post(url, body)
            .await
            .map(drop)
            .map_err(|err| Failure::from(err).normalize(context))
    }

    /// List the entries of `directory` (default `/`).
    pub async fn list(
        &self,
        server_id: &str,
        directory: Option<&str>,
    ) -> Result<Vec<FileObject>, Error> {
        let directory = normalize_directory(directory.unwrap_or("/"));
        let url = self.url(client::FILES_LIST, server_id)?;
        let result: Result<_, Failure> = async {
            let body = self
                .dispatcher
                .get_with_params(url, &[("directory", directory.as_str())])
                .await?;
            let list = schema::validate_list::<FileObject, Option<serde_json::Value>>(&body)?;
            Ok(list.data)
        }
        .await;
        result.map_err(|failure| {
            failure.normalize(|| format!("Failed to list items for {server_id} in {directory}!"))
        })
    }

    /// Raw contents of a file.
    pub async fn get_content(&self, server_id: &str, path: &str) -> Result<String, Error> {
        let path = normalize_file_path(path);
        let url = self.url(client::FILES_CONTENTS, server_id)?;
        self.dispatcher
            .get_text(url, &[("file", path.as_str())])
            .await
            .map_err(|err| {
                Failure::from(err).normalize(|| format!("Failed to get content of {path}!"))
            })
    }

    /// A signed, short-lived URL for downloading a file.
    pub async fn get_download_link(&self, server_id: &str, path: &str) -> Result<Url, Error> {
        let path = normalize_file_path(path);
        let url = self.url(client::FILES_DOWNLOAD, server_id)?;
        let result: Result<_, Failure> = async {
            let body = self
                .dispatcher
                .get_with_params(url, &[("file", path.as_str())])
                .await?;
            Ok(schema::validate_single::<SignedUrl>(&body)?.url)
        }
        .await;
        result.map_err(|failure| {
            failure.normalize(|| format!("Failed to get a download link for {path}!"))
        })
    }

    /// Fetch a file's bytes through its signed download link.
    pub async fn download(&self, server_id: &str, path: &str) -> Result<Vec<u8>, Error> {
        let link = self.get_download_link(server_id, path).await?;
        self.dispatcher.download(link).await.map_err(|err| {
            Failure::from(err).normalize(|| format!("Failed to download {path}!"))
        })
    }

    pub async fn rename(&self, server_id: &str, options: &RenameOptions) -> Result<(), Error> {
        let root = normalize_directory(options.directory.as_deref().unwrap_or("/"));
        let url = self.url(client::FILES_RENAME, server_id)?;
        let body = RenameBody {
            root: &root,
            files: [RenamePair {
                from: &options.from,
                to: &options.to,
            }],
        };
        self.dispatcher
            .put(url, &body)
            .await
            .map(drop)
            .map_err(|err| {
                Failure::from(err)
                    .normalize(|| format!("Failed to rename {root}{}!", options.from))
            })
    }

    /// Duplicate a file in place; the daemon picks the copy's name.
    pub async fn copy(&self, server_id: &str, path: &str) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            location: &'a str,
        }

        let path = normalize_file_path(path);
        let url = self.url(client::FILES_COPY, server_id)?;
        self.post_unit(url, &Body { location: &path }, || {
            format!("Failed to copy {path}!")
        })
        .await
    }

    /// Replace a file's contents, creating it if needed.
    pub async fn write(&self, server_id: &str, path: &str, content: String) -> Result<(), Error> {
        let path = normalize_file_path(path);
        let url = self.url(client::FILES_WRITE, server_id)?;
        self.dispatcher
            .post_text(url, &[("file", path.as_str())], content)
            .await
            .map_err(|err| {
                Failure::from(err).normalize(|| format!("Failed to write to {path}!"))
            })
    }

    /// Archive `names` (relative to `directory`) and return the new archive.
    pub async fn compress(
        &self,
        server_id: &str,
        names: &[&str],
        directory: Option<&str>,
    ) -> Result<FileObject, Error> {
        let root = normalize_directory(directory.unwrap_or("/"));
        let url = self.url(client::FILES_COMPRESS, server_id)?;
        let result: Result<_, Failure> = async {
            let body = self
                .dispatcher
                .post(url, &RootedFiles { root: &root, files: names })
                .await?;
            Ok(schema::validate_single::<FileObject>(&body)?)
        }
        .await;
        result.map_err(|failure| {
            failure.normalize(|| format!("Failed to compress {} in {root}!", names.join(", ")))
        })
    }

    pub async fn decompress(
        &self,
        server_id: &str,
        name: &str,
        directory: Option<&str>,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            root: &'a str,
            file: &'a str,
        }

        let root = normalize_directory(directory.unwrap_or("/"));
        let url = self.url(client::FILES_DECOMPRESS, server_id)?;
        self.post_unit(url, &Body { root: &root, file: name }, || {
            format!("Failed to decompress {root}{name}!")
        })
        .await
    }

    pub async fn delete(
        &self,
        server_id: &str,
        names: &[&str],
        directory: Option<&str>,
    ) -> Result<(), Error> {
        let root = normalize_directory(directory.unwrap_or("/"));
        let url = self.url(client::FILES_DELETE, server_id)?;
        self.post_unit(url, &RootedFiles { root: &root, files: names }, || {
            format!("Failed to delete {} in {root}!", names.join(", "))
        })
        .await
    }

    pub async fn create_directory(
        &self,
        server_id: &str,
        name: &str,
        directory: Option<&str>,
    ) -> Result<(), Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            root: &'a str,
            name: &'a str,
        }

        let root = normalize_directory(directory.unwrap_or("/"));
        let url = self.url(client::FILES_CREATE_FOLDER, server_id)?;
        self.post_unit(url, &Body { root: &root, name }, || {
            format!("Failed to create directory {name}!")
        })
        .await
    }
}

/// `logs` → `/logs/`, `/` → `/`.
pub(crate) fn normalize_directory(directory: &str) -> String {
    let mut normalized = String::with_capacity(directory.len() + 2);
    if !directory.starts_with('/') {
        normalized.push('/');
    }
    normalized.push_str(directory);
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    normalized
}

/// `eula.txt` → `/eula.txt`.
pub(crate) fn normalize_file_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_owned()
    } else {
        format!("/{path}")
    }
}
