use std::sync::Arc;

use serde::Serialize;

use crate::dispatcher::Dispatcher;
use crate::endpoint::application;
use crate::error::{Error, Failure};
use crate::resource::{Page, Resource};
use crate::schema::{self, Database};

const INCLUDE_RELATIONSHIPS: (&str, &str) = ("include", "password,host");

/// Body for [`DatabaseManager::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDatabase {
    pub database: String,
    /// Remote connection pattern, e.g. `%`.
    pub remote: String,
    /// Database host ID.
    pub host: u64,
}

/// Databases attached to a server.
pub struct DatabaseManager {
    databases: Resource<Database>,
}

impl DatabaseManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            databases: Resource::new(dispatcher, application::DATABASES, application::DATABASE),
        }
    }

    pub async fn list(&self, server_id: u64) -> Result<Page<Database>, Error> {
        let id = server_id.to_string();
        self.databases
            .list(&[("server_id", id.as_str())], &[], || {
                format!("Failed to list databases of server {server_id}!")
            })
            .await
    }

    /// Fetch one database, including its password and host relationships.
    pub async fn get(&self, server_id: u64, database_id: u64) -> Result<Database, Error> {
        let server = server_id.to_string();
        let database = database_id.to_string();
        let params = [("server_id", server.as_str()), ("database_id", database.as_str())];
        let url = self.databases.dispatcher().url(application::DATABASE, &params)?;

        let result: Result<_, Failure> = async {
            let body = self
                .databases
                .dispatcher()
                .get_with_params(url, &[INCLUDE_RELATIONSHIPS])
                .await?;
            Ok(schema::validate_single::<Database>(&body)?)
        }
        .await;
        result.map_err(|failure| {
            failure.normalize(|| {
                format!("Failed to get database {database_id} of server {server_id}!")
            })
        })
    }

    pub async fn create(&self, server_id: u64, database: &NewDatabase) -> Result<Database, Error> {
        let id = server_id.to_string();
        self.databases
            .create(&[("server_id", id.as_str())], database, || {
                format!("Failed to create database {} on server {server_id}!", database.database)
            })
            .await
    }

    pub async fn delete(&self, server_id: u64, database_id: u64) -> Result<(), Error> {
        let server = server_id.to_string();
        let database = database_id.to_string();
        self.databases
            .delete(&[("server_id", server.as_str()), ("database_id", database.as_str())], || {
                format!("Failed to delete database {database_id} of server {server_id}!")
            })
            .await
    }
}
