use std::sync::Arc;

use serde::Serialize;

use crate::dispatcher::Dispatcher;
use crate::endpoint::application;
use crate::error::Error;
use crate::resource::{Page, Resource};
use crate::schema::User;

/// Body for [`UserManager::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Body for [`UserManager::update`]. The panel requires the identity fields on every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

pub struct UserManager {
    users: Resource<User>,
}

impl UserManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            users: Resource::new(dispatcher, application::USERS, application::USER),
        }
    }

    pub async fn list(&self) -> Result<Page<User>, Error> {
        self.users
            .list(&[], &[], || "Failed to list users!".to_owned())
            .await
    }

    pub async fn get(&self, user_id: u64) -> Result<User, Error> {
        let id = user_id.to_string();
        self.users
            .get(&[("user_id", id.as_str())], || format!("Failed to get user {user_id}!"))
            .await
    }

    pub async fn create(&self, user: &NewUser) -> Result<User, Error> {
        self.users
            .create(&[], user, || format!("Failed to create user {}!", user.username))
            .await
    }

    pub async fn update(&self, user_id: u64, update: &UserUpdate) -> Result<User, Error> {
        let id = user_id.to_string();
        self.users
            .update(&[("user_id", id.as_str())], update, || {
                format!("Failed to update user {user_id}!")
            })
            .await
    }

    pub async fn delete(&self, user_id: u64) -> Result<(), Error> {
        let id = user_id.to_string();
        self.users
            .delete(&[("user_id", id.as_str())], || format!("Failed to delete user {user_id}!"))
            .await
    }
}
