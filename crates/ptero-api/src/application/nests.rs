use std::sync::Arc;

use crate::dispatcher::Dispatcher;
use crate::endpoint::application;
use crate::error::Error;
use crate::resource::{Page, Resource};
use crate::schema::{Egg, Nest};

/// Nests are read-only through the API.
pub struct NestManager {
    nests: Resource<Nest>,
}

impl NestManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            nests: Resource::new(dispatcher, application::NESTS, application::NEST),
        }
    }

    pub async fn list(&self) -> Result<Page<Nest>, Error> {
        self.nests
            .list(&[], &[], || "Failed to list nests!".to_owned())
            .await
    }

    pub async fn get(&self, nest_id: u64) -> Result<Nest, Error> {
        let id = nest_id.to_string();
        self.nests
            .get(&[("nest_id", id.as_str())], || format!("Failed to get nest {nest_id}!"))
            .await
    }
}

pub struct EggManager {
    eggs: Resource<Egg>,
}

impl EggManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            eggs: Resource::new(dispatcher, application::EGGS, application::EGG),
        }
    }

    pub async fn list(&self, nest_id: u64) -> Result<Page<Egg>, Error> {
        let id = nest_id.to_string();
        self.eggs
            .list(&[("nest_id", id.as_str())], &[], || {
                format!("Failed to list eggs of nest {nest_id}!")
            })
            .await
    }

    pub async fn get(&self, nest_id: u64, egg_id: u64) -> Result<Egg, Error> {
        let nest = nest_id.to_string();
        let egg = egg_id.to_string();
        self.eggs
            .get(&[("nest_id", nest.as_str()), ("egg_id", egg.as_str())], || {
                format!("Failed to get egg {egg_id} of nest {nest_id}!")
            })
            .await
    }
}
