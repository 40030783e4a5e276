use std::sync::Arc;

use serde::Serialize;

use crate::dispatcher::Dispatcher;
use crate::endpoint::application;
use crate::error::Error;
use crate::resource::{Page, Resource};
use crate::schema::Location;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLocation {
    pub short: String,
    pub long: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long: Option<String>,
}

pub struct LocationManager {
    locations: Resource<Location>,
}

impl LocationManager {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            locations: Resource::new(dispatcher, application::LOCATIONS, application::LOCATION),
        }
    }

    pub async fn list(&self) -> Result<Page<Location>, Error> {
        self.locations
            .list(&[], &[], || "Failed to list locations!".to_owned())
            .await
    }

    pub async fn get(&self, location_id: u64) -> Result<Location, Error> {
        let id = location_id.to_string();
        self.locations
            .get(&[("location_id", id.as_str())], || {
                format!("Failed to get location {location_id}!")
            })
            .await
    }

    pub async fn create(&self, location: &NewLocation) -> Result<Location, Error> {
        self.locations
            .create(&[], location, || {
                format!("Failed to create location {}!", location.short)
            })
            .await
    }

    pub async fn update(&self, location_id: u64, update: &LocationUpdate) -> Result<Location, Error> {
        let id = location_id.to_string();
        self.locations
            .update(&[("location_id", id.as_str())], update, || {
                format!("Failed to update location {location_id}!")
            })
            .await
    }

    pub async fn delete(&self, location_id: u64) -> Result<(), Error> {
        let id = location_id.to_string();
        self.locations
            .delete(&[("location_id", id.as_str())], || {
                format!("Failed to delete location {location_id}!")
            })
            .await
    }
}
