// Generic CRUD over one enveloped resource family.
//
// A `Resource` pairs a schema with its collection and member endpoints and
// runs every call through the same dispatch → validate → transform →
// normalize pipeline. Managers only supply path parameters, bodies and the
// context message used when a failure cannot be classified further.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::dispatcher::Dispatcher;
use crate::endpoint::{Endpoint, PathParams};
use crate::error::{Error, Failure};
use crate::schema::{self, ListMeta, Schema};

/// A page of entities plus the list's meta block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T, M = Option<ListMeta>> {
    pub items: Vec<T>,
    pub meta: M,
}

impl<T, M> Page<T, M> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T, M> IntoIterator for Page<T, M> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

pub(crate) struct Resource<S, M = Option<ListMeta>> {
    dispatcher: Arc<Dispatcher>,
    collection: Endpoint,
    member: Endpoint,
    _schema: PhantomData<fn() -> (S, M)>,
}

impl<S: Schema, M: DeserializeOwned> Resource<S, M> {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>, collection: Endpoint, member: Endpoint) -> Self {
        Self {
            dispatcher,
            collection,
            member,
            _schema: PhantomData,
        }
    }

    pub(crate) fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub(crate) async fn list(
        &self,
        params: PathParams<'_>,
        query: &[(&str, &str)],
        context: impl FnOnce() -> String,
    ) -> Result<Page<S::Entity, M>, Error> {
        let url = self.dispatcher.url(self.collection, params)?;
        let result: Result<_, Failure> = async {
            let body = self.dispatcher.get_with_params(url, query).await?;
            let list = schema::validate_list::<S, M>(&body)?;
            Ok(Page {
                items: list.data.into_iter().map(S::Entity::from).collect(),
                meta: list.meta,
            })
        }
        .await;
        result.map_err(|failure| failure.normalize(context))
    }

    pub(crate) async fn get(
        &self,
        params: PathParams<'_>,
        context: impl FnOnce() -> String,
    ) -> Result<S::Entity, Error> {
        let url = self.dispatcher.url(self.member, params)?;
        let result: Result<_, Failure> = async {
            let body = self.dispatcher.get(url).await?;
            Ok(S::Entity::from(schema::validate_single::<S>(&body)?))
        }
        .await;
        result.map_err(|failure| failure.normalize(context))
    }

    pub(crate) async fn create<B: Serialize + ?Sized + Sync>(
        &self,
        params: PathParams<'_>,
        body: &B,
        context: impl FnOnce() -> String,
    ) -> Result<S::Entity, Error> {
        let url = self.dispatcher.url(self.collection, params)?;
        let result: Result<_, Failure> = async {
            let body = self.dispatcher.post(url, body).await?;
            Ok(S::Entity::from(schema::validate_single::<S>(&body)?))
        }
        .await;
        result.map_err(|failure| failure.normalize(context))
    }

    /// POST to the collection when the panel answers with no body.
    pub(crate) async fn submit<B: Serialize + ?Sized + Sync>(
        &self,
        params: PathParams<'_>,
        body: &B,
        context: impl FnOnce() -> String,
    ) -> Result<(), Error> {
        let url = self.dispatcher.url(self.collection, params)?;
        let result: Result<_, Failure> = async {
            self.dispatcher.post(url, body).await?;
            Ok(())
        }
        .await;
        result.map_err(|failure| failure.normalize(context))
    }

    pub(crate) async fn update<B: Serialize + ?Sized + Sync>(
        &self,
        params: PathParams<'_>,
        body: &B,
        context: impl FnOnce() -> String,
    ) -> Result<S::Entity, Error> {
        let url = self.dispatcher.url(self.member, params)?;
        let result: Result<_, Failure> = async {
            let body = self.dispatcher.patch(url, body).await?;
            Ok(S::Entity::from(schema::validate_single::<S>(&body)?))
        }
        .await;
        result.map_err(|failure| failure.normalize(context))
    }

    pub(crate) async fn delete(
        &self,
        params: PathParams<'_>,
        context: impl FnOnce() -> String,
    ) -> Result<(), Error> {
        let url = self.dispatcher.url(self.member, params)?;
        self.dispatcher
            .delete(url)
            .await
            .map_err(|err| Failure::from(err).normalize(context))
    }
}
