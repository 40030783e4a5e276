// Fire-and-forget power actions.
//
// The request is dispatched on a spawned task so the caller gets control
// back immediately. The returned handle can be awaited for the outcome; if
// it is dropped instead, a failure is still logged at `warn`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use url::Url;

use crate::dispatcher::Dispatcher;
use crate::error::{Error, Failure};
use crate::schema::PowerSignal;

#[derive(Serialize)]
struct PowerBody {
    signal: PowerSignal,
}

/// An in-flight power action. Await it to observe the result.
#[must_use = "dropping a PowerAction detaches it; failures are only logged"]
pub struct PowerAction {
    server_id: String,
    signal: PowerSignal,
    handle: JoinHandle<Result<(), Error>>,
}

impl PowerAction {
    /// Spawn the request. Must be called within a Tokio runtime.
    pub(crate) fn spawn(
        dispatcher: Arc<Dispatcher>,
        url: Url,
        server_id: &str,
        signal: PowerSignal,
    ) -> Self {
        let id = server_id.to_owned();
        let handle = tokio::spawn({
            let id = id.clone();
            async move {
                let result = dispatcher
                    .post(url, &PowerBody { signal })
                    .await
                    .map(drop)
                    .map_err(|err| {
                        Failure::from(err).normalize(|| format!("Failed to {signal} server {id}!"))
                    });

                match &result {
                    Ok(()) => debug!(server = %id, %signal, "power action accepted"),
                    Err(err) => warn!(server = %id, %signal, error = %err, "power action failed"),
                }
                result
            }
        });

        Self {
            server_id: id,
            signal,
            handle,
        }
    }

    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    pub fn signal(&self) -> PowerSignal {
        self.signal
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Future for PowerAction {
    type Output = Result<(), Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut this.handle).poll(cx).map(|joined| {
            joined.unwrap_or_else(|_| {
                Err(Error::Request {
                    context: format!("Failed to {} server {}!", this.signal, this.server_id),
                    source: None,
                })
            })
        })
    }
}

impl std::fmt::Debug for PowerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerAction")
            .field("server_id", &self.server_id)
            .field("signal", &self.signal)
            .field("finished", &self.handle.is_finished())
            .finish()
    }
}
