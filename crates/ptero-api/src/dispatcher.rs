// Authenticated request dispatcher shared by every resource manager.
//
// Auth: `Authorization: Bearer <key>` on every request.
// Success bodies are returned as raw JSON values; validation happens in the
// managers. Non-2xx responses come back as `TransportError::Status` with the
// body intact so normalization can look for an upstream `errors[]` array.

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::endpoint::{Endpoint, PathParams};
use crate::error::{Error, TransportError};

const JSON: &str = "application/json";

/// Sends authenticated requests to one panel host with one key.
///
/// Shared by reference (`Arc`) between every manager of a facade.
pub struct Dispatcher {
    http: reqwest::Client,
    base_url: Url,
    authorization: HeaderValue,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// `authorization` is the complete `Authorization` header value.
    pub fn new(http: reqwest::Client, base_url: Url, authorization: HeaderValue) -> Self {
        Self {
            http,
            base_url,
            authorization,
        }
    }

    /// The panel host this dispatcher talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a template against the host, without a doubled slash.
    pub fn url(&self, endpoint: Endpoint, params: PathParams<'_>) -> Result<Url, Error> {
        let path = endpoint.resolve(params)?;
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get(&self, url: Url) -> Result<Value, TransportError> {
        debug!("GET {url}");
        let body = self.execute(self.request(Method::GET, url)).await?;
        decode(body)
    }

    pub(crate) async fn get_with_params(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<Value, TransportError> {
        debug!("GET {url} params={params:?}");
        let body = self
            .execute(self.request(Method::GET, url).query(params))
            .await?;
        decode(body)
    }

    /// GET returning the body verbatim (file contents).
    pub(crate) async fn get_text(
        &self,
        url: Url,
        params: &[(&str, &str)],
    ) -> Result<String, TransportError> {
        debug!("GET {url} params={params:?}");
        self.execute(self.request(Method::GET, url).query(params))
            .await
    }

    pub(crate) async fn post<B: Serialize + ?Sized + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Value, TransportError> {
        debug!("POST {url}");
        let body = self
            .execute(self.request(Method::POST, url).json(body))
            .await?;
        decode(body)
    }

    /// POST with a raw text body (file writes).
    pub(crate) async fn post_text(
        &self,
        url: Url,
        params: &[(&str, &str)],
        content: String,
    ) -> Result<(), TransportError> {
        debug!("POST {url} params={params:?} ({} bytes)", content.len());
        self.execute(
            self.bare_request(Method::POST, url)
                .header(CONTENT_TYPE, "text/plain")
                .query(params)
                .body(content),
        )
        .await?;
        Ok(())
    }

    pub(crate) async fn put<B: Serialize + ?Sized + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Value, TransportError> {
        debug!("PUT {url}");
        let body = self
            .execute(self.request(Method::PUT, url).json(body))
            .await?;
        decode(body)
    }

    pub(crate) async fn patch<B: Serialize + ?Sized + Sync>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Value, TransportError> {
        debug!("PATCH {url}");
        let body = self
            .execute(self.request(Method::PATCH, url).json(body))
            .await?;
        decode(body)
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<(), TransportError> {
        debug!("DELETE {url}");
        self.execute(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    /// Fetch a pre-signed URL. Carries no credentials; the URL is the grant.
    pub(crate) async fn download(&self, url: Url) -> Result<Vec<u8>, TransportError> {
        debug!("GET {} (signed)", url.origin().ascii_serialization());
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }
        Ok(resp.bytes().await?.to_vec())
    }

    // ── Request plumbing ─────────────────────────────────────────────

    fn bare_request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(ACCEPT, JSON)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.bare_request(method, url).header(CONTENT_TYPE, JSON)
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<String, TransportError> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            debug!(%status, "panel returned an error status");
            Err(TransportError::Status { status, body })
        }
    }
}

/// Parse a success body. An empty body (204 No Content) decodes to `null`.
fn decode(body: String) -> Result<Value, TransportError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|source| TransportError::Decode { body, source })
}
