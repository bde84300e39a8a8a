//! Generic JSON API client bound to a base URL and a fixed header set.
//!
//! One typed method per verb. A non-success status becomes
//! [`SyncError::Remote`]; when the error body parses as JSON it is logged and
//! carried on the error.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::SyncError;

/// `User-Agent` sent on every request (GitHub rejects requests without one).
pub const CLIENT_USER_AGENT: &str = concat!("ellx-sync/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    headers: HeaderMap,
    client: Client,
}

/// Connection pool shared by every client of a run.
pub fn build_client() -> Result<Client, SyncError> {
    Ok(Client::builder().user_agent(CLIENT_USER_AGENT).build()?)
}

impl ApiClient {
    /// Bind `client` to `base_url`, sending `headers` on every call.
    pub fn new(client: Client, base_url: impl Into<String>, headers: HeaderMap) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self {
            base_url,
            headers,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<O: DeserializeOwned>(&self, path: &str) -> Result<O, SyncError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub async fn delete<O: DeserializeOwned>(&self, path: &str) -> Result<O, SyncError> {
        self.request(Method::DELETE, path, None::<&()>).await
    }

    pub async fn post<I, O>(&self, path: &str, body: &I) -> Result<O, SyncError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<I, O>(&self, path: &str, body: &I) -> Result<O, SyncError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn patch<I, O>(&self, path: &str, body: &I) -> Result<O, SyncError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        self.request(Method::PATCH, path, Some(body)).await
    }

    async fn request<I, O>(&self, method: Method, path: &str, body: Option<&I>) -> Result<O, SyncError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .client
            .request(method.clone(), &url)
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !self.headers.contains_key(ACCEPT) {
            builder = builder.header(ACCEPT, HeaderValue::from_static("application/json"));
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        tracing::debug!("{method} {url}");
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let payload = serde_json::from_str::<Value>(&text).ok();
            if let Some(payload) = &payload {
                tracing::error!(%status, %payload, "{method} {url} failed");
            }
            return Err(SyncError::Remote {
                method: method.to_string(),
                url,
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("").to_owned(),
                payload: payload
                    .map(|p| p.to_string())
                    .or_else(|| Some(text.trim().to_owned()).filter(|t| !t.is_empty())),
            });
        }

        serde_json::from_str(&text).map_err(|source| SyncError::Decode { url, source })
    }
}
