//! Thin client over the `/persons` endpoints.
//!
//! [`PhonebookClient`] is what the state controller talks to; [`HttpClient`]
//! (feature `client`) is the reqwest implementation. The client never sends
//! an id on create: the server is the only id authority.

use async_trait::async_trait;
use thiserror::Error;

use crate::contact::{Contact, ContactPayload};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

#[async_trait]
pub trait PhonebookClient: Send + Sync {
    async fn get_all(&self) -> Result<Vec<Contact>, ClientError>;

    async fn create(&self, entry: &ContactPayload) -> Result<Contact, ClientError>;

    async fn update(&self, id: &str, entry: &ContactPayload) -> Result<Contact, ClientError>;

    async fn remove(&self, id: &str) -> Result<(), ClientError>;
}

#[cfg(feature = "client")]
pub use http::HttpClient;

#[cfg(feature = "client")]
mod http {
    use async_trait::async_trait;
    use reqwest::{Response, StatusCode};
    use serde::de::DeserializeOwned;
    use serde_json::Value;
    use tracing::debug;

    use super::{ClientError, PhonebookClient};
    use crate::contact::{Contact, ContactPayload};

    impl From<reqwest::Error> for ClientError {
        fn from(err: reqwest::Error) -> Self {
            if err.is_decode() {
                ClientError::Decode(err.to_string())
            } else {
                ClientError::Transport(err.to_string())
            }
        }
    }

    /// reqwest-backed client.
    ///
    /// `base_url` points at the collection, e.g. `http://localhost:3001/persons`.
    #[derive(Debug, Clone)]
    pub struct HttpClient {
        http: reqwest::Client,
        base_url: String,
    }

    impl HttpClient {
        pub fn new(base_url: impl Into<String>) -> Self {
            Self::with_client(reqwest::Client::new(), base_url)
        }

        pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
            Self {
                http,
                base_url: base_url.into().trim_end_matches('/').to_string(),
            }
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        fn item_url(&self, id: &str) -> String {
            format!("{}/{}", self.base_url, id)
        }
    }

    /// Pass 2xx responses through; turn anything else into `Status` using the
    /// server's `{"error": ...}` body when there is one.
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        Ok(check(response).await?.json::<T>().await?)
    }

    #[async_trait]
    impl PhonebookClient for HttpClient {
        async fn get_all(&self) -> Result<Vec<Contact>, ClientError> {
            let response = self.http.get(&self.base_url).send().await?;
            json(response).await
        }

        async fn create(&self, entry: &ContactPayload) -> Result<Contact, ClientError> {
            debug!(name = ?entry.name, "POST {}", self.base_url);
            let response = self.http.post(&self.base_url).json(entry).send().await?;
            json(response).await
        }

        async fn update(&self, id: &str, entry: &ContactPayload) -> Result<Contact, ClientError> {
            let response = self.http.put(self.item_url(id)).json(entry).send().await?;
            json(response).await
        }

        async fn remove(&self, id: &str) -> Result<(), ClientError> {
            let url = self.item_url(id);
            debug!("DELETE request to {url}");
            let response = self.http.delete(url).send().await?;
            let response = check(response).await?;
            if response.status() != StatusCode::NO_CONTENT {
                debug!(status = response.status().as_u16(), "Delete answered without 204");
            }
            Ok(())
        }
    }
}
