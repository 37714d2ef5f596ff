//! Authenticated JSON client for the REST backend.

pub mod error;

use std::time::Duration;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::{FetchError, GENERIC_FETCH_ERROR, detail_message};

#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        BackendClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, FetchError> {
        self.json(self.request(Method::GET, path, token)).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        self.json(self.request(Method::POST, path, token).json(body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<T, FetchError> {
        self.json(self.request(Method::PUT, path, token).json(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(), FetchError> {
        self.send(self.request(Method::DELETE, path, token)).await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        let url = self.url(path);
        log::debug!("{method} {url}");
        self.http.request(method, url).bearer_auth(token)
    }

    async fn json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, FetchError> {
        let mut bytes = self.send(req).await?;
        if bytes.is_empty() {
            // 204 and friends: decode as JSON null so `()` and `Option<_>` work
            bytes = b"null".to_vec();
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            log::warn!("Backend response did not decode: {e}");
            FetchError::Decode(e.to_string())
        })
    }

    /// Send and return the body of a 2xx response; anything else becomes a
    /// `FetchError`. No retries.
    async fn send(&self, req: RequestBuilder) -> Result<Vec<u8>, FetchError> {
        let resp = req.send().await.map_err(|e| {
            log::warn!("Backend request failed: {e}");
            FetchError::Transport(e.to_string())
        })?;
        let status = resp.status();
        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("read body failed: {e}")))?;
        if status.is_success() {
            return Ok(body.to_vec());
        }
        let err = FetchError::from_status(status.as_u16(), &body);
        if err != FetchError::NotFound {
            log::warn!("{err}");
        }
        Err(err)
    }
}
