// api/mod.rs - HTTP plumbing for the remote category and auth endpoints
//
// ApiClient owns the reqwest client and the base URL. The two traits below are
// the seams the synchronizer and form controllers talk through; ApiClient
// implements both against the real REST shape.

pub mod auth;
pub mod categories;

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

pub use auth::AuthApi;
pub use categories::CategoryApi;

pub const CATEGORIES_PATH: &str = "categories/";
pub const LOGIN_PATH: &str = "login";
pub const REGISTER_PATH: &str = "register";

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::build(base_url, None, None)
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::build(
            &config.api.base_url,
            config.api.request_timeout_secs.map(Duration::from_secs),
            Some(config.api.user_agent.as_str()),
        )
    }

    fn build(base_url: &str, timeout: Option<Duration>, user_agent: Option<&str>) -> ClientResult<Self> {
        // Relative joins need a trailing slash on the base path
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_string());
        }

        Ok(Self {
            http: builder.build()?,
            base,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Send a request; non-success statuses become `ClientError::Status`
    pub async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Failure body is kept for message extraction; a body that cannot be
        // read is treated as empty
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("{} responded {}: {}", self.base, status, body);
        Err(ClientError::status(status, body))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path)?;
        let response = self.send(self.http.get(url)).await?;
        decode(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path)?;
        let response = self.send(self.http.post(url).json(body)).await?;
        decode(response).await
    }

    /// POST where only the status matters
    pub async fn post<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let url = self.url(path)?;
        self.send(self.http.post(url).json(body)).await?;
        Ok(())
    }

    pub async fn put<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let url = self.url(path)?;
        self.send(self.http.put(url).json(body)).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let url = self.url(path)?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ClientError::malformed(e.to_string()))
}
