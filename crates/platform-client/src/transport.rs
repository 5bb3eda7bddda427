//! HTTP transport for the platform API

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::PlatformConfig;
use crate::error::TransportError;

/// Timeout applied to every GET. POSTs run unbounded.
pub const GET_TIMEOUT: Duration = Duration::from_secs(10);

/// Bound on establishing a connection, for every method
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Authenticated JSON client bound to one workspace
#[derive(Debug, Clone)]
pub struct PlatformClient {
    client: Client,
    config: PlatformConfig,
}

impl PlatformClient {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            client: Client::builder()
                .connect_timeout(CONNECT_TIMEOUT)
                .build()
                .unwrap_or_else(|_| Client::new()),
            config,
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// `/workspaces/{ws}{suffix}` with the workspace percent-encoded
    pub(crate) fn workspace_path(&self, suffix: &str) -> String {
        format!(
            "/workspaces/{}{}",
            urlencoding::encode(&self.config.workspace),
            suffix
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// JSON GET with the read timeout. POST bodies get their content type from `.json()`.
    fn get(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .timeout(GET_TIMEOUT)
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send(&self, url: &str, builder: RequestBuilder) -> Result<Response, TransportError> {
        builder
            .bearer_auth(self.config.token())
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))
    }

    async fn read_body(url: &str, resp: Response) -> Result<String, TransportError> {
        resp.text()
            .await
            .map_err(|e| TransportError::from_reqwest(url, e))
    }

    async fn decode(url: &str, resp: Response) -> Result<Value, TransportError> {
        let status = resp.status();
        let body = Self::read_body(url, resp).await?;

        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| TransportError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// GET `path` and decode the JSON body
    pub async fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        let url = self.url(path);
        debug!("GET {}", url);

        let resp = self.send(&url, self.get(&url)).await?;
        Self::decode(&url, resp).await
    }

    /// POST a JSON body to `path` and decode the JSON response
    pub async fn post_json<B>(&self, path: &str, body: &B) -> Result<Value, TransportError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        debug!("POST {}", url);

        let resp = self.send(&url, self.client.post(&url).json(body)).await?;
        Self::decode(&url, resp).await
    }

    /// GET `path` and return the status with the body, whatever the status.
    ///
    /// Bodies that are not JSON come back as a JSON string.
    pub async fn get_with_status(&self, path: &str) -> Result<(StatusCode, Value), TransportError> {
        let url = self.url(path);
        debug!("GET {} (status lookup)", url);

        let resp = self.send(&url, self.get(&url)).await?;
        let status = resp.status();
        let body = Self::read_body(&url, resp).await?;
        let value: Value = serde_json::from_str(&body).unwrap_or(Value::String(body));
        Ok((status, value))
    }
}
