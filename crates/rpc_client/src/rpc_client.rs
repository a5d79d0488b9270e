//! HTTP transport shared by the masternode and block service APIs.

use crate::error::{Result, RpcError};
use rand::seq::SliceRandom;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

/// JSON over HTTP against a pool of hosts. Each call without an explicit host
/// goes to a randomly chosen one.
#[derive(Debug, Clone)]
pub struct RpcClient {
    hosts: Vec<String>,
    http_client: Client,
}

impl RpcClient {
    /// Creates a client for already validated hosts
    pub fn new(hosts: Vec<String>) -> Self {
        Self::with_client(Client::new(), hosts)
    }

    /// Creates a client with an existing HTTP client
    pub fn with_client(http_client: Client, hosts: Vec<String>) -> Self {
        Self { hosts, http_client }
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn has_hosts(&self) -> bool {
        !self.hosts.is_empty()
    }

    /// Picks the host for the next call.
    pub fn random_host(&self) -> Result<&str> {
        self.hosts
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .ok_or(RpcError::NoHosts)
    }

    /// GET `path` on a random host and parse the JSON body.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let host = self.random_host()?;
        self.get_from(host, path, query).await
    }

    pub async fn get_from(&self, host: &str, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let text = self.get_text_from(host, path, query).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// GET `path` on a random host and return the raw body.
    pub async fn get_text(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        let host = self.random_host()?;
        self.get_text_from(host, path, query).await
    }

    async fn get_text_from(&self, host: &str, path: &str, query: &[(&str, String)]) -> Result<String> {
        let url = format!("{}{}", host, path);
        debug!(target: "lamden", %url, "GET");

        let mut request = self.http_client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send().await?;
        Self::read_body(response).await
    }

    /// POST a JSON body to `host`, or to a random host.
    pub async fn post(&self, host: Option<&str>, path: &str, body: &Value) -> Result<Value> {
        let host = match host {
            Some(host) => host,
            None => self.random_host()?,
        };
        let url = format!("{}{}", host, path);
        debug!(target: "lamden", %url, "POST");

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .await?;
        let text = Self::read_body(response).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Returns the body of a 200 response. Other statuses become an error,
    /// preferring an `error` field of a JSON body over the reason phrase.
    async fn read_body(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let text = response.text().await?;
        if status == StatusCode::OK {
            return Ok(text);
        }

        debug!(target: "lamden", status = status.as_u16(), "request failed");
        let reported = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string));
        Err(match reported {
            Some(message) => RpcError::Service(message),
            None => RpcError::Status {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("").to_string(),
            },
        })
    }
}

/// Reads the `error` field of a JSON body.
pub(crate) fn reported_error(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(message) => Some(message.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
