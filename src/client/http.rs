//! Kaleido API client
//!
//! Bearer-authenticated HTTP client for the Kaleido consortium API.

use async_trait::async_trait;
use kld_types::{AppCreds, Consortium, Environment, Membership, Node};
use reqwest::{Client, Method};
use serde::Serialize;
use tracing::debug;

use super::{ApiResponse, ClientResult, ResourceClient, TransportError};
use crate::config::ClientConfig;
use crate::error::{KldError, Result};

/// Kaleido API client
pub struct KaleidoClient {
    http: Client,
    api_url: String,
    api_key: String,
}

impl KaleidoClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| KldError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_url: config.api_url.as_str().trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send<B: Serialize + Sync + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult {
        debug!(%method, path, "Kaleido request");

        let mut request = self
            .http
            .request(method, self.url(path))
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("Failed to read response body: {e}")))?;

        debug!(status, path, "Kaleido response");
        Ok(ApiResponse { status, body })
    }

    async fn get(&self, path: &str) -> ClientResult {
        self.send::<()>(Method::GET, path, None).await
    }

    async fn post<B: Serialize + Sync + ?Sized>(&self, path: &str, body: &B) -> ClientResult {
        self.send(Method::POST, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> ClientResult {
        self.send::<()>(Method::DELETE, path, None).await
    }
}

#[async_trait]
impl ResourceClient for KaleidoClient {
    async fn list_consortium(&self) -> ClientResult {
        self.get("/c").await
    }

    async fn create_consortium(&self, consortium: &Consortium) -> ClientResult {
        self.post("/c", consortium).await
    }

    async fn get_consortium(&self, consortium_id: &str) -> ClientResult {
        self.get(&format!("/c/{}", consortium_id)).await
    }

    async fn delete_consortium(&self, consortium_id: &str) -> ClientResult {
        self.delete(&format!("/c/{}", consortium_id)).await
    }

    async fn list_environments(&self, consortium_id: &str) -> ClientResult {
        self.get(&format!("/c/{}/e", consortium_id)).await
    }

    async fn create_environment(
        &self,
        consortium_id: &str,
        environment: &Environment,
    ) -> ClientResult {
        self.post(&format!("/c/{}/e", consortium_id), environment)
            .await
    }

    async fn delete_environment(
        &self,
        consortium_id: &str,
        environment_id: &str,
    ) -> ClientResult {
        self.delete(&format!("/c/{}/e/{}", consortium_id, environment_id))
            .await
    }

    async fn list_memberships(&self, consortium_id: &str) -> ClientResult {
        self.get(&format!("/c/{}/m", consortium_id)).await
    }

    async fn create_membership(
        &self,
        consortium_id: &str,
        membership: &Membership,
    ) -> ClientResult {
        self.post(&format!("/c/{}/m", consortium_id), membership)
            .await
    }

    async fn delete_membership(&self, consortium_id: &str, membership_id: &str) -> ClientResult {
        self.delete(&format!("/c/{}/m/{}", consortium_id, membership_id))
            .await
    }

    async fn create_node(
        &self,
        consortium_id: &str,
        environment_id: &str,
        node: &Node,
    ) -> ClientResult {
        self.post(&format!("/c/{}/e/{}/n", consortium_id, environment_id), node)
            .await
    }

    async fn get_node(
        &self,
        consortium_id: &str,
        environment_id: &str,
        node_id: &str,
    ) -> ClientResult {
        self.get(&format!(
            "/c/{}/e/{}/n/{}",
            consortium_id, environment_id, node_id
        ))
        .await
    }

    async fn get_node_status(
        &self,
        consortium_id: &str,
        environment_id: &str,
        node_id: &str,
    ) -> ClientResult {
        self.get(&format!(
            "/c/{}/e/{}/n/{}/status",
            consortium_id, environment_id, node_id
        ))
        .await
    }

    async fn create_app_creds(
        &self,
        consortium_id: &str,
        environment_id: &str,
        appcreds: &AppCreds,
    ) -> ClientResult {
        self.post(
            &format!("/c/{}/e/{}/appcreds", consortium_id, environment_id),
            appcreds,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(url: &str) -> ClientConfig {
        ClientConfig {
            api_url: url::Url::parse(url).unwrap(),
            api_key: "secret".into(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = KaleidoClient::new(&config("https://console.kaleido.io/api/v1/")).unwrap();
        assert_eq!(
            client.url("/c/abc/e"),
            "https://console.kaleido.io/api/v1/c/abc/e"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let client = KaleidoClient::new(&config("http://127.0.0.1:9/api/v1")).unwrap();
        let res = client.list_consortium().await;
        assert!(res.is_err());
    }
}
