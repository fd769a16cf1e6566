use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, post_json};
use crate::services::chat_api::{ApiResponse, ChatApi};

pub const SLACK_API_URL: &str = "https://slack.com/api";

/// Slack Web API client authenticated with a bot token.
pub struct SlackClient<C> {
    client: C,
    base_url: String,
}

impl SlackClient<ApiKey<BasicClient>> {
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        Ok(Self::with_client(
            ApiKey::bearer(BasicClient::new()?, token),
            base_url,
        ))
    }
}

impl<C: HttpClient> SlackClient<C> {
    pub fn with_client(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl<C: HttpClient> ChatApi for SlackClient<C> {
    #[tracing::instrument(skip(self, params))]
    async fn api_call(&self, method: &str, params: Value) -> Result<ApiResponse> {
        let url = format!("{}/{}", self.base_url, method);
        let resp = post_json(&self.client, &url, &params).await?;

        // Slack reports failures in the body, including on 429 and most 4xx.
        let status = resp.status();
        let body = resp.text().await.context("failed to read Slack response")?;
        let reply: ApiResponse = serde_json::from_str(&body).map_err(|e| {
            anyhow!("Slack {method} returned status {status} with unreadable body: {e}")
        })?;

        if reply.ok {
            debug!(%status, "Slack call succeeded");
        } else {
            warn!(%status, error = ?reply.error, "Slack call failed");
        }
        Ok(reply)
    }
}
