//! Trait and types for talking to a chat service.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// The reply envelope of a chat API call.
///
/// Only `ok` and `error` are interpreted; every other field the service
/// returns is preserved in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

/// Abstraction over a chat service exposing a generic method-call API
/// (e.g., the Slack Web API).
#[async_trait::async_trait]
pub trait ChatApi: Send + Sync {
    /// Invokes `method` with named `params` and returns the decoded reply.
    ///
    /// An `Err` means no reply was obtained at all; a reply with `ok: false`
    /// is returned as `Ok`.
    async fn api_call(&self, method: &str, params: Value) -> Result<ApiResponse>;

    /// Posts `text` to `channel` via `chat.postMessage`.
    async fn post_message(&self, channel: &str, text: &str) -> Result<ApiResponse> {
        self.api_call("chat.postMessage", json!({ "channel": channel, "text": text }))
            .await
    }
}
