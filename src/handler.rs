//! Turns storage notifications into chat messages.

use anyhow::Result;
use std::fmt;
use tracing::{debug, info, warn};

use crate::event::{ObjectRef, StorageEvent};
use crate::services::chat_api::ChatApi;

pub const SUCCESS_MESSAGE: &str = "Notification successfully sent to Slack";
pub const ERROR_PREFIX: &str = "Error while sending notification to Slack: ";

/// What happened to one event. `Display` renders the string returned to the
/// function runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Sent,
    /// The chat call failed; carries the service's error detail.
    Failed(String),
    /// Event type did not match, nothing was sent. Renders as `""`.
    Ignored,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Sent => f.write_str(SUCCESS_MESSAGE),
            Outcome::Failed(detail) => write!(f, "{ERROR_PREFIX}{detail}"),
            Outcome::Ignored => Ok(()),
        }
    }
}

pub fn upload_message(object: &ObjectRef<'_>) -> String {
    format!(
        "An object called {} was uploaded to bucket {}",
        object.object, object.bucket
    )
}

/// Posts a message for every matching upload event.
pub struct Notifier<C> {
    chat: C,
    channel: String,
    event_type: String,
}

impl<C: ChatApi> Notifier<C> {
    pub fn new(chat: C, channel: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self {
            chat,
            channel: channel.into(),
            event_type: event_type.into(),
        }
    }

    pub fn chat(&self) -> &C {
        &self.chat
    }

    /// Handles one event.
    ///
    /// Makes at most one chat call and never retries. Chat failures are folded
    /// into [`Outcome::Failed`]; only a key without a `/` is an `Err`.
    #[tracing::instrument(skip(self, event), fields(event_type = %event.event_type, key = %event.key))]
    pub async fn handle(&self, event: &StorageEvent) -> Result<Outcome> {
        if event.event_type != self.event_type {
            debug!("Event type not handled, ignoring");
            return Ok(Outcome::Ignored);
        }

        let object = ObjectRef::from_key(&event.key)?;
        let text = upload_message(&object);

        let outcome = match self.chat.post_message(&self.channel, &text).await {
            Ok(reply) if reply.ok => Outcome::Sent,
            Ok(reply) => Outcome::Failed(reply.error.unwrap_or_default()),
            Err(e) => Outcome::Failed(format!("{e:#}")),
        };

        match &outcome {
            Outcome::Sent => info!(
                bucket = object.bucket,
                object = object.object,
                channel = %self.channel,
                "Notification sent"
            ),
            Outcome::Failed(detail) => warn!(error = %detail, "Notification failed"),
            Outcome::Ignored => {}
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::chat_api::ApiResponse;
    use anyhow::anyhow;
    use serde_json::Value;
    use std::sync::Mutex;

    /// Chat fake that records calls and replies with a fixed result.
    struct FakeChat {
        reply: std::result::Result<ApiResponse, String>,
        calls: Mutex<Vec<(String, Value)>>,
    }

    impl FakeChat {
        fn replying(reply: ApiResponse) -> Self {
            Self {
                reply: Ok(reply),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn unreachable(error: &str) -> Self {
            Self {
                reply: Err(error.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl ChatApi for FakeChat {
        async fn api_call(&self, method: &str, params: Value) -> Result<ApiResponse> {
            self.calls.lock().unwrap().push((method.to_string(), params));
            self.reply.clone().map_err(|e| anyhow!(e))
        }
    }

    fn notifier(chat: FakeChat) -> Notifier<FakeChat> {
        Notifier::new(chat, "#bot", "s3:ObjectCreated:Put")
    }

    #[tokio::test]
    async fn test_upload_posts_message() {
        let n = notifier(FakeChat::replying(ApiResponse::success()));
        let event = StorageEvent::new("s3:ObjectCreated:Put", "mybucket/photo.png");

        let outcome = n.handle(&event).await.unwrap();
        assert_eq!(outcome, Outcome::Sent);
        assert_eq!(outcome.to_string(), "Notification successfully sent to Slack");

        let calls = n.chat().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "chat.postMessage");
        assert_eq!(calls[0].1["channel"], "#bot");
        assert_eq!(
            calls[0].1["text"],
            "An object called photo.png was uploaded to bucket mybucket"
        );
    }

    #[tokio::test]
    async fn test_chat_error_is_reported() {
        let n = notifier(FakeChat::replying(ApiResponse::failure("rate_limited")));
        let event = StorageEvent::new("s3:ObjectCreated:Put", "mybucket/photo.png");

        let outcome = n.handle(&event).await.unwrap();
        assert_eq!(
            outcome.to_string(),
            "Error while sending notification to Slack: rate_limited"
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_reported() {
        let n = notifier(FakeChat::unreachable("connection refused"));
        let event = StorageEvent::new("s3:ObjectCreated:Put", "b/o");

        let outcome = n.handle(&event).await.unwrap();
        assert_eq!(outcome, Outcome::Failed("connection refused".to_string()));
        assert_eq!(n.chat().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_other_event_types_are_ignored() {
        let n = notifier(FakeChat::replying(ApiResponse::success()));
        let others = [
            "s3:ObjectRemoved:Delete",
            "s3:ObjectCreated:Copy",
            "",
            "S3:OBJECTCREATED:PUT",
        ];
        for event_type in others {
            let outcome = n
                .handle(&StorageEvent::new(event_type, "mybucket/photo.png"))
                .await
                .unwrap();
            assert_eq!(outcome, Outcome::Ignored);
            assert_eq!(outcome.to_string(), "");
        }
        assert!(n.chat().calls().is_empty());
    }

    #[tokio::test]
    async fn test_nested_key_uses_second_segment() {
        let n = notifier(FakeChat::replying(ApiResponse::success()));
        let event = StorageEvent::new("s3:ObjectCreated:Put", "bucket/dir/file.png");

        n.handle(&event).await.unwrap();
        assert_eq!(
            n.chat().calls()[0].1["text"],
            "An object called dir was uploaded to bucket bucket"
        );
    }

    #[tokio::test]
    async fn test_key_without_separator_sends_nothing() {
        let n = notifier(FakeChat::replying(ApiResponse::success()));
        let event = StorageEvent::new("s3:ObjectCreated:Put", "photo.png");

        assert!(n.handle(&event).await.is_err());
        assert!(n.chat().calls().is_empty());
    }
}
