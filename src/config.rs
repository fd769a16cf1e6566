//! Runtime settings, read from the environment (after `.env` is loaded).

use anyhow::{Result, bail};

use crate::infra::slack::SLACK_API_URL;

pub const DEFAULT_STORAGE_ENDPOINT: &str = "minio-minio-svc:9000";
pub const DEFAULT_STORAGE_REGION: &str = "us-east-1";
pub const DEFAULT_CHANNEL: &str = "#bot";
pub const DEFAULT_EVENT_TYPE: &str = "s3:ObjectCreated:Put";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `host:port` of the object-storage service, without scheme.
    pub storage_endpoint: String,
    /// Use TLS towards the object-storage service.
    pub storage_secure: bool,
    pub storage_region: String,
    pub slack_api_url: String,
    pub channel: String,
    /// The only event type that triggers a notification.
    pub event_type: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_endpoint: DEFAULT_STORAGE_ENDPOINT.to_string(),
            storage_secure: false,
            storage_region: DEFAULT_STORAGE_REGION.to_string(),
            slack_api_url: SLACK_API_URL.to_string(),
            channel: DEFAULT_CHANNEL.to_string(),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup, falling back to the
    /// defaults for anything unset or empty.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let storage_secure = match get("MINIO_SECURE") {
            Some(raw) => parse_bool("MINIO_SECURE", &raw)?,
            None => defaults.storage_secure,
        };

        Ok(Self {
            storage_endpoint: get("MINIO_ENDPOINT").unwrap_or(defaults.storage_endpoint),
            storage_secure,
            storage_region: get("MINIO_REGION").unwrap_or(defaults.storage_region),
            slack_api_url: get("SLACK_API_URL").unwrap_or(defaults.slack_api_url),
            channel: get("SLACK_CHANNEL").unwrap_or(defaults.channel),
            event_type: get("NOTIFY_EVENT_TYPE").unwrap_or(defaults.event_type),
        })
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{key} must be a boolean, got '{other}'"),
    }
}
