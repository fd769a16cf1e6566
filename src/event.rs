//! Storage notification payloads.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single storage notification as delivered by the function runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "EventType")]
    pub event_type: String,
    /// `<bucket>/<object name>`
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StorageEvent {
    pub fn new(event_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            key: key.into(),
            extra: Map::new(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// The bucket and object name an event key points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectRef<'a> {
    pub bucket: &'a str,
    pub object: &'a str,
}

impl<'a> ObjectRef<'a> {
    /// Splits `key` on `/`: the first segment is the bucket, the second the
    /// object name.
    ///
    /// Segments after the second are dropped, so `bucket/dir/file.png` names
    /// object `dir`. Notification text has always been built this way.
    pub fn from_key(key: &'a str) -> Result<Self> {
        let mut parts = key.split('/');
        let bucket = parts.next().unwrap_or_default();
        let object = parts
            .next()
            .ok_or_else(|| anyhow!("key '{key}' is not of the form <bucket>/<object>"))?;
        Ok(Self { bucket, object })
    }
}
