//! Trait and types for reading credentials out of a secret store.

use anyhow::Result;
use std::collections::BTreeMap;

/// A named bundle of credential fields.
///
/// Field values are raw bytes: each store strips its own transport encoding
/// (base64 for Kubernetes) before handing secrets out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Secret {
    pub name: String,
    pub namespace: Option<String>,
    pub data: BTreeMap<String, Vec<u8>>,
}

impl Secret {
    /// Returns the value of `field`, if the secret carries it.
    pub fn field(&self, field: &str) -> Option<&[u8]> {
        self.data.get(field).map(Vec::as_slice)
    }
}

/// Abstraction over a provider that can enumerate every secret visible to the
/// process (e.g., the Kubernetes API across all namespaces).
#[async_trait::async_trait]
pub trait SecretStore: Send + Sync {
    /// Returns all visible secrets, in whatever order the provider yields them.
    async fn list_secrets(&self) -> Result<Vec<Secret>>;
}
