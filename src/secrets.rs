//! Loads the object-storage and chat credentials out of a [`SecretStore`].
//!
//! The store is listed once and filtered by name. Each required secret must
//! appear exactly once across everything the store can see; its fields must
//! be valid UTF-8.

use anyhow::{Context, Result, anyhow, bail};
use std::fmt;
use tracing::{debug, info};

use crate::services::secret_store::{Secret, SecretStore};

pub const STORAGE_SECRET: &str = "minio";
pub const CHAT_SECRET: &str = "slack";

#[derive(Clone, PartialEq, Eq)]
pub struct StorageCredentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub storage: StorageCredentials,
    pub chat_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("storage", &self.storage)
            .field("chat_token", &"<redacted>")
            .finish()
    }
}

/// Lists every secret visible to `store` and extracts the storage and chat
/// credentials.
///
/// # Errors
///
/// Fails if either secret is missing or present more than once, if a
/// required field is absent, or if a value is not UTF-8.
#[tracing::instrument(skip(store))]
pub async fn load_credentials<S: SecretStore + ?Sized>(store: &S) -> Result<Credentials> {
    let secrets = store.list_secrets().await?;
    debug!(visible = secrets.len(), "Scanning secrets");

    let minio = find_unique(&secrets, STORAGE_SECRET)?;
    let slack = find_unique(&secrets, CHAT_SECRET)?;

    let credentials = Credentials {
        storage: StorageCredentials {
            access_key: decode_field(minio, "access_key")?,
            secret_key: decode_field(minio, "secret_key")?,
        },
        chat_token: decode_field(slack, "token")?,
    };

    info!(
        storage_namespace = minio.namespace.as_deref().unwrap_or("-"),
        chat_namespace = slack.namespace.as_deref().unwrap_or("-"),
        "Credentials loaded"
    );
    Ok(credentials)
}

fn find_unique<'a>(secrets: &'a [Secret], name: &str) -> Result<&'a Secret> {
    let mut matches = secrets.iter().filter(|s| s.name == name);
    let first = matches
        .next()
        .ok_or_else(|| anyhow!("secret '{name}' not found in any namespace"))?;

    let others: Vec<&str> = matches
        .map(|s| s.namespace.as_deref().unwrap_or("-"))
        .collect();
    if !others.is_empty() {
        bail!(
            "secret '{name}' is ambiguous: found in {} and {}",
            first.namespace.as_deref().unwrap_or("-"),
            others.join(", ")
        );
    }
    Ok(first)
}

/// Reads `field` of `secret` as a UTF-8 string.
pub fn decode_field(secret: &Secret, field: &str) -> Result<String> {
    let bytes = secret
        .field(field)
        .ok_or_else(|| anyhow!("secret '{}' has no '{field}' field", secret.name))?;
    String::from_utf8(bytes.to_vec())
        .with_context(|| format!("secret '{}' field '{field}' is not UTF-8", secret.name))
}
