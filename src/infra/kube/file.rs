use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::Secret as SecretResource;
use serde::Deserialize;
use std::path::PathBuf;

use super::from_resource;
use crate::services::secret_store::{Secret, SecretStore};

/// Reads secrets from a list of Kubernetes `Secret` objects on disk.
///
/// ```json
/// {
///   "items": [
///     { "metadata": { "name": "slack" }, "data": { "token": "eG94Yi0uLi4=" } }
///   ]
/// }
/// ```
pub struct FileSecretStore {
    path: PathBuf,
}

#[derive(Deserialize)]
struct SecretFile {
    #[serde(default)]
    items: Vec<SecretResource>,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl SecretStore for FileSecretStore {
    async fn list_secrets(&self) -> Result<Vec<Secret>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        let file: SecretFile = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a list of secrets", self.path.display()))?;
        Ok(file.items.into_iter().filter_map(from_resource).collect())
    }
}
