//! Object-storage client for the MinIO service.
//!
//! The handle is built at startup from the `minio` secret. Notification
//! handling itself never calls it.

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use tracing::debug;

use crate::secrets::StorageCredentials;

pub struct ObjectStore {
    client: Client,
    endpoint: String,
}

impl ObjectStore {
    /// Connects to the S3-compatible service at `address` (`host:port`).
    ///
    /// No request is made here; an unreachable endpoint only surfaces on the
    /// first call.
    pub async fn connect(
        address: &str,
        credentials: &StorageCredentials,
        secure: bool,
        region: &str,
    ) -> Result<Self> {
        let endpoint = endpoint_url(address, secure);
        debug!(endpoint = %endpoint, "Using MinIO endpoint");

        let provider = Credentials::new(
            credentials.access_key.clone(),
            credentials.secret_key.clone(),
            None,
            None,
            "kubernetes-secret",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(provider)
            .endpoint_url(&endpoint)
            .load()
            .await;

        // MinIO serves buckets by path, not by virtual host.
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(s3_config),
            endpoint,
        })
    }

    /// Lists bucket names; used to verify the endpoint and credentials.
    #[tracing::instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn list_buckets(&self) -> Result<Vec<String>> {
        let resp = self
            .client
            .list_buckets()
            .send()
            .await
            .with_context(|| format!("ListBuckets against {} failed", self.endpoint))?;

        Ok(resp
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Turns `host:port` into a URL; `secure = false` means plaintext HTTP.
pub fn endpoint_url(address: &str, secure: bool) -> String {
    if address.starts_with("http://") || address.starts_with("https://") {
        return address.trim_end_matches('/').to_string();
    }
    let scheme = if secure { "https" } else { "http" };
    format!("{scheme}://{address}")
}
