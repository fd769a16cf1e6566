use anyhow::{Context, Result};
use k8s_openapi::api::core::v1::Secret as SecretResource;
use kube::Client;
use kube::api::{Api, ListParams};
use tracing::info;

use super::from_resource;
use crate::services::secret_store::{Secret, SecretStore};

/// Lists secrets from the Kubernetes API server.
///
/// The store issues a single cluster-wide list, so the identity in use needs
/// `list` on `secrets` at cluster scope.
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Uses the in-cluster service account when running in a pod, otherwise
    /// the local kubeconfig.
    pub async fn try_default() -> Result<Self> {
        let client = Client::try_default()
            .await
            .context("failed to configure Kubernetes client")?;
        Ok(Self::new(client))
    }
}

#[async_trait::async_trait]
impl SecretStore for KubeSecretStore {
    #[tracing::instrument(skip(self))]
    async fn list_secrets(&self) -> Result<Vec<Secret>> {
        let api: Api<SecretResource> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .context("failed to list secrets across all namespaces")?;

        let secrets: Vec<Secret> = list.items.into_iter().filter_map(from_resource).collect();
        info!(count = secrets.len(), "Secrets listed");
        Ok(secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{Request, Response};
    use kube::client::Body;

    fn mock_client() -> (Client, tower_test::mock::Handle<Request<Body>, Response<Body>>) {
        let (service, handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
        (Client::new(service, "default"), handle)
    }

    #[tokio::test]
    async fn test_list_secrets_queries_all_namespaces() {
        let (client, mut handle) = mock_client();

        let server = tokio::spawn(async move {
            let (request, send) = handle.next_request().await.expect("list request");
            assert_eq!(request.method(), http::Method::GET);
            assert_eq!(request.uri().path(), "/api/v1/secrets");

            let body = serde_json::json!({
                "apiVersion": "v1",
                "kind": "SecretList",
                "metadata": {},
                "items": [
                    {"apiVersion": "v1", "kind": "Secret",
                     "metadata": {"name": "slack", "namespace": "bots"},
                     "data": {"token": "eG94Yg=="}},
                    {"apiVersion": "v1", "kind": "Secret",
                     "metadata": {"name": "minio", "namespace": "storage"},
                     "data": {"access_key": "YWs=", "secret_key": "c2s="}}
                ]
            });
            send.send_response(
                Response::builder()
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            );
        });

        let secrets = KubeSecretStore::new(client).list_secrets().await.unwrap();
        server.await.unwrap();

        assert_eq!(secrets.len(), 2);
        assert_eq!(secrets[0].name, "slack");
        assert_eq!(secrets[0].namespace.as_deref(), Some("bots"));
        assert_eq!(secrets[0].field("token"), Some(&b"xoxb"[..]));
        assert_eq!(secrets[1].field("secret_key"), Some(&b"sk"[..]));
    }

    #[tokio::test]
    async fn test_list_secrets_forbidden() {
        let (client, mut handle) = mock_client();

        let server = tokio::spawn(async move {
            let (_request, send) = handle.next_request().await.expect("list request");
            let status = serde_json::json!({
                "kind": "Status",
                "apiVersion": "v1",
                "metadata": {},
                "status": "Failure",
                "message": "secrets is forbidden",
                "reason": "Forbidden",
                "code": 403
            });
            send.send_response(
                Response::builder()
                    .status(403)
                    .body(Body::from(serde_json::to_vec(&status).unwrap()))
                    .unwrap(),
            );
        });

        assert!(KubeSecretStore::new(client).list_secrets().await.is_err());
        server.await.unwrap();
    }
}
