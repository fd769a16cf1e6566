//! Secret stores backed by Kubernetes `Secret` objects.
//!
//! [`KubeSecretStore`] lists secrets across all namespaces through the API
//! server, using whatever `kube::Client::try_default` resolves (in-cluster
//! service account first, then kubeconfig).
//! [`FileSecretStore`] reads the same objects from a JSON file on disk, for
//! running without API access (e.g. `kubectl get secrets -A -o json`).

mod api;
mod file;

pub use api::KubeSecretStore;
pub use file::FileSecretStore;

use k8s_openapi::api::core::v1::Secret as SecretResource;

use crate::services::secret_store::Secret;

/// Converts a Kubernetes secret into a [`Secret`]; unnamed objects are dropped.
fn from_resource(resource: SecretResource) -> Option<Secret> {
    Some(Secret {
        name: resource.metadata.name?,
        namespace: resource.metadata.namespace,
        data: resource
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|(field, value)| (field, value.0))
            .collect(),
    })
}
