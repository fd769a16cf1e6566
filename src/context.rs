//! Process start-up: credentials in, client handles out.

use anyhow::{Context, Result};
use tracing::info;

use crate::config::Settings;
use crate::fetch::BasicClient;
use crate::fetch::auth::ApiKey;
use crate::handler::Notifier;
use crate::infra::slack::SlackClient;
use crate::secrets::load_credentials;
use crate::services::secret_store::SecretStore;
use crate::storage::ObjectStore;

pub type SlackNotifier = Notifier<SlackClient<ApiKey<BasicClient>>>;

/// Client handles shared, read-only, by every invocation.
pub struct AppContext {
    pub storage: ObjectStore,
    pub notifier: SlackNotifier,
}

/// Loads credentials from `secrets` and builds both clients.
///
/// Any failure here is fatal: without both handles no event can be served.
#[tracing::instrument(skip_all)]
pub async fn bootstrap<S: SecretStore + ?Sized>(
    settings: &Settings,
    secrets: &S,
) -> Result<AppContext> {
    let credentials = load_credentials(secrets)
        .await
        .context("failed to load credentials")?;

    let storage = ObjectStore::connect(
        &settings.storage_endpoint,
        &credentials.storage,
        settings.storage_secure,
        &settings.storage_region,
    )
    .await
    .context("failed to build object-storage client")?;

    let slack = SlackClient::new(&credentials.chat_token, &settings.slack_api_url)
        .context("failed to build Slack client")?;
    let notifier = Notifier::new(slack, settings.channel.clone(), settings.event_type.clone());

    info!(
        storage_endpoint = storage.endpoint(),
        channel = %settings.channel,
        event_type = %settings.event_type,
        "Clients ready"
    );
    Ok(AppContext { storage, notifier })
}
