//! Wires configuration, session and backend into the service objects the
//! commands operate on.

use crate::core::config::{AppConfig, SupabaseCredentials};
use crate::core::ledger::TransactionStore;
use crate::core::{
    Session, SessionManager, SettingsRepository, SettingsStore, TransactionRepository, User,
};
use crate::providers::supabase::SupabaseClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::debug;

pub struct App {
    pub config: AppConfig,
    pub credentials: Option<SupabaseCredentials>,
    pub sessions: SessionManager,
    pub user: Option<User>,
    pub settings: SettingsStore,
    pub transactions: TransactionStore,
}

impl App {
    /// Builds the services for the signed-in user, if any. Persistence is
    /// disabled when the backend credentials are absent or malformed.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let credentials = config.credentials();
        let sessions = SessionManager::new(config.data_path()?);
        let session = sessions.current();
        let user = session.as_ref().map(|s| s.user.clone());

        let client = match &credentials {
            Some(credentials) => Some(Arc::new(SupabaseClient::new(
                credentials,
                session.map(|s: Session| s.access_token),
            )?)),
            None => None,
        };
        debug!(
            signed_in = user.is_some(),
            persistence = client.is_some(),
            "Initialised application"
        );

        Ok(Self::with_repositories(
            config,
            credentials,
            sessions,
            user,
            client.clone().map(|c| c as Arc<dyn SettingsRepository>),
            client.map(|c| c as Arc<dyn TransactionRepository>),
        ))
    }

    /// Builds the services over explicit repositories.
    pub fn with_repositories(
        config: AppConfig,
        credentials: Option<SupabaseCredentials>,
        sessions: SessionManager,
        user: Option<User>,
        settings_repository: Option<Arc<dyn SettingsRepository>>,
        transaction_repository: Option<Arc<dyn TransactionRepository>>,
    ) -> Self {
        Self {
            settings: SettingsStore::new(settings_repository, user.clone()),
            transactions: TransactionStore::new(transaction_repository, user.clone()),
            config,
            credentials,
            sessions,
            user,
        }
    }

    /// Fetches settings and transactions concurrently.
    pub async fn load(&mut self) {
        futures::join!(self.settings.load(), self.transactions.load());
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }
}
