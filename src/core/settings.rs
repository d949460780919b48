//! Per-user rate settings and the service that keeps them in sync.

use super::auth::User;
use super::repository::SettingsRepository;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// The four configurable multipliers driving salary and commission math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSettings {
    #[serde(with = "rust_decimal::serde::float")]
    pub social_insurance_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub taxes_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub additional_taxes_rate: Decimal,
    /// Plain multiplier, not a percentage.
    #[serde(with = "rust_decimal::serde::float")]
    pub commission_rate: Decimal,
}

impl Default for RateSettings {
    fn default() -> Self {
        Self {
            social_insurance_rate: dec!(0.031589696969697),
            taxes_rate: dec!(0.121712727272727),
            additional_taxes_rate: dec!(0.0005),
            commission_rate: dec!(4000),
        }
    }
}

/// Owns the current user's rates.
///
/// Without a user or a repository the defaults are used and nothing is
/// persisted. Local state only changes after the remote write succeeds.
pub struct SettingsStore {
    repository: Option<Arc<dyn SettingsRepository>>,
    user: Option<User>,
    settings: RateSettings,
}

impl SettingsStore {
    pub fn new(repository: Option<Arc<dyn SettingsRepository>>, user: Option<User>) -> Self {
        Self {
            repository,
            user,
            settings: RateSettings::default(),
        }
    }

    pub fn settings(&self) -> &RateSettings {
        &self.settings
    }

    fn backend(&self) -> Option<(Arc<dyn SettingsRepository>, String)> {
        match (&self.repository, &self.user) {
            (Some(repo), Some(user)) => Some((Arc::clone(repo), user.id.clone())),
            _ => None,
        }
    }

    /// Loads the user's row, creating one with the defaults when none exists.
    pub async fn load(&mut self) {
        let Some((repo, user_id)) = self.backend() else {
            debug!("No user or backend, using default settings");
            self.settings = RateSettings::default();
            return;
        };

        match repo.get(&user_id).await {
            Ok(Some(settings)) => {
                debug!(?settings, "Loaded settings");
                self.settings = settings;
            }
            Ok(None) => {
                debug!(%user_id, "No settings row yet, creating defaults");
                let defaults = RateSettings::default();
                match repo.upsert(&user_id, &defaults).await {
                    Ok(()) => self.settings = defaults,
                    Err(e) => error!(error = %e, "Error creating default settings"),
                }
            }
            Err(e) => error!(error = %e, "Error loading settings"),
        }
    }

    /// Overwrites the user's rates wholesale. Returns whether the change was applied.
    pub async fn update(&mut self, settings: RateSettings) -> bool {
        let Some((repo, user_id)) = self.backend() else {
            warn!("Not signed in or no backend configured, settings not saved");
            return false;
        };

        match repo.upsert(&user_id, &settings).await {
            Ok(()) => {
                self.settings = settings;
                true
            }
            Err(e) => {
                error!(error = %e, "Error updating settings");
                false
            }
        }
    }

    pub async fn reset_to_defaults(&mut self) -> bool {
        self.update(RateSettings::default()).await
    }
}
