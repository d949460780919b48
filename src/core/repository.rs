//! Remote store abstractions
//!
//! The services in [`crate::core::ledger`] and [`crate::core::settings`] only
//! talk to the backend through these traits, so they can be exercised against
//! [`crate::store::memory::MemoryRepository`] in tests.

use super::settings::RateSettings;
use super::transaction::{Transaction, TransactionDraft};
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Lists the user's transactions, newest date first.
    async fn list(&self, user_id: &str) -> Result<Vec<Transaction>>;

    /// Inserts a new row and returns it with its assigned id.
    async fn insert(&self, user_id: &str, draft: &TransactionDraft) -> Result<Transaction>;

    /// Overwrites the row matching both `id` and `user_id`.
    async fn update(&self, user_id: &str, id: &str, draft: &TransactionDraft)
    -> Result<Transaction>;

    async fn delete(&self, user_id: &str, id: &str) -> Result<()>;
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetches the user's settings row. `Ok(None)` means no row exists yet.
    async fn get(&self, user_id: &str) -> Result<Option<RateSettings>>;

    async fn upsert(&self, user_id: &str, settings: &RateSettings) -> Result<()>;
}
