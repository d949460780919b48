use crate::core::repository::{SettingsRepository, TransactionRepository};
use crate::core::settings::RateSettings;
use crate::core::transaction::{Transaction, TransactionDraft};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Default)]
struct Tables {
    /// Rows keyed by owner id, in insertion order.
    transactions: HashMap<String, Vec<Transaction>>,
    settings: HashMap<String, RateSettings>,
    next_id: u64,
}

/// In-memory implementation of both repositories, used when exercising the
/// services without a live backend.
#[derive(Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a settings row directly.
    pub async fn put_settings(&self, user_id: &str, settings: RateSettings) {
        let mut tables = self.inner.lock().await;
        tables.settings.insert(user_id.to_string(), settings);
    }
}

#[async_trait]
impl TransactionRepository for MemoryRepository {
    async fn list(&self, user_id: &str) -> Result<Vec<Transaction>> {
        let tables = self.inner.lock().await;
        let mut rows = tables
            .transactions
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        debug!(%user_id, count = rows.len(), "Memory LIST");
        Ok(rows)
    }

    async fn insert(&self, user_id: &str, draft: &TransactionDraft) -> Result<Transaction> {
        let mut tables = self.inner.lock().await;
        tables.next_id += 1;
        let created = draft.clone().into_transaction(format!("mem-{}", tables.next_id));
        tables
            .transactions
            .entry(user_id.to_string())
            .or_default()
            .push(created.clone());
        debug!(%user_id, id = %created.id, "Memory INSERT");
        Ok(created)
    }

    async fn update(
        &self,
        user_id: &str,
        id: &str,
        draft: &TransactionDraft,
    ) -> Result<Transaction> {
        let mut tables = self.inner.lock().await;
        let row = tables
            .transactions
            .get_mut(user_id)
            .and_then(|rows| rows.iter_mut().find(|t| t.id == id))
            .ok_or_else(|| anyhow!("No transaction {} for user {}", id, user_id))?;
        *row = draft.clone().into_transaction(id);
        debug!(%user_id, %id, "Memory UPDATE");
        Ok(row.clone())
    }

    async fn delete(&self, user_id: &str, id: &str) -> Result<()> {
        let mut tables = self.inner.lock().await;
        if let Some(rows) = tables.transactions.get_mut(user_id) {
            rows.retain(|t| t.id != id);
        }
        debug!(%user_id, %id, "Memory DELETE");
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for MemoryRepository {
    async fn get(&self, user_id: &str) -> Result<Option<RateSettings>> {
        let tables = self.inner.lock().await;
        Ok(tables.settings.get(user_id).copied())
    }

    async fn upsert(&self, user_id: &str, settings: &RateSettings) -> Result<()> {
        let mut tables = self.inner.lock().await;
        tables.settings.insert(user_id.to_string(), *settings);
        debug!(%user_id, "Memory UPSERT settings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::TransactionType;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn draft(description: &str) -> TransactionDraft {
        TransactionDraft {
            description: description.to_string(),
            amount: dec!(12.5),
            category: "Food".to_string(),
            kind: TransactionType::Expense,
            date: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let repo = MemoryRepository::new();
        let a = repo.insert("u", &draft("a")).await.unwrap();
        let b = repo.insert("u", &draft("b")).await.unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(repo.list("u").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rows_are_scoped_by_owner() {
        let repo = MemoryRepository::new();
        let row = repo.insert("owner", &draft("mine")).await.unwrap();

        assert!(repo.list("other").await.unwrap().is_empty());
        assert!(repo.update("other", &row.id, &draft("hijack")).await.is_err());

        repo.delete("other", &row.id).await.unwrap();
        assert_eq!(repo.list("owner").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = MemoryRepository::new();
        let row = repo.insert("u", &draft("before")).await.unwrap();

        let updated = repo.update("u", &row.id, &draft("after")).await.unwrap();
        assert_eq!(updated.id, row.id);
        assert_eq!(updated.description, "after");

        repo.delete("u", &row.id).await.unwrap();
        assert!(repo.list("u").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_settings_upsert_overwrites() {
        let repo = MemoryRepository::new();
        assert!(repo.get("u").await.unwrap().is_none());

        repo.upsert("u", &RateSettings::default()).await.unwrap();
        let mut changed = RateSettings::default();
        changed.commission_rate = dec!(10);
        repo.upsert("u", &changed).await.unwrap();

        assert_eq!(repo.get("u").await.unwrap(), Some(changed));
    }
}
