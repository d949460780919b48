//! The transaction store: the signed-in user's transactions kept in sync
//! with the remote table.

use super::auth::User;
use super::repository::TransactionRepository;
use super::transaction::{Transaction, TransactionDraft};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Owns the user's transaction list.
///
/// Every mutation goes to the repository first. The local list only changes
/// when that write succeeds, otherwise the failure is logged and the list keeps
/// its previous contents.
pub struct TransactionStore {
    repository: Option<Arc<dyn TransactionRepository>>,
    user: Option<User>,
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new(repository: Option<Arc<dyn TransactionRepository>>, user: Option<User>) -> Self {
        Self {
            repository,
            user,
            transactions: Vec::new(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    fn backend(&self) -> Option<(Arc<dyn TransactionRepository>, String)> {
        match (&self.repository, &self.user) {
            (Some(repo), Some(user)) => Some((Arc::clone(repo), user.id.clone())),
            _ => None,
        }
    }

    pub async fn load(&mut self) {
        let Some((repo, user_id)) = self.backend() else {
            debug!("No user or backend, transaction list is empty");
            self.transactions.clear();
            return;
        };

        match repo.list(&user_id).await {
            Ok(transactions) => {
                debug!(count = transactions.len(), "Loaded transactions");
                self.transactions = transactions;
            }
            Err(e) => error!(error = %e, "Error loading transactions"),
        }
    }

    /// Inserts a transaction and puts it at the front of the list.
    pub async fn add(&mut self, draft: TransactionDraft) -> Option<&Transaction> {
        let Some((repo, user_id)) = self.backend() else {
            warn!("Not signed in or no backend configured, transaction not added");
            return None;
        };

        match repo.insert(&user_id, &draft).await {
            Ok(created) => {
                debug!(id = %created.id, "Added transaction");
                self.transactions.insert(0, created);
                self.transactions.first()
            }
            Err(e) => {
                error!(error = %e, "Error adding transaction");
                None
            }
        }
    }

    /// Replaces the transaction with `id` in place.
    pub async fn update(&mut self, id: &str, draft: TransactionDraft) -> Option<&Transaction> {
        let Some((repo, user_id)) = self.backend() else {
            warn!("Not signed in or no backend configured, transaction not updated");
            return None;
        };

        match repo.update(&user_id, id, &draft).await {
            Ok(updated) => {
                debug!(%id, "Updated transaction");
                let position = self.transactions.iter().position(|t| t.id == id)?;
                self.transactions[position] = updated;
                self.transactions.get(position)
            }
            Err(e) => {
                error!(error = %e, %id, "Error updating transaction");
                None
            }
        }
    }

    pub async fn delete(&mut self, id: &str) -> bool {
        let Some((repo, user_id)) = self.backend() else {
            warn!("Not signed in or no backend configured, transaction not deleted");
            return false;
        };

        match repo.delete(&user_id, id).await {
            Ok(()) => {
                debug!(%id, "Deleted transaction");
                self.transactions.retain(|t| t.id != id);
                true
            }
            Err(e) => {
                error!(error = %e, %id, "Error deleting transaction");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::TransactionType;
    use crate::store::memory::MemoryRepository;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            email: None,
            full_name: None,
        }
    }

    fn draft(description: &str, day: u32) -> TransactionDraft {
        TransactionDraft {
            description: description.to_string(),
            amount: dec!(100),
            category: "Food".to_string(),
            kind: TransactionType::Expense,
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl TransactionRepository for FailingRepository {
        async fn list(&self, _user_id: &str) -> Result<Vec<Transaction>> {
            Err(anyhow!("boom"))
        }

        async fn insert(&self, _user_id: &str, _draft: &TransactionDraft) -> Result<Transaction> {
            Err(anyhow!("boom"))
        }

        async fn update(
            &self,
            _user_id: &str,
            _id: &str,
            _draft: &TransactionDraft,
        ) -> Result<Transaction> {
            Err(anyhow!("boom"))
        }

        async fn delete(&self, _user_id: &str, _id: &str) -> Result<()> {
            Err(anyhow!("boom"))
        }
    }

    #[tokio::test]
    async fn test_add_prepends_created_row() {
        let repo = Arc::new(MemoryRepository::new());
        let mut store = TransactionStore::new(Some(repo), Some(user()));

        store.add(draft("first", 1)).await.expect("should add");
        let second_id = store.add(draft("second", 2)).await.unwrap().id.clone();

        assert_eq!(store.transactions().len(), 2);
        assert_eq!(store.transactions()[0].id, second_id);
        assert_eq!(store.transactions()[0].description, "second");
    }

    #[tokio::test]
    async fn test_load_orders_newest_first() {
        let repo = Arc::new(MemoryRepository::new());
        repo.insert("user-1", &draft("old", 1)).await.unwrap();
        repo.insert("user-1", &draft("new", 20)).await.unwrap();
        repo.insert("someone-else", &draft("foreign", 5)).await.unwrap();

        let mut store = TransactionStore::new(Some(repo), Some(user()));
        store.load().await;

        let descriptions: Vec<_> = store
            .transactions()
            .iter()
            .map(|t| t.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["new", "old"]);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let repo = Arc::new(MemoryRepository::new());
        let mut store = TransactionStore::new(Some(repo), Some(user()));
        let id = store.add(draft("lunch", 3)).await.unwrap().id.clone();
        store.add(draft("dinner", 4)).await.unwrap();

        let mut edited = draft("lunch with team", 3);
        edited.amount = dec!(180);
        let updated = store.update(&id, edited).await.expect("should update");
        assert_eq!(updated.amount, dec!(180));

        assert_eq!(store.transactions()[1].id, id);
        assert_eq!(store.transactions()[1].description, "lunch with team");
    }

    #[tokio::test]
    async fn test_delete_removes_locally() {
        let repo = Arc::new(MemoryRepository::new());
        let mut store = TransactionStore::new(Some(repo), Some(user()));
        let id = store.add(draft("lunch", 3)).await.unwrap().id.clone();

        assert!(store.delete(&id).await);
        assert!(store.transactions().is_empty());
        assert!(store.find(&id).is_none());
    }

    #[tokio::test]
    async fn test_failed_writes_leave_state_unchanged() {
        let repo = Arc::new(MemoryRepository::new());
        let mut seeded = TransactionStore::new(Some(repo.clone()), Some(user()));
        let id = seeded.add(draft("lunch", 3)).await.unwrap().id.clone();
        let snapshot = seeded.transactions().to_vec();

        // Reuse the seeded list but point writes at a failing backend
        let mut store = TransactionStore {
            repository: Some(Arc::new(FailingRepository)),
            user: Some(user()),
            transactions: snapshot.clone(),
        };

        assert!(store.add(draft("dinner", 4)).await.is_none());
        assert!(store.update(&id, draft("changed", 4)).await.is_none());
        assert!(!store.delete(&id).await);
        store.load().await;

        assert_eq!(store.transactions(), snapshot.as_slice());
    }

    #[tokio::test]
    async fn test_no_user_means_no_data() {
        let repo = Arc::new(MemoryRepository::new());
        repo.insert("user-1", &draft("lunch", 3)).await.unwrap();

        let mut store = TransactionStore::new(Some(repo), None);
        store.load().await;
        assert!(store.transactions().is_empty());
        assert!(store.add(draft("dinner", 4)).await.is_none());
    }
}
