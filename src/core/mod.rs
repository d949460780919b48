//! Core budgeting logic: the data model, services and calculators

pub mod amount;
pub mod auth;
pub mod commission;
pub mod config;
pub mod dashboard;
pub mod filter;
pub mod ledger;
pub mod log;
pub mod repository;
pub mod salary;
pub mod settings;
pub mod transaction;

// Re-export main types for cleaner imports
pub use auth::{AuthProvider, Session, SessionManager, User};
pub use repository::{SettingsRepository, TransactionRepository};
pub use settings::{RateSettings, SettingsStore};
pub use transaction::{Transaction, TransactionDraft, TransactionType};
