//! Search, filtering and ordering of the transaction list.

use super::dashboard::sum_of;
use super::transaction::{Transaction, TransactionType};
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl TypeFilter {
    fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(kind) => transaction.kind == *kind,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        s.parse().map(TypeFilter::Only)
    }
}

impl Display for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeFilter::All => write!(f, "all"),
            TypeFilter::Only(kind) => write!(f, "{kind}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive category match.
    Only(String),
}

impl CategoryFilter {
    fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => transaction.category == *category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        if s == "all" {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(s.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Amount,
    Description,
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "description" => Ok(SortKey::Description),
            _ => Err(anyhow!("Invalid sort key: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(anyhow!("Invalid sort order: {}", s)),
        }
    }
}

/// Income, expense and net over a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

impl Totals {
    pub fn of(transactions: &[Transaction]) -> Self {
        let income = sum_of(transactions, TransactionType::Income, |_| true);
        let expense = sum_of(transactions, TransactionType::Expense, |_| true);
        Self {
            income,
            expense,
            net: income - expense,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    pub search: String,
    pub kind: TypeFilter,
    pub category: CategoryFilter,
    pub sort_by: SortKey,
    pub order: SortOrder,
}

impl TransactionQuery {
    /// True when anything other than the sort narrows the list.
    pub fn is_filtered(&self) -> bool {
        self.kind != TypeFilter::All
            || self.category != CategoryFilter::All
            || !self.search.trim().is_empty()
    }

    fn matches_search(&self, transaction: &Transaction) -> bool {
        let needle = self.search.to_lowercase();
        transaction.description.to_lowercase().contains(&needle)
            || transaction.category.to_lowercase().contains(&needle)
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ordering = match self.sort_by {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Amount => a.amount.cmp(&b.amount),
            SortKey::Description => compare_text(&a.description, &b.description),
        };
        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Filters then sorts `transactions`. The sort is stable, so ties keep
    /// their input order in either direction.
    pub fn apply(&self, transactions: &[Transaction]) -> FilteredTransactions {
        let mut matching: Vec<Transaction> = transactions
            .iter()
            .filter(|t| self.matches_search(t) && self.kind.matches(t) && self.category.matches(t))
            .cloned()
            .collect();
        matching.sort_by(|a, b| self.compare(a, b));

        FilteredTransactions {
            totals: Totals::of(&matching),
            transactions: matching,
            filtered: self.is_filtered(),
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredTransactions {
    pub transactions: Vec<Transaction>,
    pub totals: Totals,
    filtered: bool,
}

impl FilteredTransactions {
    /// Subtotals are only worth showing for a narrowed, non-empty view.
    pub fn show_totals(&self) -> bool {
        self.filtered && !self.transactions.is_empty()
    }
}

/// Distinct categories in order of first appearance.
pub fn categories(transactions: &[Transaction]) -> Vec<String> {
    let mut seen = Vec::new();
    for transaction in transactions {
        if !seen.contains(&transaction.category) {
            seen.push(transaction.category.clone());
        }
    }
    seen
}
