//! Transaction records and the draft used to create or edit them.

use super::amount::{non_negative, parse_amount};
use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TransactionType::Income => "income",
                TransactionType::Expense => "expense",
            }
        )
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(anyhow!("Invalid transaction type: {}", s)),
        }
    }
}

impl TransactionType {
    /// Categories offered when entering a transaction of this type.
    pub fn suggested_categories(&self) -> &'static [&'static str] {
        match self {
            TransactionType::Income => {
                &["Salary", "Commission", "Bonus", "Investment", "Other Income"]
            }
            TransactionType::Expense => &[
                "Food",
                "Transportation",
                "Entertainment",
                "Bills",
                "Shopping",
                "Healthcare",
                "Other",
            ],
        }
    }

    /// Sign prefix used when displaying an amount of this type.
    pub fn sign(&self) -> &'static str {
        match self {
            TransactionType::Income => "+",
            TransactionType::Expense => "-",
        }
    }
}

/// Reads a stored amount, clamping negative values to zero since direction
/// is carried by the transaction type.
fn magnitude<'de, D>(deserializer: D) -> std::result::Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    rust_decimal::serde::float::deserialize(deserializer).map(non_negative)
}

/// A single dated income or expense entry owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    #[serde(
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "magnitude"
    )]
    pub amount: Decimal,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
}

/// Transaction contents without an identifier, as submitted from user input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
}

impl TransactionDraft {
    /// Builds a draft from raw form input.
    ///
    /// Description and category are trimmed and must not be blank, and some
    /// amount text must be supplied. The amount itself is parsed leniently.
    pub fn from_input(
        description: &str,
        amount: &str,
        category: &str,
        kind: Option<TransactionType>,
        date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self> {
        let description = description.trim();
        let category = category.trim();
        if description.is_empty() {
            bail!("Description must not be empty");
        }
        if amount.trim().is_empty() {
            bail!("Amount must not be empty");
        }
        if category.is_empty() {
            bail!("Category must not be empty");
        }

        Ok(Self {
            description: description.to_string(),
            amount: parse_amount(amount),
            category: category.to_string(),
            kind: kind.unwrap_or(TransactionType::Expense),
            date: date.unwrap_or(today),
        })
    }

    /// Turns the draft into a full record once the store has assigned an id.
    pub fn into_transaction(self, id: impl Into<String>) -> Transaction {
        Transaction {
            id: id.into(),
            description: self.description,
            amount: non_negative(self.amount),
            category: self.category,
            kind: self.kind,
            date: self.date,
        }
    }
}

impl From<&Transaction> for TransactionDraft {
    fn from(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount,
            category: transaction.category.clone(),
            kind: transaction.kind,
            date: transaction.date,
        }
    }
}
