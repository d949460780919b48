//! Aggregate figures shown on the dashboard.
use super::amount::non_negative;
use super::transaction::{Transaction, TransactionType};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// Number of transactions listed under "recent".
pub const RECENT_LIMIT: usize = 5;

/// Totals derived from a user's full transaction list.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expenses: Decimal,
    pub monthly_net: Decimal,
    /// Latest transactions by date, newest first.
    pub recent: Vec<Transaction>,
}

impl DashboardSummary {
    /// Computes all-time and current-month totals.
    ///
    /// `today` decides which calendar month counts as the current one.
    pub fn from_transactions(transactions: &[Transaction], today: NaiveDate) -> Self {
        let total_income = sum_of(transactions, TransactionType::Income, |_| true);
        let total_expenses = sum_of(transactions, TransactionType::Expense, |_| true);

        let in_current_month =
            |t: &Transaction| t.date.month() == today.month() && t.date.year() == today.year();
        let monthly_income = sum_of(transactions, TransactionType::Income, in_current_month);
        let monthly_expenses = sum_of(transactions, TransactionType::Expense, in_current_month);

        let mut recent = transactions.to_vec();
        recent.sort_by(|a, b| b.date.cmp(&a.date));
        recent.truncate(RECENT_LIMIT);

        Self {
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            monthly_income,
            monthly_expenses,
            monthly_net: monthly_income - monthly_expenses,
            recent,
        }
    }
}

/// Sums amounts of the given type among transactions accepted by `keep`.
///
/// Amounts count as magnitudes, so a negative amount adds nothing. The sum
/// saturates at `Decimal::MAX`.
pub fn sum_of(
    transactions: &[Transaction],
    kind: TransactionType,
    keep: impl Fn(&Transaction) -> bool,
) -> Decimal {
    transactions
        .iter()
        .filter(|t| t.kind == kind && keep(t))
        .map(|t| non_negative(t.amount))
        .fold(Decimal::ZERO, Decimal::saturating_add)
}
