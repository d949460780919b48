use super::ui;
use crate::core::dashboard::DashboardSummary;
use crate::core::transaction::Transaction;
use chrono::NaiveDate;
use comfy_table::Cell;

impl DashboardSummary {
    pub fn display_as_table(&self, currency: &str, today: NaiveDate) -> String {
        let mut output = format!(
            "{}\n{}\n\n",
            ui::style_text("Dashboard", ui::StyleType::Title),
            ui::style_text(
                &today.format("%A, %B %-d, %Y").to_string(),
                ui::StyleType::Subtle
            )
        );

        let mut cards = ui::new_styled_table();
        cards.set_header(vec![
            ui::header_cell("Current Balance"),
            ui::header_cell("Total Income"),
            ui::header_cell("Total Expenses"),
            ui::header_cell("This Month"),
        ]);
        cards.add_row(vec![
            ui::balance_cell(self.balance, currency),
            ui::money_cell(self.total_income, currency),
            ui::money_cell(self.total_expenses, currency),
            ui::balance_cell(self.monthly_net, currency),
        ]);
        output.push_str(&cards.to_string());

        output.push_str(&format!(
            "\n\n{}\n",
            ui::style_text("Recent Transactions", ui::StyleType::TotalLabel)
        ));
        if self.recent.is_empty() {
            output.push_str(&ui::style_text(
                "No transactions yet. Add your first one with `pocketbook transactions add`.",
                ui::StyleType::Subtle,
            ));
        } else {
            output.push_str(&recent_table(&self.recent, currency));
        }
        output
    }
}

fn recent_table(transactions: &[Transaction], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Description"),
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
    ]);
    for t in transactions {
        table.add_row(vec![
            Cell::new(t.date.format("%Y-%m-%d")),
            Cell::new(&t.description),
            Cell::new(&t.category),
            ui::amount_cell(t.amount, t.kind, currency),
        ]);
    }
    table.to_string()
}

pub fn run(transactions: &[Transaction], currency: &str, today: NaiveDate) {
    let summary = DashboardSummary::from_transactions(transactions, today);
    println!("{}", summary.display_as_table(currency, today));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::TransactionType;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dashboard_rendering() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let transactions = vec![
            Transaction {
                id: "1".to_string(),
                description: "June salary".to_string(),
                amount: dec!(10000),
                category: "Salary".to_string(),
                kind: TransactionType::Income,
                date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            },
            Transaction {
                id: "2".to_string(),
                description: "Rent".to_string(),
                amount: dec!(3500),
                category: "Bills".to_string(),
                kind: TransactionType::Expense,
                date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            },
        ];

        let output = DashboardSummary::from_transactions(&transactions, today)
            .display_as_table("EGP", today);

        assert!(output.contains("Sunday, June 15, 2025"));
        assert!(output.contains("EGP 6,500.00"));
        assert!(output.contains("EGP 10,000.00"));
        assert!(output.contains("-EGP 3,500.00"));
        assert!(output.contains("June salary"));
    }

    #[test]
    fn test_empty_dashboard_suggests_adding() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let output = DashboardSummary::from_transactions(&[], today).display_as_table("EGP", today);
        assert!(output.contains("EGP 0.00"));
        assert!(output.contains("No transactions yet"));
    }
}
