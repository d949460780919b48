use super::ui;
use crate::core::filter::{
    CategoryFilter, FilteredTransactions, SortKey, SortOrder, TransactionQuery, TypeFilter,
    categories,
};
use crate::core::ledger::TransactionStore;
use crate::core::transaction::{Transaction, TransactionDraft, TransactionType};
use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use tracing::debug;

#[derive(Subcommand, Debug, Clone)]
pub enum TransactionsCommand {
    /// List transactions, optionally searched, filtered and sorted
    List(ListArgs),
    /// Record a new transaction
    Add(AddArgs),
    /// Change fields of an existing transaction
    Edit(EditArgs),
    /// Delete a transaction
    Delete {
        /// Transaction id
        id: String,
    },
    /// List the categories in use
    Categories,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive text matched against description and category
    #[arg(short, long, default_value = "")]
    pub search: String,
    /// all, income or expense
    #[arg(short = 't', long = "type", default_value = "all")]
    pub kind: TypeFilter,
    /// Exact category, or "all"
    #[arg(long, default_value = "all")]
    pub category: String,
    /// date, amount or description
    #[arg(long, default_value = "date")]
    pub sort: SortKey,
    /// asc or desc
    #[arg(long, default_value = "asc")]
    pub order: SortOrder,
}

impl ListArgs {
    pub fn query(&self) -> TransactionQuery {
        TransactionQuery {
            search: self.search.clone(),
            kind: self.kind,
            category: CategoryFilter::from(self.category.as_str()),
            sort_by: self.sort,
            order: self.order,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    #[arg(short, long)]
    pub description: String,
    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: String,
    #[arg(long)]
    pub category: String,
    /// income or expense, defaults to expense
    #[arg(short = 't', long = "type")]
    pub kind: Option<TransactionType>,
    /// YYYY-MM-DD, defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug, Clone)]
pub struct EditArgs {
    /// Transaction id
    pub id: String,
    #[arg(short, long)]
    pub description: Option<String>,
    #[arg(short, long, allow_hyphen_values = true)]
    pub amount: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(short = 't', long = "type")]
    pub kind: Option<TransactionType>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl EditArgs {
    /// Applies the changed fields on top of the existing transaction and
    /// validates the result like a fresh entry.
    pub fn merge(&self, existing: &Transaction, today: NaiveDate) -> Result<TransactionDraft> {
        let amount = self
            .amount
            .clone()
            .unwrap_or_else(|| existing.amount.to_string());
        TransactionDraft::from_input(
            self.description.as_deref().unwrap_or(&existing.description),
            &amount,
            self.category.as_deref().unwrap_or(&existing.category),
            Some(self.kind.unwrap_or(existing.kind)),
            Some(self.date.unwrap_or(existing.date)),
            today,
        )
    }
}

pub fn transactions_table(transactions: &[Transaction], currency: &str) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("ID"),
        ui::header_cell("Date"),
        ui::header_cell("Description"),
        ui::header_cell("Category"),
        ui::header_cell("Type"),
        ui::header_cell("Amount"),
    ]);
    for t in transactions {
        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(t.date.format("%Y-%m-%d")),
            Cell::new(&t.description),
            Cell::new(&t.category),
            Cell::new(t.kind),
            ui::amount_cell(t.amount, t.kind, currency),
        ]);
    }
    table.to_string()
}

impl FilteredTransactions {
    pub fn display_as_table(&self, query: &TransactionQuery, currency: &str) -> String {
        let mut output = format!(
            "{}\n\n",
            ui::style_text("Transactions", ui::StyleType::Title)
        );

        if self.transactions.is_empty() {
            let hint = if query.is_filtered() {
                "No transactions match the current filters."
            } else {
                "No transactions yet. Add your first one with `pocketbook transactions add`."
            };
            output.push_str(&ui::style_text(hint, ui::StyleType::Subtle));
            return output;
        }

        output.push_str(&transactions_table(&self.transactions, currency));

        if self.show_totals() {
            let mut totals = ui::new_styled_table();
            totals.set_header(vec![
                ui::header_cell("Income"),
                ui::header_cell("Expenses"),
                ui::header_cell("Net"),
            ]);
            totals.add_row(vec![
                ui::money_cell(self.totals.income, currency),
                ui::money_cell(self.totals.expense, currency),
                ui::balance_cell(self.totals.net, currency),
            ]);
            output.push_str("\n\n");
            output.push_str(&totals.to_string());
            output.push_str(&format!("\n{}", showing_line(self.transactions.len(), query)));
        }
        output
    }
}

fn showing_line(count: usize, query: &TransactionQuery) -> String {
    let noun = if count == 1 {
        "transaction"
    } else {
        "transactions"
    };
    let mut line = format!("Showing {count} {noun}");
    if let CategoryFilter::Only(category) = &query.category {
        line.push_str(&format!(" in \"{category}\""));
    }
    if let TypeFilter::Only(kind) = query.kind {
        line.push_str(&format!(" ({kind} only)"));
    }
    ui::style_text(&line, ui::StyleType::Subtle)
}

pub fn categories_list(transactions: &[Transaction]) -> String {
    let used = categories(transactions);
    let mut output = if used.is_empty() {
        ui::style_text("No categories yet.", ui::StyleType::Subtle)
    } else {
        used.join("\n")
    };
    for kind in [TransactionType::Income, TransactionType::Expense] {
        output.push_str(&format!(
            "\n\n{}\n{}",
            ui::style_text(&format!("Suggested for {kind}"), ui::StyleType::TotalLabel),
            ui::style_text(&kind.suggested_categories().join(", "), ui::StyleType::Subtle)
        ));
    }
    output
}

pub async fn run(
    command: TransactionsCommand,
    store: &mut TransactionStore,
    currency: &str,
    today: NaiveDate,
) -> Result<()> {
    match command {
        TransactionsCommand::List(args) => {
            let query = args.query();
            debug!(?query, "Listing transactions");
            let result = query.apply(store.transactions());
            println!("{}", result.display_as_table(&query, currency));
        }
        TransactionsCommand::Add(args) => {
            let draft = TransactionDraft::from_input(
                &args.description,
                &args.amount,
                &args.category,
                args.kind,
                args.date,
                today,
            )?;
            let created = store
                .add(draft)
                .await
                .ok_or_else(|| anyhow!("Transaction was not saved"))?;
            println!(
                "Added transaction\n{}",
                transactions_table(std::slice::from_ref(created), currency)
            );
        }
        TransactionsCommand::Edit(args) => {
            let Some(existing) = store.find(&args.id) else {
                bail!("No transaction with id {}", args.id);
            };
            let draft = args.merge(existing, today)?;
            let updated = store
                .update(&args.id, draft)
                .await
                .ok_or_else(|| anyhow!("Transaction was not updated"))?;
            println!(
                "Updated transaction\n{}",
                transactions_table(std::slice::from_ref(updated), currency)
            );
        }
        TransactionsCommand::Delete { id } => {
            if !store.delete(&id).await {
                bail!("Transaction {id} was not deleted");
            }
            println!("Deleted transaction {id}");
        }
        TransactionsCommand::Categories => println!("{}", categories_list(store.transactions())),
    }
    Ok(())
}
