use crate::core::transaction::TransactionType;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Negative,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Negative => style(text).red().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats a number with two decimals and thousands separators, e.g. `8,495.00`.
pub fn format_number(value: Decimal) -> String {
    let text = format!("{:.2}", value.round_dp(2));
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}.{fraction}")
}

pub fn format_money(value: Decimal, currency: &str) -> String {
    format!("{currency} {}", format_number(value))
}

/// Formats a fractional rate as a percentage with the given precision.
/// Percentages beyond `Decimal::MAX` saturate.
pub fn format_rate(rate: Decimal, places: u32) -> String {
    let percent = rate.saturating_mul(Decimal::ONE_HUNDRED).round_dp(places);
    format!("{percent:.prec$}%", prec = places as usize)
}

/// Right-aligned money cell, green when non-negative and red otherwise.
pub fn balance_cell(value: Decimal, currency: &str) -> Cell {
    let color = if value.is_sign_negative() {
        Color::Red
    } else {
        Color::Green
    };
    Cell::new(format_money(value, currency))
        .fg(color)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Right)
}

/// Signed amount cell coloured by transaction type.
pub fn amount_cell(amount: Decimal, kind: TransactionType, currency: &str) -> Cell {
    let color = match kind {
        TransactionType::Income => Color::Green,
        TransactionType::Expense => Color::Red,
    };
    Cell::new(format!("{}{}", kind.sign(), format_money(amount, currency)))
        .fg(color)
        .set_alignment(CellAlignment::Right)
}

pub fn money_cell(value: Decimal, currency: &str) -> Cell {
    Cell::new(format_money(value, currency)).set_alignment(CellAlignment::Right)
}

/// Creates a spinner shown while remote data is loading.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
