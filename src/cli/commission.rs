use super::ui;
use crate::core::amount::parse_amount;
use crate::core::commission::{CommissionBreakdown, calculate_commission};
use crate::core::settings::RateSettings;
use clap::Args;
use comfy_table::Cell;

#[derive(Args, Debug, Clone, Default)]
pub struct CommissionArgs {
    /// Base value the commission is computed on
    #[arg(allow_hyphen_values = true)]
    pub base: String,
    /// Commission multiplier, defaults to the rate in your settings
    #[arg(long)]
    pub rate: Option<String>,
}

impl CommissionBreakdown {
    pub fn display_as_table(&self, currency: &str) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![ui::header_cell("Item"), ui::header_cell("Value")]);
        table.add_row(vec![
            Cell::new("Base Value"),
            ui::money_cell(self.base_value, currency),
        ]);
        table.add_row(vec![
            Cell::new("Commission Rate"),
            Cell::new(self.rate.normalize()),
        ]);
        table.add_row(vec![
            Cell::new("Commission"),
            ui::money_cell(self.commission_amount, currency),
        ]);

        let mut output = format!(
            "{}\n\n",
            ui::style_text("Commission Calculator", ui::StyleType::Title)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Total Amount", ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::format_money(self.total_amount, currency),
                ui::StyleType::TotalValue
            )
        ));
        output
    }
}

pub fn run(args: &CommissionArgs, settings: &RateSettings, currency: &str) {
    let rate = args
        .rate
        .as_deref()
        .map_or(settings.commission_rate, parse_amount);
    let breakdown = calculate_commission(parse_amount(&args.base), rate);
    println!("{}", breakdown.display_as_table(currency));
}
