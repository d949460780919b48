use super::ui;
use crate::core::amount::parse_amount;
use crate::core::salary::{FixedDeductions, SalaryBreakdown, SalaryRates, calculate_salary};
use crate::core::settings::RateSettings;
use clap::Args;
use comfy_table::Cell;
use rust_decimal::Decimal;

#[derive(Args, Debug, Clone, Default)]
pub struct SalaryArgs {
    /// Gross monthly salary
    #[arg(allow_hyphen_values = true)]
    pub gross: String,
    /// Social insurance rate as a fraction, e.g. 0.0315
    #[arg(long)]
    pub social: Option<String>,
    /// Taxes rate as a fraction
    #[arg(long)]
    pub taxes: Option<String>,
    /// Additional taxes rate as a fraction
    #[arg(long)]
    pub additional_taxes: Option<String>,
    /// Fixed penalty amount
    #[arg(long)]
    pub penalty: Option<String>,
    /// Fixed additional deduction amount
    #[arg(long)]
    pub additional_deduction: Option<String>,
}

impl SalaryArgs {
    /// True when any rate or fixed deduction was supplied on the command line.
    pub fn is_custom(&self) -> bool {
        [
            &self.social,
            &self.taxes,
            &self.additional_taxes,
            &self.penalty,
            &self.additional_deduction,
        ]
        .iter()
        .any(|value| value.is_some())
    }

    /// Resolves the rates and fixed deductions to use. Rates not given on
    /// the command line come from the user's settings.
    pub fn resolve(&self, settings: &RateSettings) -> (SalaryRates, FixedDeductions) {
        let defaults = SalaryRates::from(settings);
        if !self.is_custom() {
            return (defaults, FixedDeductions::default());
        }

        let rate = |value: &Option<String>, fallback: Decimal| {
            value.as_deref().map_or(fallback, parse_amount)
        };
        let rates = SalaryRates {
            social_insurance: rate(&self.social, defaults.social_insurance),
            taxes: rate(&self.taxes, defaults.taxes),
            additional_taxes: rate(&self.additional_taxes, defaults.additional_taxes),
        };
        let fixed = FixedDeductions {
            penalty: self.penalty.as_deref().map(parse_amount),
            additional_deduction: self.additional_deduction.as_deref().map(parse_amount),
        };
        (rates, fixed)
    }
}

impl SalaryBreakdown {
    pub fn display_as_table(&self, currency: &str, custom: bool) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Deduction"),
            ui::header_cell("Rate"),
            ui::header_cell(&format!("Amount ({currency})")),
        ]);

        let proportional = [
            ("Social Insurance", self.rates.social_insurance, self.social_insurance_deduction),
            ("Taxes", self.rates.taxes, self.taxes_deduction),
            (
                "Additional Taxes",
                self.rates.additional_taxes,
                self.additional_taxes_deduction,
            ),
        ];
        for (label, rate, amount) in proportional {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(ui::format_rate(rate, 4)),
                ui::money_cell(amount, currency),
            ]);
        }
        if !self.penalty_deduction.is_zero() {
            table.add_row(vec![
                Cell::new("Penalty"),
                Cell::new("fixed"),
                ui::money_cell(self.penalty_deduction, currency),
            ]);
        }
        if !self.additional_deduction.is_zero() {
            table.add_row(vec![
                Cell::new("Additional Deduction"),
                Cell::new("fixed"),
                ui::money_cell(self.additional_deduction, currency),
            ]);
        }
        table.add_row(vec![
            Cell::new("Total Deductions"),
            Cell::new(""),
            ui::money_cell(self.total_deductions, currency),
        ]);

        let source = if custom {
            "Using custom rates"
        } else {
            "Using rates from your settings"
        };
        let mut output = format!(
            "{}\n{}\n\nGross Salary: {}\n\n",
            ui::style_text("Salary Calculator", ui::StyleType::Title),
            ui::style_text(source, ui::StyleType::Subtle),
            ui::format_money(self.gross_salary, currency)
        );
        output.push_str(&table.to_string());
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Net Salary", ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::format_money(self.net_salary, currency),
                ui::StyleType::TotalValue
            )
        ));
        output
    }
}

pub fn run(args: &SalaryArgs, settings: &RateSettings, currency: &str) {
    let (rates, fixed) = args.resolve(settings);
    let breakdown = calculate_salary(parse_amount(&args.gross), &rates, &fixed);
    println!("{}", breakdown.display_as_table(currency, args.is_custom()));
}
