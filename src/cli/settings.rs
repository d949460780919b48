use super::ui;
use crate::core::amount::parse_amount;
use crate::core::settings::{RateSettings, SettingsStore};
use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use rust_decimal::Decimal;
use tracing::info;

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommand {
    /// Show the current rates
    Show,
    /// Change one or more rates
    Set(SetArgs),
    /// Restore the default rates
    Reset,
}

#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Social insurance rate as a fraction
    #[arg(long)]
    pub social: Option<String>,
    /// Taxes rate as a fraction
    #[arg(long)]
    pub taxes: Option<String>,
    /// Additional taxes rate as a fraction
    #[arg(long)]
    pub additional_taxes: Option<String>,
    /// Commission multiplier
    #[arg(long)]
    pub commission: Option<String>,
}

impl SetArgs {
    /// Returns `current` with the supplied values replaced.
    pub fn apply(&self, current: &RateSettings) -> RateSettings {
        let value = |text: &Option<String>, fallback: Decimal| {
            text.as_deref().map_or(fallback, parse_amount)
        };
        RateSettings {
            social_insurance_rate: value(&self.social, current.social_insurance_rate),
            taxes_rate: value(&self.taxes, current.taxes_rate),
            additional_taxes_rate: value(&self.additional_taxes, current.additional_taxes_rate),
            commission_rate: value(&self.commission, current.commission_rate),
        }
    }
}

impl RateSettings {
    pub fn display_as_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Setting"),
            ui::header_cell("Value"),
            ui::header_cell("Percent"),
        ]);
        let rows = [
            ("Social Insurance Rate", self.social_insurance_rate, 6),
            ("Taxes Rate", self.taxes_rate, 6),
            ("Additional Taxes Rate", self.additional_taxes_rate, 4),
        ];
        for (label, rate, places) in rows {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(rate.normalize()),
                Cell::new(ui::format_rate(rate, places)),
            ]);
        }
        table.add_row(vec![
            Cell::new("Commission Rate"),
            Cell::new(self.commission_rate.normalize()),
            Cell::new(""),
        ]);

        format!(
            "{}\n\n{}",
            ui::style_text("Settings", ui::StyleType::Title),
            table
        )
    }
}

pub async fn run(command: SettingsCommand, store: &mut SettingsStore) -> Result<()> {
    match command {
        SettingsCommand::Show => {}
        SettingsCommand::Set(args) => {
            let updated = args.apply(store.settings());
            if !store.update(updated).await {
                bail!("Settings were not saved");
            }
            info!("Settings saved");
            println!("{}", ui::style_text("Settings saved", ui::StyleType::TotalValue));
        }
        SettingsCommand::Reset => {
            if !store.reset_to_defaults().await {
                bail!("Settings were not reset");
            }
            info!("Settings reset to defaults");
            println!(
                "{}",
                ui::style_text("Settings reset to defaults", ui::StyleType::TotalValue)
            );
        }
    }
    println!("{}", store.settings().display_as_table());
    Ok(())
}
