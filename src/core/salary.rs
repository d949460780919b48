//! Salary deduction calculator.
use super::amount::non_negative;
use super::settings::RateSettings;
use rust_decimal::Decimal;

/// Proportional deduction rates applied to the gross salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryRates {
    pub social_insurance: Decimal,
    pub taxes: Decimal,
    pub additional_taxes: Decimal,
}

impl From<&RateSettings> for SalaryRates {
    fn from(settings: &RateSettings) -> Self {
        Self {
            social_insurance: settings.social_insurance_rate,
            taxes: settings.taxes_rate,
            additional_taxes: settings.additional_taxes_rate,
        }
    }
}

/// Fixed amounts subtracted on top of the proportional deductions.
/// `None` means the deduction is not enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedDeductions {
    pub penalty: Option<Decimal>,
    pub additional_deduction: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryBreakdown {
    pub gross_salary: Decimal,
    pub rates: SalaryRates,
    pub social_insurance_deduction: Decimal,
    pub taxes_deduction: Decimal,
    pub additional_taxes_deduction: Decimal,
    pub penalty_deduction: Decimal,
    pub additional_deduction: Decimal,
    pub total_deductions: Decimal,
    pub net_salary: Decimal,
}

/// Computes each deduction and the resulting net salary.
///
/// Negative inputs are treated as zero, so a salary is never increased by a
/// deduction. Deductions too large for a `Decimal` saturate at `Decimal::MAX`.
pub fn calculate_salary(
    gross: Decimal,
    rates: &SalaryRates,
    fixed: &FixedDeductions,
) -> SalaryBreakdown {
    let gross = non_negative(gross);
    let rates = SalaryRates {
        social_insurance: non_negative(rates.social_insurance),
        taxes: non_negative(rates.taxes),
        additional_taxes: non_negative(rates.additional_taxes),
    };

    let social_insurance_deduction = gross.saturating_mul(rates.social_insurance);
    let taxes_deduction = gross.saturating_mul(rates.taxes);
    let additional_taxes_deduction = gross.saturating_mul(rates.additional_taxes);
    let penalty_deduction = fixed.penalty.map_or(Decimal::ZERO, non_negative);
    let additional_deduction = fixed.additional_deduction.map_or(Decimal::ZERO, non_negative);

    let total_deductions = [
        social_insurance_deduction,
        taxes_deduction,
        additional_taxes_deduction,
        penalty_deduction,
        additional_deduction,
    ]
    .into_iter()
    .fold(Decimal::ZERO, Decimal::saturating_add);

    SalaryBreakdown {
        gross_salary: gross,
        rates,
        social_insurance_deduction,
        taxes_deduction,
        additional_taxes_deduction,
        penalty_deduction,
        additional_deduction,
        total_deductions,
        net_salary: gross - total_deductions,
    }
}
