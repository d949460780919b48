use super::amount::non_negative;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionBreakdown {
    pub base_value: Decimal,
    pub rate: Decimal,
    pub commission_amount: Decimal,
    pub total_amount: Decimal,
}

/// Applies a commission multiplier to `base`. The rate is a plain multiplier,
/// so a rate of 4000 turns 2000 into a commission of 8,000,000.
///
/// Results too large for a `Decimal` saturate at `Decimal::MAX`.
pub fn calculate_commission(base: Decimal, rate: Decimal) -> CommissionBreakdown {
    let base_value = non_negative(base);
    let rate = non_negative(rate);
    let commission_amount = base_value.saturating_mul(rate);

    CommissionBreakdown {
        base_value,
        rate,
        commission_amount,
        total_amount: base_value.saturating_add(commission_amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::amount::parse_amount;
    use rust_decimal_macros::dec;

    #[test]
    fn test_multiplier_semantics() {
        let result = calculate_commission(dec!(2000), dec!(4000));
        assert_eq!(result.commission_amount, dec!(8000000));
        assert_eq!(result.total_amount, dec!(8002000));
    }

    #[test]
    fn test_fractional_rate() {
        let result = calculate_commission(dec!(1500), dec!(0.05));
        assert_eq!(result.commission_amount, dec!(75));
        assert_eq!(result.total_amount, dec!(1575));
    }

    #[test]
    fn test_negative_inputs_are_zeroed() {
        let result = calculate_commission(dec!(-10), dec!(4000));
        assert_eq!(result.base_value, Decimal::ZERO);
        assert_eq!(result.total_amount, Decimal::ZERO);

        let result = calculate_commission(dec!(100), dec!(-2));
        assert_eq!(result.rate, Decimal::ZERO);
        assert_eq!(result.total_amount, dec!(100));
    }

    #[test]
    fn test_huge_inputs_saturate() {
        let base = parse_amount("79228162514264337593543950335");
        let result = calculate_commission(base, dec!(4000));
        assert_eq!(result.base_value, Decimal::MAX);
        assert_eq!(result.commission_amount, Decimal::MAX);
        assert_eq!(result.total_amount, Decimal::MAX);

        let result = calculate_commission(dec!(2000), parse_amount("1e27"));
        assert_eq!(result.commission_amount, Decimal::MAX);
        assert_eq!(result.total_amount, Decimal::MAX);
    }
}
