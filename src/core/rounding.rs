use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places every monetary amount is rounded to
pub const MONEY_DP: u32 = 2;

/// Midpoint rule applied when rounding to cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundingPolicy {
    /// 0.005 -> 0.01, -0.005 -> -0.01
    #[default]
    HalfAwayFromZero,
    /// Banker's rounding: 0.005 -> 0.00, 0.015 -> 0.02
    HalfEven,
}

impl RoundingPolicy {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingPolicy::HalfAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            RoundingPolicy::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }

    /// Round to 2 decimal places.
    pub fn round2(self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(MONEY_DP, self.strategy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn half_away_from_zero_midpoints() {
        let policy = RoundingPolicy::HalfAwayFromZero;
        assert_eq!(policy.round2(dec!(1.005)), dec!(1.01));
        assert_eq!(policy.round2(dec!(2.675)), dec!(2.68));
        assert_eq!(policy.round2(dec!(-1.005)), dec!(-1.01));
        assert_eq!(policy.round2(dec!(0.004)), dec!(0.00));
    }

    #[test]
    fn half_even_midpoints() {
        let policy = RoundingPolicy::HalfEven;
        assert_eq!(policy.round2(dec!(1.005)), dec!(1.00));
        assert_eq!(policy.round2(dec!(1.015)), dec!(1.02));
        assert_eq!(policy.round2(dec!(1.0051)), dec!(1.01));
    }

    #[test]
    fn rounding_is_idempotent() {
        for policy in [RoundingPolicy::HalfAwayFromZero, RoundingPolicy::HalfEven] {
            let once = policy.round2(dec!(84.745762711864406779661017));
            assert_eq!(policy.round2(once), once);
            assert_eq!(once, dec!(84.75));
        }
    }
}
