use super::affectation::AffectationCodes;
use super::rounding::RoundingPolicy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Peruvian IGV rate
pub const IGV_RATE: Decimal = dec!(0.18);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tax rate must be between 0 and 1, got {0}")]
    RateOutOfRange(Decimal),
    #[error("affectation code for {0} items must not be empty")]
    EmptyCode(&'static str),
    #[error("taxable and exempt items share the affectation code '{0}'")]
    DuplicateCode(String),
}

/// Jurisdiction settings for the totals calculation.
///
/// Only built through `Default` or `TaxConfig::new`, so the rate is always
/// within 0..=1 and the codes are non-empty and distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxConfig {
    rate: Decimal,
    codes: AffectationCodes,
    rounding: RoundingPolicy,
}

impl Default for TaxConfig {
    fn default() -> Self {
        TaxConfig {
            rate: IGV_RATE,
            codes: AffectationCodes::default(),
            rounding: RoundingPolicy::default(),
        }
    }
}

impl TaxConfig {
    pub fn new(
        rate: Decimal,
        codes: AffectationCodes,
        rounding: RoundingPolicy,
    ) -> Result<Self, ConfigError> {
        if rate < Decimal::ZERO || rate > Decimal::ONE {
            return Err(ConfigError::RateOutOfRange(rate));
        }
        let taxable = codes.taxable.trim().to_string();
        let exempt = codes.exempt.trim().to_string();
        if taxable.is_empty() {
            return Err(ConfigError::EmptyCode("taxable"));
        }
        if exempt.is_empty() {
            return Err(ConfigError::EmptyCode("exempt"));
        }
        if taxable == exempt {
            return Err(ConfigError::DuplicateCode(taxable));
        }
        Ok(TaxConfig {
            rate,
            codes: AffectationCodes { taxable, exempt },
            rounding,
        })
    }

    /// Tax rate as a fraction (0.18 = 18%)
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn codes(&self) -> &AffectationCodes {
        &self.codes
    }

    pub fn rounding(&self) -> RoundingPolicy {
        self.rounding
    }

    /// Rate as a percentage for display, e.g. 18
    pub fn rate_pct(&self) -> Decimal {
        (self.rate * dec!(100)).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(taxable: &str, exempt: &str) -> AffectationCodes {
        AffectationCodes {
            taxable: taxable.to_string(),
            exempt: exempt.to_string(),
        }
    }

    #[test]
    fn default_is_igv() {
        let config = TaxConfig::default();
        assert_eq!(config.rate(), dec!(0.18));
        assert_eq!(config.codes().taxable, "10");
        assert_eq!(config.codes().exempt, "20");
        assert_eq!(config.rounding(), RoundingPolicy::HalfAwayFromZero);
        assert_eq!(config.rate_pct(), dec!(18));
    }

    #[test]
    fn rejects_rate_out_of_range() {
        let err = TaxConfig::new(dec!(1.5), codes("10", "20"), RoundingPolicy::default());
        assert_eq!(err, Err(ConfigError::RateOutOfRange(dec!(1.5))));
        let err = TaxConfig::new(dec!(-0.01), codes("10", "20"), RoundingPolicy::default());
        assert_eq!(err, Err(ConfigError::RateOutOfRange(dec!(-0.01))));
        // 1 + rate would be zero
        let err = TaxConfig::new(dec!(-1), codes("10", "20"), RoundingPolicy::default());
        assert_eq!(err, Err(ConfigError::RateOutOfRange(dec!(-1))));
    }

    #[test]
    fn rejects_bad_codes() {
        let rounding = RoundingPolicy::default();
        assert_eq!(
            TaxConfig::new(dec!(0.18), codes(" ", "20"), rounding),
            Err(ConfigError::EmptyCode("taxable"))
        );
        assert_eq!(
            TaxConfig::new(dec!(0.18), codes("10", ""), rounding),
            Err(ConfigError::EmptyCode("exempt"))
        );
        assert_eq!(
            TaxConfig::new(dec!(0.18), codes("10", " 10"), rounding),
            Err(ConfigError::DuplicateCode("10".to_string()))
        );
    }

    #[test]
    fn accepts_zero_rate() {
        let config = TaxConfig::new(Decimal::ZERO, codes("10", "20"), RoundingPolicy::HalfEven)
            .unwrap();
        assert_eq!(config.rate_pct(), dec!(0));
        assert_eq!(config.rounding(), RoundingPolicy::HalfEven);
    }

    #[test]
    fn new_trims_codes() {
        let config =
            TaxConfig::new(dec!(0.18), codes(" G ", "E "), RoundingPolicy::default()).unwrap();
        assert_eq!(config.codes().taxable, "G");
        assert_eq!(config.codes().exempt, "E");
    }
}
