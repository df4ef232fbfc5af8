pub mod invoice;
pub mod schema;
pub mod totals;
pub mod validate;

use clap::{Args, ValueEnum};
use igvc::core::{
    read_items, AffectationCodes, ParsedItems, RoundingPolicy, TaxConfig, EXEMPT_CODE, IGV_RATE,
    TAXABLE_CODE,
};
use rust_decimal::Decimal;
use std::path::Path;

/// Tax settings shared by the commands that compute totals
#[derive(Args, Debug, Clone)]
pub struct TaxArgs {
    /// Tax rate as a fraction (0.18 = 18%)
    #[arg(long, default_value_t = IGV_RATE)]
    rate: Decimal,

    /// Affectation code of taxable (gravado) items
    #[arg(long, default_value = TAXABLE_CODE)]
    taxable_code: String,

    /// Affectation code of exempt (exonerado) items
    #[arg(long, default_value = EXEMPT_CODE)]
    exempt_code: String,

    /// Rounding rule for cents
    #[arg(long, value_enum, default_value_t = RoundingArg::HalfUp)]
    rounding: RoundingArg,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RoundingArg {
    /// Round half away from zero
    #[default]
    HalfUp,
    /// Banker's rounding
    HalfEven,
}

impl From<RoundingArg> for RoundingPolicy {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::HalfUp => RoundingPolicy::HalfAwayFromZero,
            RoundingArg::HalfEven => RoundingPolicy::HalfEven,
        }
    }
}

impl TaxArgs {
    pub fn config(&self) -> anyhow::Result<TaxConfig> {
        let codes = AffectationCodes {
            taxable: self.taxable_code.clone(),
            exempt: self.exempt_code.clone(),
        };
        let config = TaxConfig::new(self.rate, codes, self.rounding.into())?;
        log::debug!("Tax config: {:?}", config);
        Ok(config)
    }
}

/// Read line items (CSV or JSON, "-" for stdin), logging rows that can't be read
pub fn load_items(path: &Path) -> anyhow::Result<ParsedItems> {
    let parsed = read_items(path)?;
    log::info!(
        "Read {} line items ({} rejected)",
        parsed.items.len() + parsed.rejected.len(),
        parsed.rejected.len()
    );
    for rejected in &parsed.rejected {
        log::warn!("Row {}: {} (skipped)", rejected.row, rejected.error);
    }
    Ok(parsed)
}
