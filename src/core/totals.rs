//! IGV totals for a list of invoice line items.
//!
//! Taxable unit prices include IGV: the base is recovered by dividing by
//! `1 + rate`. Every line amount is rounded to cents before it is summed, so
//! the totals don't depend on item order.
//!
//! All arithmetic is checked. A line whose amounts, or whose addition to the
//! running totals, would not fit in a `Decimal` is excluded with
//! `Warning::AmountOverflow` instead of panicking.

use super::affectation::Affectation;
use super::config::TaxConfig;
use super::line_item::LineItem;
use super::warnings::{exclusion, Warning};
use rust_decimal::Decimal;

/// Aggregate totals of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaxTotals {
    /// Sum of IGV-exclusive values of taxable items (gravadas)
    pub taxable_base: Decimal,
    /// Sum of values of exempt items (exoneradas)
    pub exempt_base: Decimal,
    /// IGV on taxable items
    pub tax: Decimal,
    /// taxable_base + exempt_base (valor venta)
    pub net_value: Decimal,
    /// net_value + tax
    pub grand_total: Decimal,
}

impl TaxTotals {
    pub fn sub_total(&self) -> Decimal {
        self.net_value
    }

    /// Totals with `line` added, or `None` if any figure would overflow.
    fn add_line(&self, line: &LineTotals, config: &TaxConfig) -> Option<TaxTotals> {
        let round2 = |value| config.rounding().round2(value);
        let (taxable_base, exempt_base, tax) = match line.outcome {
            LineOutcome::Included(Affectation::Taxable) => (
                round2(self.taxable_base.checked_add(line.base)?),
                self.exempt_base,
                round2(self.tax.checked_add(line.tax)?),
            ),
            LineOutcome::Included(Affectation::Exempt) => (
                self.taxable_base,
                round2(self.exempt_base.checked_add(line.base)?),
                self.tax,
            ),
            LineOutcome::Excluded(_) => return Some(*self),
        };
        let net_value = round2(taxable_base.checked_add(exempt_base)?);
        let grand_total = round2(net_value.checked_add(tax)?);
        Some(TaxTotals {
            taxable_base,
            exempt_base,
            tax,
            net_value,
            grand_total,
        })
    }
}

/// How a single line was treated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Included(Affectation),
    Excluded(Warning),
}

/// Per-line amounts, all rounded to cents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTotals {
    pub index: usize,
    pub outcome: LineOutcome,
    pub base: Decimal,
    pub tax: Decimal,
}

impl LineTotals {
    fn excluded(index: usize, warning: Warning) -> Self {
        LineTotals {
            index,
            outcome: LineOutcome::Excluded(warning),
            base: Decimal::ZERO,
            tax: Decimal::ZERO,
        }
    }

    /// Base plus tax; `assess_line` only includes lines where this fits.
    pub fn total(&self) -> Decimal {
        self.base.saturating_add(self.tax)
    }

    pub fn is_excluded(&self) -> bool {
        matches!(self.outcome, LineOutcome::Excluded(_))
    }
}

/// Amounts contributed by one line item.
pub fn assess_line(index: usize, item: &LineItem, config: &TaxConfig) -> LineTotals {
    if let Some(warning) = exclusion(item, config) {
        return LineTotals::excluded(index, warning);
    }
    // exclusion() has already rejected unknown codes
    let affectation = config
        .codes()
        .classify(&item.affectation_code)
        .unwrap_or(Affectation::Exempt);

    match line_amounts(affectation, item, config) {
        Some((base, tax)) => LineTotals {
            index,
            outcome: LineOutcome::Included(affectation),
            base,
            tax,
        },
        None => LineTotals::excluded(index, Warning::AmountOverflow),
    }
}

fn line_amounts(
    affectation: Affectation,
    item: &LineItem,
    config: &TaxConfig,
) -> Option<(Decimal, Decimal)> {
    let round2 = |value| config.rounding().round2(value);
    let (base, tax) = match affectation {
        Affectation::Taxable => {
            let divisor = Decimal::ONE.checked_add(config.rate())?;
            let unit_base = item.unit_price.checked_div(divisor)?;
            let base = round2(unit_base.checked_mul(item.quantity)?);
            (base, round2(base.checked_mul(config.rate())?))
        }
        Affectation::Exempt => (
            round2(item.unit_price.checked_mul(item.quantity)?),
            Decimal::ZERO,
        ),
    };
    base.checked_add(tax)?;
    Some((base, tax))
}

/// Per-line breakdown, in input order.
///
/// A line that would overflow the running totals is marked excluded, so
/// `summarize` over the result includes every included line.
pub fn line_breakdown(items: &[LineItem], config: &TaxConfig) -> Vec<LineTotals> {
    let mut running = TaxTotals::default();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let line = assess_line(index, item, config);
            match running.add_line(&line, config) {
                Some(next) => {
                    running = next;
                    line
                }
                None => LineTotals::excluded(index, Warning::AmountOverflow),
            }
        })
        .collect()
}

/// Compute invoice totals. Invalid rows contribute nothing; this never fails.
pub fn calculate_totals(items: &[LineItem], config: &TaxConfig) -> TaxTotals {
    summarize(&line_breakdown(items, config), config)
}

/// Sum an already computed breakdown into invoice totals.
///
/// Lines that would overflow the totals are skipped.
pub fn summarize(lines: &[LineTotals], config: &TaxConfig) -> TaxTotals {
    lines.iter().fold(TaxTotals::default(), |totals, line| {
        totals.add_line(line, config).unwrap_or(totals)
    })
}
