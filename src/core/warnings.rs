use super::config::TaxConfig;
use super::line_item::LineItem;
use super::totals::{line_breakdown, LineOutcome};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Reasons a line item is left out of the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Warning {
    /// Quantity is zero or negative
    NonPositiveQuantity { quantity: Decimal },
    /// Unit price is below zero
    NegativeUnitPrice { unit_price: Decimal },
    /// Affectation code is neither the taxable nor the exempt code
    UnknownAffectation { code: String },
    /// The line amount, or the running totals with it, exceed what a decimal can hold
    AmountOverflow,
}

impl Warning {
    pub fn name(&self) -> &'static str {
        match self {
            Warning::NonPositiveQuantity { .. } => "NonPositiveQuantity",
            Warning::NegativeUnitPrice { .. } => "NegativeUnitPrice",
            Warning::UnknownAffectation { .. } => "UnknownAffectation",
            Warning::AmountOverflow => "AmountOverflow",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NonPositiveQuantity { quantity } => {
                write!(f, "quantity must be greater than zero (got {quantity})")
            }
            Warning::NegativeUnitPrice { unit_price } => {
                write!(f, "unit price must not be negative (got {unit_price})")
            }
            Warning::UnknownAffectation { code } => {
                write!(f, "unknown affectation code '{code}'")
            }
            Warning::AmountOverflow => f.write_str("amount is too large to total"),
        }
    }
}

/// Why `item` would be ignored by the totals, if it would be.
pub fn exclusion(item: &LineItem, config: &TaxConfig) -> Option<Warning> {
    if item.quantity <= Decimal::ZERO {
        return Some(Warning::NonPositiveQuantity {
            quantity: item.quantity,
        });
    }
    if item.unit_price < Decimal::ZERO {
        return Some(Warning::NegativeUnitPrice {
            unit_price: item.unit_price,
        });
    }
    if config.codes().classify(&item.affectation_code).is_none() {
        return Some(Warning::UnknownAffectation {
            code: item.affectation_code.clone(),
        });
    }
    None
}

/// An excluded row, with its zero-based position in the item list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    pub index: usize,
    pub warning: Warning,
}

/// Strict pre-check: every row the totals would silently drop.
pub fn validate_items(items: &[LineItem], config: &TaxConfig) -> Vec<RowIssue> {
    line_breakdown(items, config)
        .into_iter()
        .filter_map(|line| match line.outcome {
            LineOutcome::Excluded(warning) => Some(RowIssue {
                index: line.index,
                warning,
            }),
            LineOutcome::Included(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn valid_items_have_no_issues() {
        let items = vec![
            LineItem::new(dec!(1), dec!(118), "10"),
            LineItem::new(dec!(2), dec!(0), "20"),
        ];
        assert!(validate_items(&items, &TaxConfig::default()).is_empty());
    }

    #[test]
    fn each_exclusion_reported_once() {
        let items = vec![
            LineItem::new(dec!(0), dec!(50), "10"),
            LineItem::new(dec!(1), dec!(118), "10"),
            LineItem::new(dec!(1), dec!(-10), "10"),
            LineItem::new(dec!(-2), dec!(-10), "99"),
            LineItem::new(dec!(1), dec!(10), "99"),
        ];
        let issues = validate_items(&items, &TaxConfig::default());

        assert_eq!(issues.len(), 4);
        assert_eq!(issues[0].index, 0);
        assert_eq!(issues[0].warning.name(), "NonPositiveQuantity");
        assert_eq!(issues[1].index, 2);
        assert_eq!(
            issues[1].warning,
            Warning::NegativeUnitPrice {
                unit_price: dec!(-10)
            }
        );
        // quantity is checked before price and code
        assert_eq!(issues[2].warning.name(), "NonPositiveQuantity");
        assert_eq!(
            issues[3].warning,
            Warning::UnknownAffectation {
                code: "99".to_string()
            }
        );
    }

    #[test]
    fn oversized_amounts_reported() {
        let items = vec![
            LineItem::new(dec!(2), Decimal::MAX, "20"),
            LineItem::new(dec!(1), dec!(118), "10"),
        ];
        let issues = validate_items(&items, &TaxConfig::default());
        assert_eq!(
            issues,
            vec![RowIssue {
                index: 0,
                warning: Warning::AmountOverflow
            }]
        );
        assert_eq!(issues[0].warning.to_string(), "amount is too large to total");
    }

    #[test]
    fn warning_serializes_with_type_tag() {
        let json = serde_json::to_string(&Warning::UnknownAffectation {
            code: "30".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"UnknownAffectation","code":"30"}"#);
    }
}
