use super::affectation::TAXABLE_CODE;
use igvc_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum LineItemError {
    #[error("{field} is not a number: '{value}'")]
    NotANumber { field: &'static str, value: String },
}

/// One purchasable entry on an invoice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    pub quantity: Decimal,
    /// IGV-inclusive when the item is taxable
    pub unit_price: Decimal,
    pub affectation_code: String,
    pub description: Option<String>,
    pub code: Option<String>,
}

impl LineItem {
    pub fn new(quantity: Decimal, unit_price: Decimal, affectation_code: &str) -> Self {
        LineItem {
            quantity,
            unit_price,
            affectation_code: affectation_code.to_string(),
            description: None,
            code: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Column description generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Raw line item row as typed by the user (CSV columns or a JSON object)
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, CsvSchema)]
pub struct LineItemRecord {
    /// Item description shown on the invoice
    #[serde(default, alias = "descripcion")]
    pub description: Option<String>,
    /// Product or service code
    #[serde(default, alias = "codigo")]
    pub code: Option<String>,
    /// Number of units (rows with quantity <= 0 are ignored)
    #[serde(alias = "cantidad")]
    pub quantity: String,
    /// Unit price, IGV-inclusive for taxable items
    #[serde(alias = "precioUnitario")]
    pub unit_price: String,
    /// Affectation code: 10 = gravado, 20 = exonerado (default 10)
    #[serde(default, alias = "tipAfeIgv")]
    pub affectation: Option<String>,
}

impl LineItemRecord {
    /// Explicit numeric parse of a typed row.
    ///
    /// Blank numbers read as zero so a half-filled row is simply ignored by the
    /// totals; anything else that isn't a decimal is rejected.
    pub fn parse(&self) -> Result<LineItem, LineItemError> {
        let quantity = parse_amount("quantity", &self.quantity)?;
        let unit_price = parse_amount("unit_price", &self.unit_price)?;
        let affectation_code = self
            .affectation
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(TAXABLE_CODE)
            .to_string();

        Ok(LineItem {
            quantity,
            unit_price,
            affectation_code,
            description: non_empty(self.description.as_deref()),
            code: non_empty(self.code.as_deref()),
        })
    }
}

fn parse_amount(field: &'static str, raw: &str) -> Result<Decimal, LineItemError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| LineItemError::NotANumber {
            field,
            value: raw.to_string(),
        })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(quantity: &str, unit_price: &str, affectation: Option<&str>) -> LineItemRecord {
        LineItemRecord {
            quantity: quantity.to_string(),
            unit_price: unit_price.to_string(),
            affectation: affectation.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn parses_typed_row() {
        let item = record("2", "50.00", Some("20")).parse().unwrap();
        assert_eq!(item.quantity, dec!(2));
        assert_eq!(item.unit_price, dec!(50.00));
        assert_eq!(item.affectation_code, "20");
    }

    #[test]
    fn missing_affectation_defaults_to_taxable() {
        assert_eq!(record("1", "1", None).parse().unwrap().affectation_code, "10");
        assert_eq!(record("1", "1", Some("  ")).parse().unwrap().affectation_code, "10");
    }

    #[test]
    fn blank_numbers_read_as_zero() {
        let item = record("", " ", None).parse().unwrap();
        assert_eq!(item.quantity, Decimal::ZERO);
        assert_eq!(item.unit_price, Decimal::ZERO);
    }

    #[test]
    fn scientific_notation_accepted() {
        let item = record("1e1", "1.5e2", None).parse().unwrap();
        assert_eq!(item.quantity, dec!(10));
        assert_eq!(item.unit_price, dec!(150));
    }

    #[test]
    fn non_numeric_is_rejected() {
        assert_eq!(
            record("two", "10", None).parse(),
            Err(LineItemError::NotANumber {
                field: "quantity",
                value: "two".to_string()
            })
        );
        assert_eq!(
            record("1", "S/ 10", None).parse(),
            Err(LineItemError::NotANumber {
                field: "unit_price",
                value: "S/ 10".to_string()
            })
        );
    }

    #[test]
    fn json_accepts_form_field_names() {
        let json = r#"{"descripcion": "Habitación doble", "cantidad": "2", "precioUnitario": "118.00", "tipAfeIgv": "10"}"#;
        let record: LineItemRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.quantity, "2");
        assert_eq!(record.unit_price, "118.00");
        assert_eq!(record.affectation.as_deref(), Some("10"));

        let item = record.parse().unwrap();
        assert_eq!(item.description.as_deref(), Some("Habitación doble"));
        assert_eq!(item.unit_price, dec!(118.00));
    }

    #[test]
    fn csv_schema_lists_columns() {
        assert_eq!(
            LineItemRecord::csv_header(),
            "description,code,quantity,unit_price,affectation"
        );
        let required: Vec<_> = LineItemRecord::csv_schema()
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, vec!["quantity", "unit_price"]);
    }
}
