use super::invoice::InvoiceDraft;
use super::line_item::{LineItem, LineItemError, LineItemRecord};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// JSON input root for line items
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ItemsInput {
    pub items: Vec<LineItemRecord>,
}

/// A row whose numbers could not be read, with its 1-based row number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub row: usize,
    pub error: LineItemError,
}

/// Parsed line items; `items` keeps the input order of accepted rows
#[derive(Debug, Clone, Default)]
pub struct ParsedItems {
    pub items: Vec<LineItem>,
    /// 1-based input row of each accepted item
    pub rows: Vec<usize>,
    pub rejected: Vec<RejectedRow>,
}

impl ParsedItems {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = LineItemRecord>,
    {
        let mut parsed = ParsedItems::default();
        for (index, record) in records.into_iter().enumerate() {
            match record.parse() {
                Ok(item) => {
                    parsed.items.push(item);
                    parsed.rows.push(index + 1);
                }
                Err(error) => parsed.rejected.push(RejectedRow {
                    row: index + 1,
                    error,
                }),
            }
        }
        parsed
    }

    /// Input row number of the accepted item at `index`
    pub fn source_row(&self, index: usize) -> usize {
        self.rows.get(index).copied().unwrap_or(index + 1)
    }
}

/// Read line items from CSV
pub fn read_items_csv<R: Read>(reader: R) -> anyhow::Result<ParsedItems> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records: Result<Vec<LineItemRecord>, _> = rdr.deserialize::<LineItemRecord>().collect();
    Ok(ParsedItems::from_records(records?))
}

/// Read line items from JSON (`{"items": [...]}`)
pub fn read_items_json<R: Read>(reader: R) -> anyhow::Result<ParsedItems> {
    let input: ItemsInput = from_json_reader(reader)?;
    Ok(ParsedItems::from_records(input.items))
}

/// Read an invoice draft from JSON
pub fn read_draft_json<R: Read>(reader: R) -> anyhow::Result<InvoiceDraft> {
    from_json_reader(reader)
}

/// Read line items from a file, or stdin with "-"
pub fn read_items(path: &Path) -> anyhow::Result<ParsedItems> {
    if path.as_os_str() == "-" {
        let buffer = read_stdin()?;
        if buffer.trim_start().starts_with('{') {
            read_items_json(buffer.as_bytes())
        } else {
            read_items_csv(buffer.as_bytes())
        }
    } else {
        let reader = BufReader::new(File::open(path)?);
        if is_json(path) {
            read_items_json(reader)
        } else {
            read_items_csv(reader)
        }
    }
}

/// Read an invoice draft from a file, or stdin with "-"
pub fn read_draft(path: &Path) -> anyhow::Result<InvoiceDraft> {
    if path.as_os_str() == "-" {
        let buffer = read_stdin()?;
        read_draft_json(buffer.as_bytes())
    } else {
        read_draft_json(BufReader::new(File::open(path)?))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buffer = String::new();
    io::stdin().lock().read_to_string(&mut buffer)?;

    if buffer.trim().is_empty() {
        anyhow::bail!("No input received. Provide a file or pipe data to stdin.");
    }
    Ok(buffer)
}

/// Deserialize JSON where form values may arrive as numbers or as text.
///
/// Every input field is textual, so numbers are turned into their string form
/// before deserializing; parsing happens later in `LineItemRecord::parse`.
fn from_json_reader<T, R>(reader: R) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    R: Read,
{
    let mut value: Value = serde_json::from_reader(reader)?;
    numbers_to_text(&mut value);
    Ok(serde_json::from_value(value)?)
}

fn numbers_to_text(value: &mut Value) {
    match value {
        Value::Number(n) => *value = Value::String(n.to_string()),
        Value::Array(values) => values.iter_mut().for_each(numbers_to_text),
        Value::Object(map) => map.values_mut().for_each(numbers_to_text),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_csv_rows() {
        let csv_data = "description,code,quantity,unit_price,affectation
Habitación simple,HAB-S,2,118.00,10
Desayuno,,1,30.00,20
Cochera,,1,12345678901234567.89,20
Minibar,,3,15.50,";

        let parsed = read_items_csv(csv_data.as_bytes()).unwrap();
        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.items.len(), 4);

        let first = &parsed.items[0];
        assert_eq!(first.description.as_deref(), Some("Habitación simple"));
        assert_eq!(first.code.as_deref(), Some("HAB-S"));
        assert_eq!(first.quantity, dec!(2));
        assert_eq!(first.unit_price, dec!(118.00));
        assert_eq!(first.affectation_code, "10");

        assert_eq!(parsed.items[1].code, None);
        assert_eq!(parsed.items[1].affectation_code, "20");
        // no float round trip for CSV values
        assert_eq!(parsed.items[2].unit_price, dec!(12345678901234567.89));
        // blank affectation defaults to taxable
        assert_eq!(parsed.items[3].affectation_code, "10");
    }

    #[test]
    fn unparseable_rows_are_rejected_not_fatal() {
        let csv_data = "description,code,quantity,unit_price,affectation
A,,1,10,10
B,,uno,10,10
C,,1,,20";

        let parsed = read_items_csv(csv_data.as_bytes()).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.rejected.len(), 1);
        assert_eq!(parsed.rejected[0].row, 2);
        assert_eq!(
            parsed.rejected[0].error.to_string(),
            "quantity is not a number: 'uno'"
        );
        assert_eq!(parsed.items[1].unit_price, dec!(0));
        assert_eq!(parsed.source_row(1), 3);
    }

    #[test]
    fn json_numbers_and_strings() {
        let json_data = r#"{
            "items": [
                {"description": "Suite", "quantity": 1, "unit_price": 354.0, "affectation": 10},
                {"cantidad": "2", "precioUnitario": "50.00", "tipAfeIgv": "20"},
                {"quantity": 1, "unit_price": 1e-2}
            ]
        }"#;

        let parsed = read_items_json(json_data.as_bytes()).unwrap();
        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.items.len(), 3);
        assert_eq!(parsed.items[0].unit_price, dec!(354));
        assert_eq!(parsed.items[0].affectation_code, "10");
        assert_eq!(parsed.items[1].quantity, dec!(2));
        assert_eq!(parsed.items[1].affectation_code, "20");
        assert_eq!(parsed.items[2].unit_price, dec!(0.01));
    }

    #[test]
    fn draft_numbers_become_text() {
        let json_data = r#"{
            "tipoDocumento": "03",
            "serie": "b001",
            "numero": 15,
            "clienteTipoDoc": "1",
            "customerRuc": 45678912,
            "customerName": "Ana Quispe",
            "customerAddress": "-",
            "items": [{"descripcion": "Noche", "cantidad": 1, "precioUnitario": 120}]
        }"#;

        let draft = read_draft_json(json_data.as_bytes()).unwrap();
        assert_eq!(draft.numero, "15");
        assert_eq!(draft.customer_ruc, "45678912");
        assert_eq!(draft.items[0].unit_price, "120");
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let csv_data = "description,quantity\nA,1";
        assert!(read_items_csv(csv_data.as_bytes()).is_err());
    }
}
