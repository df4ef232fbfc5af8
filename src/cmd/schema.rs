//! Schema command - print expected input formats

use clap::Args;
use igvc::core::{InvoiceDraft, ItemsInput, LineItemRecord};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for line item input
    JsonSchema,
    /// JSON Schema for an invoice draft
    InvoiceSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(ItemsInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::InvoiceSchema => {
                let schema = schema_for!(InvoiceDraft);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", LineItemRecord::csv_header()),
            SchemaFormat::CsvFields => print_csv_fields(),
        }
        Ok(())
    }
}

fn print_csv_fields() {
    println!("CSV Input Format");
    println!("================");
    println!();
    for field in LineItemRecord::csv_schema() {
        let req = if field.required { "required" } else { "optional" };
        println!("{:14} ({:8})  {}", field.name, req, field.description);
    }
    println!();
    println!("Unit prices of taxable (10) items include IGV; exempt (20) items carry none");
}
