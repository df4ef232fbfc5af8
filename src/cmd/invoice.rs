//! Invoice command - turn an invoice draft into the payload posted to the invoicing API

use super::TaxArgs;
use clap::Args;
use igvc::core::{read_draft, DocumentKind, InvoiceError, InvoicePayload};
use igvc::utils::format_money;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct InvoiceCommand {
    /// JSON file containing the invoice draft ("-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// RUC of the issuing company (11 digits)
    #[arg(long)]
    issuer_ruc: String,

    /// Write the payload to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    tax: TaxArgs,
}

impl InvoiceCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.tax.config()?;
        let draft = read_draft(&self.input)?;
        let today = chrono::Local::now().date_naive();

        let payload = match InvoicePayload::build(&draft, &self.issuer_ruc, &config, today) {
            Ok(payload) => payload,
            Err(InvoiceError::InvalidItems(issues)) => {
                for issue in &issues {
                    log::error!("Line item {}: {}", issue.index + 1, issue.warning);
                }
                return Err(InvoiceError::InvalidItems(issues).into());
            }
            Err(err) => return Err(err.into()),
        };

        let symbol = payload.tipo_moneda.symbol();
        log::info!(
            "{} {}-{}: {} items, total {}",
            payload.tipo_documento,
            payload.serie,
            payload.numero,
            payload.items.len(),
            format_money(symbol, payload.totals.total)
        );

        let json = serde_json::to_string_pretty(&payload)?;
        match &self.output {
            Some(path) => {
                let mut writer = BufWriter::new(File::create(path)?);
                writeln!(writer, "{}", json)?;
                writer.flush()?;
                eprintln!("Invoice payload written to {}", path.display());
            }
            None => println!("{}", json),
        }

        let document = payload.document_ref();
        for kind in DocumentKind::ALL {
            log::info!(
                "{} ({}) via /{}",
                document.file_name(kind),
                kind.mime_type(),
                kind.endpoint()
            );
        }
        Ok(())
    }
}
