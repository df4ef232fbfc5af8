use clap::{Parser, Subcommand};

mod cmd;

/// Peruvian IGV invoice totals calculator
#[derive(Parser, Debug)]
#[command(name = "igvc", version, about)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute IGV totals for a list of line items
    Totals(cmd::totals::TotalsCommand),
    /// Report rows that would be left out of the totals
    Validate(cmd::validate::ValidateCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
    /// Build the invoice payload for a draft
    Invoice(cmd::invoice::InvoiceCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let opts = Opts::parse();
    match opts.command {
        Command::Totals(totals) => totals.exec(),
        Command::Validate(validate) => validate.exec(),
        Command::Schema(schema) => schema.exec(),
        Command::Invoice(invoice) => invoice.exec(),
    }
}
