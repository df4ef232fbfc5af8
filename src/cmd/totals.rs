//! Totals command - IGV summary for a list of line items

use super::{load_items, TaxArgs};
use clap::Args;
use igvc::core::{
    line_breakdown, summarize, LineItem, LineOutcome, LineTotals, ParsedItems, TaxConfig,
    TaxTotals,
};
use igvc::utils::{format_pen, format_quantity, write_csv};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct TotalsCommand {
    /// CSV or JSON file containing line items ("-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Show the per-line breakdown
    #[arg(short, long)]
    lines: bool,

    /// Output as JSON instead of formatted text
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output the per-line breakdown as CSV
    #[arg(long)]
    csv: bool,

    #[command(flatten)]
    tax: TaxArgs,
}

/// Row for the line breakdown table
#[derive(Debug, Clone, Tabled, Serialize)]
struct LineRow {
    #[tabled(rename = "#")]
    row: usize,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Unit Price")]
    unit_price: String,
    #[tabled(rename = "Base")]
    base: String,
    #[tabled(rename = "IGV")]
    igv: String,
    #[tabled(rename = "Total")]
    total: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct TotalsOutput {
    rate_pct: String,
    item_count: usize,
    excluded_count: usize,
    rejected_count: usize,
    taxable_base: String,
    exempt_base: String,
    igv: String,
    net_value: String,
    sub_total: String,
    grand_total: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    lines: Option<Vec<LineRow>>,
}

impl TotalsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.tax.config()?;
        let parsed = load_items(&self.input)?;

        let breakdown = line_breakdown(&parsed.items, &config);
        for line in &breakdown {
            if let LineOutcome::Excluded(warning) = &line.outcome {
                log::warn!(
                    "Row {}: {} (left out of totals)",
                    parsed.source_row(line.index),
                    warning
                );
            }
        }
        let excluded_count = breakdown.iter().filter(|l| l.is_excluded()).count();
        let totals = summarize(&breakdown, &config);
        let rows = build_line_rows(&parsed, &breakdown);

        if self.csv {
            write_csv(rows, io::stdout())
        } else if self.json {
            self.print_json(&totals, &config, &parsed, excluded_count, rows)
        } else {
            if self.lines {
                print_table(&rows);
            }
            print_summary(&totals, &config, excluded_count + parsed.rejected.len());
            Ok(())
        }
    }

    fn print_json(
        &self,
        totals: &TaxTotals,
        config: &TaxConfig,
        parsed: &ParsedItems,
        excluded_count: usize,
        rows: Vec<LineRow>,
    ) -> anyhow::Result<()> {
        let output = TotalsOutput {
            rate_pct: config.rate_pct().to_string(),
            item_count: parsed.items.len(),
            excluded_count,
            rejected_count: parsed.rejected.len(),
            taxable_base: format!("{:.2}", totals.taxable_base),
            exempt_base: format!("{:.2}", totals.exempt_base),
            igv: format!("{:.2}", totals.tax),
            net_value: format!("{:.2}", totals.net_value),
            sub_total: format!("{:.2}", totals.sub_total()),
            grand_total: format!("{:.2}", totals.grand_total),
            lines: self.lines.then_some(rows),
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

fn build_line_rows(parsed: &ParsedItems, breakdown: &[LineTotals]) -> Vec<LineRow> {
    parsed
        .items
        .iter()
        .zip(breakdown)
        .map(|(item, line)| line_row(parsed.source_row(line.index), item, line))
        .collect()
}

fn line_row(row: usize, item: &LineItem, line: &LineTotals) -> LineRow {
    let kind = match &line.outcome {
        LineOutcome::Included(affectation) => affectation.display_name().to_string(),
        LineOutcome::Excluded(warning) => format!("Excluded ({})", warning.name()),
    };
    LineRow {
        row,
        description: item.description.clone().unwrap_or_default(),
        kind,
        quantity: format_quantity(item.quantity),
        unit_price: format!("{:.2}", item.unit_price),
        base: format!("{:.2}", line.base),
        igv: format!("{:.2}", line.tax),
        total: format!("{:.2}", line.total()),
    }
}

fn print_table(rows: &[LineRow]) {
    if rows.is_empty() {
        println!("No line items");
        return;
    }

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(3..)).with(Alignment::right()))
        .to_string();
    println!("{}", table);
}

fn print_summary(totals: &TaxTotals, config: &TaxConfig, left_out: usize) {
    let rate = config.rate_pct();

    println!();
    println!("INVOICE TOTALS (IGV {}%)", rate);
    println!();
    println!("  Gravadas:     {:>16}", format_pen(totals.taxable_base));
    println!("  Exoneradas:   {:>16}", format_pen(totals.exempt_base));
    println!("  IGV ({}%):    {:>16}", rate, format_pen(totals.tax));
    println!("  ------------------------------");
    println!("  Valor Venta:  {:>16}", format_pen(totals.net_value));
    println!("  Sub Total:    {:>16}", format_pen(totals.sub_total()));
    println!("  Total:        {:>16}", format_pen(totals.grand_total));
    println!();

    if left_out > 0 {
        println!(
            "\u{26A0} {} row(s) left out of the totals (run `igvc validate` for details)",
            left_out
        );
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rows_keep_input_row_numbers() {
        let parsed = ParsedItems {
            items: vec![
                LineItem::new(dec!(1), dec!(118), "10").with_description("Suite"),
                LineItem::new(dec!(-1), dec!(5), "20"),
            ],
            rows: vec![1, 3],
            rejected: Vec::new(),
        };
        let breakdown = line_breakdown(&parsed.items, &TaxConfig::default());
        let rows = build_line_rows(&parsed, &breakdown);

        assert_eq!(rows[0].row, 1);
        assert_eq!(rows[0].description, "Suite");
        assert_eq!(rows[0].kind, "Gravado");
        assert_eq!(rows[0].base, "100.00");
        assert_eq!(rows[0].igv, "18.00");
        assert_eq!(rows[0].total, "118.00");
        assert_eq!(rows[1].row, 3);
        assert_eq!(rows[1].kind, "Excluded (NonPositiveQuantity)");
        assert_eq!(rows[1].total, "0.00");
    }
}
