//! Validate command - surface rows the totals would leave out

use super::{load_items, TaxArgs};
use clap::Args;
use igvc::core::{validate_items, LineItem, ParsedItems, RowIssue};
use igvc::utils::format_quantity;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// CSV or JSON file containing line items ("-" for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,

    #[command(flatten)]
    tax: TaxArgs,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    row: usize,
    description: String,
    quantity: String,
    unit_price: String,
    message: String,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput {
    row_count: usize,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = self.tax.config()?;
        let parsed = load_items(&self.input)?;
        let issues = collect_issues(&parsed, &validate_items(&parsed.items, &config));
        let row_count = parsed.items.len() + parsed.rejected.len();

        if self.json {
            self.print_json(&issues, row_count)?;
        } else {
            self.print_text(&issues, row_count);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }

    fn print_text(&self, issues: &[ValidationIssue], row_count: usize) {
        println!();
        println!("VALIDATION RESULTS ({} rows)", row_count);
        println!();

        if issues.is_empty() {
            println!("\u{2713} No issues found.");
        } else {
            println!("\u{26A0} {} issue(s) found:", issues.len());
            println!();

            for (i, issue) in issues.iter().enumerate() {
                let description = if issue.description.is_empty() {
                    "(no description)"
                } else {
                    issue.description.as_str()
                };
                println!(
                    "  {}. [{}] Row {}: {}",
                    i + 1,
                    issue.issue_type,
                    issue.row,
                    description
                );
                println!("     {}", issue.message);
                println!();
            }
        }
    }

    fn print_json(&self, issues: &[ValidationIssue], row_count: usize) -> anyhow::Result<()> {
        let output = ValidationOutput {
            row_count,
            issue_count: issues.len(),
            issues: issues.to_vec(),
        };

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

/// Rows that could not be read and rows the totals would exclude, by input row
fn collect_issues(parsed: &ParsedItems, row_issues: &[RowIssue]) -> Vec<ValidationIssue> {
    let unreadable = parsed.rejected.iter().map(|rejected| ValidationIssue {
        issue_type: "Unparseable".to_string(),
        row: rejected.row,
        description: String::new(),
        quantity: String::new(),
        unit_price: String::new(),
        message: rejected.error.to_string(),
    });

    let excluded = row_issues.iter().filter_map(|issue| {
        let item: &LineItem = parsed.items.get(issue.index)?;
        Some(ValidationIssue {
            issue_type: issue.warning.name().to_string(),
            row: parsed.source_row(issue.index),
            description: item.description.clone().unwrap_or_default(),
            quantity: format_quantity(item.quantity),
            unit_price: format!("{:.2}", item.unit_price),
            message: issue.warning.to_string(),
        })
    });

    let mut issues: Vec<ValidationIssue> = unreadable.chain(excluded).collect();
    issues.sort_by_key(|issue| issue.row);
    issues
}
