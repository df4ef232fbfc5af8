pub mod affectation;
pub mod config;
pub mod input;
pub mod invoice;
pub mod line_item;
pub mod rounding;
pub mod totals;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use affectation::{Affectation, AffectationCodes, EXEMPT_CODE, TAXABLE_CODE};
pub use config::{ConfigError, TaxConfig, IGV_RATE};
pub use input::{
    read_draft, read_draft_json, read_items, read_items_csv, read_items_json, ItemsInput,
    ParsedItems, RejectedRow,
};
pub use invoice::{
    validate_customer_document, Currency, CustomerDocType, DocumentKind, DocumentRef,
    DocumentType, InvoiceDraft, InvoiceError, InvoicePayload,
};
pub use line_item::{CsvField, LineItem, LineItemError, LineItemRecord};
pub use rounding::RoundingPolicy;
pub use totals::{
    assess_line, calculate_totals, line_breakdown, summarize, LineOutcome, LineTotals, TaxTotals,
};
pub use warnings::{exclusion, validate_items, RowIssue, Warning};
