//! IGV totals for Peruvian invoices.
//!
//! ```
//! use igvc::core::{calculate_totals, LineItem, TaxConfig};
//! use rust_decimal_macros::dec;
//!
//! let items = [
//!     LineItem::new(dec!(1), dec!(118.00), "10"),
//!     LineItem::new(dec!(1), dec!(30.00), "20"),
//! ];
//! let totals = calculate_totals(&items, &TaxConfig::default());
//! assert_eq!(totals.grand_total, dec!(148.00));
//! ```

pub mod core;
pub mod utils;
