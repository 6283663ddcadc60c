//! Spreadsheet export

pub mod excel;

pub use excel::{export_production_grid, export_quote_to_excel};
