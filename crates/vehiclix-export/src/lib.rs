//! vehiclix-export
//!
//! CSV, XLSX and PDF generation from completed reports. All three formats
//! render the same flattened tables.

pub mod csv;
pub mod encode;
pub mod error;
pub mod format;
pub mod pdf;
pub mod styles;
pub mod table;
pub mod xlsx;
