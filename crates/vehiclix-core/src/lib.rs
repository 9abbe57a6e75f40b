//! vehiclix-core
//!
//! Pure domain types and store key conventions.
//! No storage or HTTP dependency. This is the shared vocabulary of the Vehiclix system.

pub mod error;
pub mod keys;
pub mod models;
