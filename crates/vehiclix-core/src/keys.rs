//! Object key conventions.
//!
//! Pure string functions with no storage dependency. These define the canonical
//! layout of records in the Vehiclix bucket.

pub const REPORTS_PREFIX: &str = "reports/";
pub const VEHICLES_PREFIX: &str = "vehicles/";
pub const CLAIMS_PREFIX: &str = "claims/";
pub const FINES_PREFIX: &str = "fines/";

pub fn report(id: u64) -> String {
    format!("{REPORTS_PREFIX}{id}.json")
}

pub fn vehicle(id: u64) -> String {
    format!("{VEHICLES_PREFIX}{id}.json")
}

pub fn claim(id: u64) -> String {
    format!("{CLAIMS_PREFIX}{id}.json")
}

pub fn fine(id: u64) -> String {
    format!("{FINES_PREFIX}{id}.json")
}

/// Id sequence for a collection, kept next to it under `_sequence/`.
pub fn sequence(prefix: &str) -> String {
    format!("_sequence/{}.json", prefix.trim_end_matches('/'))
}
