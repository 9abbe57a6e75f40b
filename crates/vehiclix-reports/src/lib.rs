//! vehiclix-reports
//!
//! Report aggregation and the background dispatcher that drives each report
//! from `Pending` to a terminal state.

pub mod aggregate;
pub mod dispatcher;
pub mod error;
