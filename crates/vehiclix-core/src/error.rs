use thiserror::Error;

use crate::models::report::ReportStatus;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid report type: {0}")]
    InvalidReportType(String),

    #[error("illegal report transition from {from} to {to}")]
    IllegalTransition { from: ReportStatus, to: ReportStatus },

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid field {field}: {reason}")]
    InvalidField { field: String, reason: String },
}
