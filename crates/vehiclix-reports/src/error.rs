use thiserror::Error;

use vehiclix_core::models::report::ReportStatus;
use vehiclix_export::error::ExportError;
use vehiclix_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{0}")]
    Validation(String),

    #[error("invalid report type: {0}")]
    InvalidReportType(String),

    #[error("report {id} not found")]
    NotFound { id: u64 },

    #[error("report {id} is not ready for export (status: {status})")]
    NotReady { id: u64, status: ReportStatus },

    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("report queue is full, try again later")]
    QueueFull,

    #[error("report dispatcher is shut down")]
    ShutDown,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
