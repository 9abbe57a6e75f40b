use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("report {id} has no data to export")]
    NoData { id: u64 },

    #[error("CSV generation failed: {0}")]
    Csv(String),

    #[error("XLSX generation failed: {0}")]
    Xlsx(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

impl From<::csv::Error> for ExportError {
    fn from(e: ::csv::Error) -> Self {
        ExportError::Csv(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Xlsx(e.to_string())
    }
}
