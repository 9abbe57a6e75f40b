use vehiclix_core::models::report::Report;

use crate::error::ExportError;
use crate::format::ExportFormat;
use crate::styles::PageStyles;
use crate::table::report_tables;

/// A rendered export, ready to be sent as a download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    pub file_name: String,
}

/// Render a completed report in `format`.
pub fn export_report(report: &Report, format: ExportFormat) -> Result<ExportedFile, ExportError> {
    let data = report.data().ok_or(ExportError::NoData { id: report.id })?;
    let tables = report_tables(report, data);

    let bytes = match format {
        ExportFormat::Csv => crate::csv::generate_csv(&tables)?,
        ExportFormat::Xlsx => crate::xlsx::generate_xlsx(&tables)?,
        ExportFormat::Pdf => {
            let title = format!("{} report #{}", report.report_type, report.id);
            crate::pdf::generate_pdf(&title, &tables, &PageStyles::default())?
        }
    };

    tracing::debug!(id = report.id, %format, size = bytes.len(), "report exported");

    Ok(ExportedFile {
        bytes,
        content_type: format.content_type(),
        file_name: format!("report_{}.{}", report.id, format.extension()),
    })
}
