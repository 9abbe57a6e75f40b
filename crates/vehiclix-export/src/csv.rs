use ::csv::WriterBuilder;

use crate::error::ExportError;
use crate::table::{Cell, Table};

/// Generate CSV from flattened report tables.
///
/// Each table is written as a one-cell title row, a header row, then its
/// data rows. Rows differ in width between tables, so the writer is flexible.
pub fn generate_csv(tables: &[Table]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());

    for table in tables {
        writer.write_record([table.title.as_str()])?;
        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(Cell::to_text))?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))
}
