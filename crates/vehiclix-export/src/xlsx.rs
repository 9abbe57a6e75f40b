use rust_xlsxwriter::{Format, Workbook};

use crate::error::ExportError;
use crate::table::{Cell, Table};

const SHEET_NAME: &str = "Report";

/// Generate a single-worksheet XLSX workbook with the tables stacked
/// vertically, one blank row apart. Counts and amounts are numeric cells.
pub fn generate_xlsx(tables: &[Table]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let amount = Format::new().set_num_format("0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let mut row: u32 = 0;
    for table in tables {
        worksheet.write_string_with_format(row, 0, table.title.as_str(), &bold)?;
        row += 1;

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string_with_format(row, col as u16, *header, &bold)?;
        }
        row += 1;

        for cells in &table.rows {
            for (col, cell) in cells.iter().enumerate() {
                let col = col as u16;
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(row, col, s.as_str())?;
                    }
                    Cell::Count(n) => {
                        worksheet.write_number(row, col, *n as f64)?;
                    }
                    Cell::Amount(v) => {
                        worksheet.write_number_with_format(row, col, *v, &amount)?;
                    }
                }
            }
            row += 1;
        }

        row += 1;
    }

    Ok(workbook.save_to_buffer()?)
}
