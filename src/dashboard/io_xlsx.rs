// Primitives for reading Excel workbooks.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use chrono::{Duration, NaiveDate, NaiveTime};

use crate::dashboard::{io_common::assemble_sheet, *};

pub fn read_xlsx_sheet(path: &str, source: &SheetSource) -> BDashResult<Sheet> {
    let wrange = get_range(path, source)?;
    let header_row = source.header_row_index()?;

    // The range starts at the first non-empty cell, not at A1.
    let (first_row, first_col) = wrange
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));
    debug!(
        "read_xlsx_sheet: path: {:?} range starts at row {} col {}",
        path, first_row, first_col
    );

    let mut rows = wrange.rows().map(|row| {
        std::iter::repeat(String::new())
            .take(first_col)
            .chain(row.iter().map(cell_to_string))
            .collect::<Vec<String>>()
    });
    for _ in first_row..(header_row - 1) {
        _ = rows.next();
    }
    let headers = if header_row > first_row {
        rows.next()
    } else {
        None
    };
    let headers = headers.context(MissingHeaderRowSnafu {
        path,
        index: header_row,
    })?;
    debug!("read_xlsx_sheet: headers: {:?}", headers);

    let sheet = assemble_sheet(headers, rows);
    info!(
        "read_xlsx_sheet: {:?}: {} rows, headers {:?}",
        path,
        sheet.rows.len(),
        sheet.headers
    );
    Ok(sheet)
}

fn get_range(path: &str, source: &SheetSource) -> DashResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = &source.excel_worksheet_name {
        debug!(
            "get_range: path: {:?} worksheet: {:?}",
            path, worksheet_name
        );
        workbook
            .worksheet_range(worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                name: worksheet_name,
            })?
            .context(OpeningExcelSnafu { path })
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })
    }
}

/// The text a spreadsheet shows for a cell.
fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        DataType::Bool(b) => b.to_string(),
        DataType::DateTime(serial) => excel_serial_to_string(*serial),
        // Errors and empty cells
        _ => String::new(),
    }
}

// Excel counts days from 1899-12-30, the fraction is the time of day.
fn excel_serial_to_string(serial: f64) -> String {
    let seconds = (serial * 86400.0).round();
    if !seconds.is_finite() || seconds.abs() > 1e12 {
        return serial.to_string();
    }
    let dt = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|epoch| epoch.checked_add_signed(Duration::seconds(seconds as i64)));
    match dt {
        Some(dt) if dt.time() == NaiveTime::MIN => dt.format("%Y-%m-%d").to_string(),
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => serial.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_as_text() {
        assert_eq!(cell_to_string(&DataType::String("Meetup".to_string())), "Meetup");
        assert_eq!(cell_to_string(&DataType::Float(1200.5)), "1200.5");
        assert_eq!(cell_to_string(&DataType::Float(300.0)), "300");
        assert_eq!(cell_to_string(&DataType::Int(12)), "12");
        assert_eq!(cell_to_string(&DataType::Bool(true)), "true");
        assert_eq!(cell_to_string(&DataType::Empty), "");
    }

    #[test]
    fn date_serials() {
        assert_eq!(cell_to_string(&DataType::DateTime(45292.0)), "2024-01-01");
        assert_eq!(
            cell_to_string(&DataType::DateTime(45292.75)),
            "2024-01-01 18:00"
        );
        assert_eq!(
            parse_date(Some(&cell_to_string(&DataType::DateTime(45292.75))))
                .map(|d| d.format(DATE_FORMAT).to_string()),
            Some("2024-01-01T18:00:00".to_string())
        );
    }

    #[test]
    fn missing_workbook() {
        let source = SheetSource::from_file("xlsx", "events", "does/not/exist.xlsx");
        assert!(read_xlsx_sheet("does/not/exist.xlsx", &source).is_err());
    }
}
