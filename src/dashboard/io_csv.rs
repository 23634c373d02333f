// Primitives for reading CSV files.

use std::io::Read;

use crate::dashboard::{io_common::assemble_sheet, *};

pub fn read_csv_sheet(path: &str, source: &SheetSource) -> BDashResult<Sheet> {
    let header_row = source.header_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let sheet = read_csv_records(rdr, header_row, path)?;
    info!(
        "read_csv_sheet: {:?}: {} rows, headers {:?}",
        path,
        sheet.rows.len(),
        sheet.headers
    );
    Ok(sheet)
}

fn read_csv_records<R: Read>(
    rdr: csv::Reader<R>,
    header_row: usize,
    path: &str,
) -> DashResult<Sheet> {
    let mut records = rdr.into_records();
    // The index starts at 1 to respect most conventions in the excel world
    for _ in 1..header_row {
        _ = records.next();
    }
    let header_record = records
        .next()
        .context(MissingHeaderRowSnafu {
            path,
            index: header_row,
        })?
        .context(CsvLineParseSnafu { lineno: header_row })?;
    let headers: Vec<String> = header_record.iter().map(|s| s.to_string()).collect();
    debug!("read_csv_records: headers: {:?}", headers);

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = idx + header_row + 1;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_records: lineno: {:?} row: {:?}", lineno, line);
        rows.push(line.iter().map(|s| s.to_string()).collect());
    }
    Ok(assemble_sheet(headers, rows))
}
