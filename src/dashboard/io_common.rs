use std::path::Path;

use event_normalizer::{RawRow, Sheet};
use log::debug;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Keys the cells of each row by the header of their column.
///
/// Rows where every kept cell is blank are dropped. Missing cells read as empty and
/// cells past the last header are ignored. When a header label is repeated,
/// the first non-blank cell under that label is kept.
pub fn assemble_sheet<I>(headers: Vec<String>, rows: I) -> Sheet
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut res: Vec<RawRow> = Vec::new();
    for (idx, cells) in rows.into_iter().enumerate() {
        let mut row = RawRow::new();
        for (col, label) in headers.iter().enumerate() {
            let value = cells.get(col).map(|c| c.as_str()).unwrap_or("");
            let taken = row.get(label).map_or(false, |v| !v.trim().is_empty());
            if !taken {
                row.insert(label.as_str(), value);
            }
        }
        if row.is_blank() {
            debug!("assemble_sheet: skipping blank row {}", idx);
            continue;
        }
        res.push(row);
    }
    Sheet::with_headers(headers, res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("a/b/calendario.csv"), "calendario");
        assert_eq!(simplify_file_name("events"), "events");
    }

    #[test]
    fn rows_are_keyed_by_header() {
        let sheet = assemble_sheet(
            strings(&["Evento", "Funds", "Tag"]),
            vec![
                strings(&["Meetup", "10"]),
                strings(&["", " ", ""]),
                strings(&["Workshop", "5", "hive", "extra"]),
                strings(&[]),
            ],
        );
        assert_eq!(sheet.headers, Some(strings(&["Evento", "Funds", "Tag"])));
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].get("Tag"), Some(""));
        assert_eq!(sheet.rows[0].len(), 3);
        assert_eq!(sheet.rows[1].get("Tag"), Some("hive"));
        assert_eq!(sheet.rows[1].len(), 3);
    }

    #[test]
    fn repeated_headers() {
        let sheet = assemble_sheet(
            strings(&["Tag", "Tag", "Tag"]),
            vec![strings(&["", "second", "third"])],
        );
        assert_eq!(sheet.rows[0].get("Tag"), Some("second"));
        assert_eq!(sheet.rows[0].len(), 1);
    }
}
