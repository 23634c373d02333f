pub use crate::config::*;

/// A builder for assembling a sheet row by row, when the data does not come
/// from one of the file readers.
///
/// ```
/// use event_normalizer::builder::Builder;
/// # use event_normalizer::SheetErrors;
///
/// let mut builder = Builder::new().headers(&["Evento", "Funds", "Start Date"])?;
/// builder.add_row(&["Meetup", "1.200,50", "2024-01-10"])?;
/// builder.add_row(&["Workshop"])?;
///
/// let events = event_normalizer::normalize(&builder.build());
/// assert_eq!(events.len(), 2);
/// # Ok::<(), SheetErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    _headers: Option<Vec<String>>,
    _rows: Vec<RawRow>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            _headers: None,
            _rows: Vec::new(),
        }
    }

    /// Declares the header row. Labels must be distinct.
    pub fn headers(self, labels: &[&str]) -> Result<Builder, SheetErrors> {
        let mut headers: Vec<String> = Vec::new();
        for label in labels {
            if headers.iter().any(|h| h == label) {
                return Err(SheetErrors::DuplicateHeader(label.to_string()));
            }
            headers.push(label.to_string());
        }
        Ok(Builder {
            _headers: Some(headers),
            _rows: self._rows,
        })
    }

    /// Adds a row of cells in header order. Short rows are padded with empty
    /// cells.
    pub fn add_row(&mut self, cells: &[&str]) -> Result<(), SheetErrors> {
        let headers = self._headers.as_ref().ok_or(SheetErrors::MissingHeaders)?;
        if cells.len() > headers.len() {
            return Err(SheetErrors::RowTooWide {
                row: self._rows.len(),
                cells: cells.len(),
                headers: headers.len(),
            });
        }
        let row = RawRow::from_pairs(
            headers
                .iter()
                .enumerate()
                .map(|(idx, h)| (h.clone(), cells.get(idx).cloned().unwrap_or(""))),
        );
        self.add_raw_row(row);
        Ok(())
    }

    /// Adds a row that was already keyed by label. Its labels do not need to
    /// match the declared headers.
    pub fn add_raw_row(&mut self, row: RawRow) {
        self._rows.push(row);
    }

    pub fn build(self) -> Sheet {
        Sheet {
            headers: self._headers,
            rows: self._rows,
        }
    }
}
