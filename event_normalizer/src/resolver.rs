use log::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::{FieldSpec, RawRow};

/// The form used to compare header labels: lowercase, whitespace removed,
/// diacritics dropped. `"Fecha de Inicio"` and `"fechadeinicio"` compare equal,
/// so do `"País"` and `"pais"`.
pub fn normalize_label(label: &str) -> String {
    label
        .nfd()
        .filter(|c| !is_combining_mark(*c) && !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// A row seen through its normalized labels, built once per row and shared by
/// all the fields resolved from it.
#[derive(Debug, Clone)]
pub struct RowView<'a> {
    row: &'a RawRow,
    normalized: Vec<(String, &'a str)>,
}

impl<'a> RowView<'a> {
    pub fn new(row: &'a RawRow) -> RowView<'a> {
        let normalized = row
            .cells()
            .map(|(label, value)| (normalize_label(label), value))
            .collect();
        RowView { row, normalized }
    }

    /// The first non-blank value designated by `spec`, trimmed, or the empty
    /// string.
    ///
    /// `headers` is the declared header order of the sheet; without it, the
    /// `spec.positions` are ignored.
    pub fn resolve(&self, headers: Option<&[String]>, spec: &FieldSpec) -> String {
        if let Some(headers) = headers {
            for pos in spec.positions.iter() {
                let value = headers.get(*pos).and_then(|label| self.row.get(label));
                if let Some(v) = non_blank(value) {
                    debug!("resolve: position {} -> {:?}", pos, v);
                    return v.to_string();
                }
            }
        }

        for keyword in spec.keywords.iter() {
            let keyword = normalize_label(keyword);
            if keyword.is_empty() {
                continue;
            }
            // A label equal to the keyword beats one merely containing it.
            let exact = self
                .normalized
                .iter()
                .filter(|(label, _)| *label == keyword)
                .find_map(|(_, value)| non_blank(Some(*value)));
            let found = exact.or_else(|| {
                self.normalized
                    .iter()
                    .filter(|(label, _)| label.contains(keyword.as_str()))
                    .find_map(|(_, value)| non_blank(Some(*value)))
            });
            if let Some(v) = found {
                debug!("resolve: keyword {:?} -> {:?}", keyword, v);
                return v.to_string();
            }
        }

        // Legacy keys never match a label that merely contains them.
        for key in spec.legacy_keys.iter() {
            let key = normalize_label(key);
            let found = self
                .normalized
                .iter()
                .filter(|(label, _)| *label == key)
                .find_map(|(_, value)| non_blank(Some(*value)));
            if let Some(v) = found {
                debug!("resolve: legacy key {:?} -> {:?}", key, v);
                return v.to_string();
            }
        }

        String::new()
    }
}

/// Resolves a single field of a row. Prefer `RowView` when several fields are
/// read from the same row.
pub fn resolve(row: &RawRow, headers: Option<&[String]>, spec: &FieldSpec) -> String {
    RowView::new(row).resolve(headers, spec)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
