// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

use chrono::NaiveDateTime;

/// One row of a spreadsheet export: the cells in column order, keyed by the
/// header label of their column.
///
/// Labels are kept exactly as they appear in the sheet (case, spacing and
/// diacritics included). Inserting a label twice replaces the earlier value
/// but keeps its position.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> RawRow {
        RawRow { cells: Vec::new() }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> RawRow
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = RawRow::new();
        for (k, v) in pairs {
            row.insert(k, v);
        }
        row
    }

    pub fn insert<K: Into<String>, V: Into<String>>(&mut self, label: K, value: V) {
        let label = label.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(l, _)| *l == label) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((label, value)),
        }
    }

    /// The value stored under exactly this label.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    /// All the (label, value) pairs, in column order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True when no cell holds anything but whitespace.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.trim().is_empty())
    }
}

/// The rows loaded from one sheet, with the declared header order when the
/// source provides it. Without headers, positional resolution is skipped.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Sheet {
    pub headers: Option<Vec<String>>,
    pub rows: Vec<RawRow>,
}

impl Sheet {
    pub fn new(rows: Vec<RawRow>) -> Sheet {
        Sheet {
            headers: None,
            rows,
        }
    }

    pub fn with_headers(headers: Vec<String>, rows: Vec<RawRow>) -> Sheet {
        Sheet {
            headers: Some(headers),
            rows,
        }
    }
}

// ******** Output data structures *********

pub const UNTITLED_EVENT: &str = "Untitled Event";

/// A canonical event, built from one row of the calendar sheet.
#[derive(PartialEq, Debug, Clone)]
pub struct Event {
    /// `evt-<row index>`, unique within one load.
    pub id: String,
    pub title: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    /// Always finite and non-negative.
    pub funds: f64,
    /// Lowercase place name, empty when unknown.
    pub country: String,
    /// Topic slug.
    pub tag: String,
    /// Community slug. Never mixed up with `tag`.
    pub tag2: String,
    pub onboarding_count: u64,
    pub image: String,
    pub description: String,
    pub event_description: String,
    pub attendees: String,
    pub benefit: String,
    pub potential: String,
    /// The originating row, for diagnostics only.
    pub raw: RawRow,
}

impl Event {
    /// `end` when present, else `start`.
    pub fn effective_end(&self) -> Option<NaiveDateTime> {
        self.end.or(self.start)
    }
}

/// Errors raised when a sheet is assembled by hand in a way that cannot
/// describe a spreadsheet. Data problems never produce errors.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SheetErrors {
    DuplicateHeader(String),
    RowTooWide { row: usize, cells: usize, headers: usize },
    MissingHeaders,
}

impl Error for SheetErrors {}

impl Display for SheetErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetErrors::DuplicateHeader(h) => write!(f, "duplicate header label {:?}", h),
            SheetErrors::RowTooWide {
                row,
                cells,
                headers,
            } => write!(
                f,
                "row {} has {} cells but the sheet only declares {} headers",
                row, cells, headers
            ),
            SheetErrors::MissingHeaders => write!(f, "rows were added before the headers"),
        }
    }
}

// ********* Configuration **********

/// How to find one logical field in a row whose headers are not known in
/// advance.
///
/// Candidates are tried in this order, the first non-blank value wins:
/// - `positions`: zero-based indexes into the declared headers of the sheet
/// - `keywords`: substrings of the normalized labels (lowercase, no
///   whitespace, no diacritics)
/// - `legacy_keys`: labels equal to the whole normalized label
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FieldSpec {
    pub positions: Vec<usize>,
    pub keywords: Vec<String>,
    pub legacy_keys: Vec<String>,
}

impl FieldSpec {
    pub fn new(positions: &[usize], keywords: &[&str], legacy_keys: &[&str]) -> FieldSpec {
        FieldSpec {
            positions: positions.to_vec(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            legacy_keys: legacy_keys.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The logical fields of an event.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum EventField {
    StartDate,
    EndDate,
    Title,
    Funds,
    Image,
    Description,
    Country,
    Tag,
    Tag2,
    OnboardingCount,
    EventDescription,
    Attendees,
    Benefit,
    Potential,
}

impl EventField {
    pub const ALL: [EventField; 14] = [
        EventField::StartDate,
        EventField::EndDate,
        EventField::Title,
        EventField::Funds,
        EventField::Image,
        EventField::Description,
        EventField::Country,
        EventField::Tag,
        EventField::Tag2,
        EventField::OnboardingCount,
        EventField::EventDescription,
        EventField::Attendees,
        EventField::Benefit,
        EventField::Potential,
    ];

    /// The name used for this field in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            EventField::StartDate => "startDate",
            EventField::EndDate => "endDate",
            EventField::Title => "title",
            EventField::Funds => "funds",
            EventField::Image => "image",
            EventField::Description => "description",
            EventField::Country => "country",
            EventField::Tag => "tag",
            EventField::Tag2 => "tag2",
            EventField::OnboardingCount => "onboardingCount",
            EventField::EventDescription => "eventDescription",
            EventField::Attendees => "attendees",
            EventField::Benefit => "benefit",
            EventField::Potential => "potential",
        }
    }

    pub fn from_name(name: &str) -> Option<EventField> {
        EventField::ALL.iter().find(|f| f.name() == name).cloned()
    }
}

/// One `FieldSpec` per logical field of an event.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FieldSpecs {
    // Indexed by the declaration order of `EventField`.
    specs: Vec<FieldSpec>,
}

impl FieldSpecs {
    /// The header spellings used by the community calendar sheets, in English
    /// and Spanish.
    ///
    /// No positions are declared: column order differs between deployments,
    /// and a wrong position would win over a correct keyword.
    /// Keywords are kept specific enough not to hit neighbouring columns
    /// ("end" is a substring of "attendees", "tag" of "tag2"); the short
    /// spellings only appear as legacy keys, which must equal the whole
    /// normalized label.
    pub fn default_specs() -> FieldSpecs {
        let table = vec![
            (
                EventField::StartDate,
                FieldSpec::new(
                    &[],
                    &["startdate", "starttime", "fechainicio", "fechadeinicio"],
                    &["start", "fecha", "date"],
                ),
            ),
            (
                EventField::EndDate,
                FieldSpec::new(
                    &[],
                    &["enddate", "endtime", "fechafin", "fechadefin", "finish"],
                    &["end", "fin"],
                ),
            ),
            (
                EventField::Title,
                FieldSpec::new(
                    &[],
                    &["evento", "eventname", "eventtitle", "title", "titulo"],
                    &["event", "name", "nombre"],
                ),
            ),
            (
                EventField::Funds,
                FieldSpec::new(
                    &[],
                    &["funds", "fondos", "presupuesto", "budget"],
                    &["hbd"],
                ),
            ),
            (
                EventField::Image,
                FieldSpec::new(
                    &[],
                    &["imagelink", "image", "imagen"],
                    &["img"],
                ),
            ),
            (
                EventField::Description,
                FieldSpec::new(
                    &[],
                    &["shortdescription", "resumen", "summary"],
                    &["description", "descripcion"],
                ),
            ),
            (
                EventField::Country,
                FieldSpec::new(
                    &[],
                    &["country", "pais", "location", "ubicacion"],
                    &["place", "lugar"],
                ),
            ),
            (
                EventField::Tag,
                FieldSpec::new(
                    &[],
                    &["tag1", "hivetag", "topictag"],
                    &["tag", "tags", "etiqueta"],
                ),
            ),
            (
                EventField::Tag2,
                FieldSpec::new(
                    &[],
                    &["tag2", "communitytag", "community", "comunidad"],
                    &["tag 2"],
                ),
            ),
            (
                EventField::OnboardingCount,
                FieldSpec::new(
                    &[],
                    &["onboarding", "onboarded", "newusers", "nuevosusuarios"],
                    &[],
                ),
            ),
            (
                EventField::EventDescription,
                FieldSpec::new(
                    &[],
                    &[
                        "eventdescription",
                        "descripciondelevento",
                        "eventdetails",
                        "detalles",
                    ],
                    &[],
                ),
            ),
            (
                EventField::Attendees,
                FieldSpec::new(
                    &[],
                    &["attendees", "asistentes", "participants", "participantes"],
                    &[],
                ),
            ),
            (
                EventField::Benefit,
                FieldSpec::new(&[], &["benefit", "beneficio"], &[]),
            ),
            (
                EventField::Potential,
                FieldSpec::new(&[], &["potential", "potencial"], &[]),
            ),
        ];
        let mut specs = FieldSpecs::empty();
        for (field, spec) in table {
            specs.set(field, spec);
        }
        specs
    }

    /// A table where every spec is empty, so that every field resolves to
    /// its default value.
    pub fn empty() -> FieldSpecs {
        FieldSpecs {
            specs: vec![FieldSpec::default(); EventField::ALL.len()],
        }
    }

    pub fn spec(&self, field: EventField) -> &FieldSpec {
        &self.specs[field as usize]
    }

    pub fn set(&mut self, field: EventField, spec: FieldSpec) {
        self.specs[field as usize] = spec;
    }
}

impl Default for FieldSpecs {
    fn default() -> Self {
        FieldSpecs::default_specs()
    }
}
