use crate::dashboard::*;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "dashboardName", default)]
    pub dashboard_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "referenceTime")]
    pub reference_time: Option<String>,
    #[serde(rename = "showPast")]
    pub show_past: Option<bool>,
    #[serde(rename = "topEvents")]
    pub top_events: Option<usize>,
}

/// The settings echoed in the `config` section of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dashboard: String,
    #[serde(rename = "referenceTime")]
    pub reference_time: String,
    #[serde(rename = "showPast")]
    pub show_past: bool,
    #[serde(rename = "topEvents")]
    pub top_events: usize,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SheetSource {
    pub provider: String,
    pub kind: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "headerRowIndex")]
    _header_row_index: Option<JSValue>,
}

impl SheetSource {
    pub fn from_file(provider: &str, kind: &str, file_path: &str) -> SheetSource {
        SheetSource {
            provider: provider.to_string(),
            kind: Some(kind.to_string()),
            file_path: file_path.to_string(),
            excel_worksheet_name: None,
            _header_row_index: None,
        }
    }

    /// The row holding the headers, starting at 1 as in spreadsheets.
    pub fn header_row_index(&self) -> DashResult<usize> {
        match &self._header_row_index {
            Some(x) => read_js_int(x),
            None => Ok(1),
        }
    }

    pub fn kind(&self) -> DashResult<SheetKind> {
        SheetKind::parse(self.kind.as_deref().unwrap_or("events"))
    }
}

/// Replaces the default header spellings of one field.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpecOverride {
    #[serde(default)]
    pub positions: Vec<JSValue>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(rename = "legacyKeys", default)]
    pub legacy_keys: Vec<String>,
}

impl FieldSpecOverride {
    pub fn to_field_spec(&self) -> DashResult<FieldSpec> {
        let positions = self
            .positions
            .iter()
            .map(|p| read_js_int(p).map(|x| x - 1))
            .collect::<DashResult<Vec<usize>>>()?;
        Ok(FieldSpec {
            positions,
            keywords: self.keywords.clone(),
            legacy_keys: self.legacy_keys.clone(),
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "sheetSources", default)]
    pub sheet_sources: Vec<SheetSource>,
    #[serde(rename = "fieldSpecs", default)]
    pub field_specs: BTreeMap<String, FieldSpecOverride>,
}

impl DashboardConfig {
    /// The default field specs, with the overrides of the file applied.
    pub fn field_specs(&self) -> DashResult<FieldSpecs> {
        let mut specs = FieldSpecs::default_specs();
        for (name, spec_override) in self.field_specs.iter() {
            let field = EventField::from_name(name).context(UnknownFieldSnafu { name })?;
            debug!("field_specs: override for {:?}: {:?}", field, spec_override);
            specs.set(field, spec_override.to_field_spec()?);
        }
        Ok(specs)
    }
}

pub fn read_config(path: &str) -> DashResult<DashboardConfig> {
    let config_str = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashboardConfig =
        serde_json::from_str(&config_str).context(ParsingJsonSnafu {})?;
    info!("config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> DashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Reads a row or column index written the spreadsheet way: a number starting
/// at 1, or a column name (`"A"`, `"Z"`, `"AA"`).
pub fn read_js_int(x: &JSValue) -> DashResult<usize> {
    let res = match x {
        JSValue::Number(n) => n.as_u64().map(|x| x as usize),
        JSValue::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => s
            .to_ascii_uppercase()
            .bytes()
            .try_fold(0usize, |acc, b| {
                acc.checked_mul(26)?.checked_add((b - b'A') as usize + 1)
            }),
        JSValue::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    res.filter(|x| *x >= 1)
        .context(ParsingJsonNumberSnafu {
            value: x.to_string(),
        })
}

/// Reads a local wall-clock time: `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DDTHH:MM`
/// or a plain date (midnight).
pub fn parse_reference_time(s: &str) -> DashResult<NaiveDateTime> {
    let s = s.trim();
    let res = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        });
    res.context(InvalidReferenceTimeSnafu { value: s })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_indexes() {
        assert_eq!(read_js_int(&json!(1)).unwrap(), 1);
        assert_eq!(read_js_int(&json!("3")).unwrap(), 3);
        assert_eq!(read_js_int(&json!("A")).unwrap(), 1);
        assert_eq!(read_js_int(&json!("b")).unwrap(), 2);
        assert_eq!(read_js_int(&json!("Z")).unwrap(), 26);
        assert_eq!(read_js_int(&json!("AA")).unwrap(), 27);
        assert!(read_js_int(&json!(0)).is_err());
        assert!(read_js_int(&json!(-2)).is_err());
        assert!(read_js_int(&json!("A1")).is_err());
        assert!(read_js_int(&json!(null)).is_err());
    }

    #[test]
    fn reference_times() {
        let t = parse_reference_time("2024-06-15T10:00").unwrap();
        assert_eq!(t.format(DATE_FORMAT).to_string(), "2024-06-15T10:00:00");
        let t = parse_reference_time("2024-06-15T10:00:30").unwrap();
        assert_eq!(t.format(DATE_FORMAT).to_string(), "2024-06-15T10:00:30");
        let t = parse_reference_time("2024-06-15").unwrap();
        assert_eq!(t.format(DATE_FORMAT).to_string(), "2024-06-15T00:00:00");
        assert!(matches!(
            parse_reference_time("15/06/2024"),
            Err(DashboardError::InvalidReferenceTime { .. })
        ));
    }

    #[test]
    fn minimal_config() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{
                "outputSettings": { "dashboardName": "Hive" },
                "sheetSources": [ { "provider": "csv", "filePath": "events.csv" } ]
            }"#,
        )
        .unwrap();
        assert_eq!(config.output_settings.dashboard_name, "Hive");
        assert_eq!(config.output_settings.show_past, None);
        let source = &config.sheet_sources[0];
        assert_eq!(source.kind().unwrap(), SheetKind::Events);
        assert_eq!(source.header_row_index().unwrap(), 1);
        assert_eq!(config.field_specs().unwrap(), FieldSpecs::default_specs());
    }

    #[test]
    fn field_spec_overrides() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{
                "outputSettings": { "dashboardName": "Hive" },
                "sheetSources": [
                    { "provider": "xlsx", "kind": "news", "filePath": "n.xlsx", "headerRowIndex": "3" }
                ],
                "fieldSpecs": {
                    "title": { "positions": ["B", 4], "keywords": ["nombrecorto"] },
                    "onboardingCount": { "legacyKeys": ["Nuevos"] }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.sheet_sources[0].header_row_index().unwrap(), 3);
        assert_eq!(config.sheet_sources[0].kind().unwrap(), SheetKind::News);

        let specs = config.field_specs().unwrap();
        assert_eq!(
            specs.spec(EventField::Title),
            &FieldSpec::new(&[1, 3], &["nombrecorto"], &[])
        );
        assert_eq!(
            specs.spec(EventField::OnboardingCount),
            &FieldSpec::new(&[], &[], &["Nuevos"])
        );
        // Untouched fields keep the defaults.
        assert_eq!(
            specs.spec(EventField::Funds),
            FieldSpecs::default_specs().spec(EventField::Funds)
        );
    }

    #[test]
    fn unknown_field_name() {
        let config: DashboardConfig = serde_json::from_str(
            r#"{ "outputSettings": { "dashboardName": "Hive" }, "fieldSpecs": { "budget": {} } }"#,
        )
        .unwrap();
        assert!(matches!(
            config.field_specs(),
            Err(DashboardError::UnknownField { .. })
        ));
    }
}
