use log::{debug, info, warn};

use event_normalizer::feeds::{normalize_metrics, normalize_news, Metric, NewsItem};
use event_normalizer::views::{display_country, map_markers, FundsScale, MapMarker};
use event_normalizer::*;
use snafu::{prelude::*, Snafu};

use chrono::{Local, NaiveDateTime};
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dashboard::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum DashboardError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("The workbook {path} has no worksheet named {name}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("The sheet {path} has no row {index} to read the headers from"))]
    MissingHeaderRow { path: String, index: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive number or a column name, found {value}"))]
    ParsingJsonNumber { value: String },
    #[snafu(display("Unknown provider {provider} (expected csv or xlsx)"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown sheet kind {kind} (expected events, metrics or news)"))]
    UnknownKind { kind: String },
    #[snafu(display("Unknown field {name} in fieldSpecs"))]
    UnknownField { name: String },
    #[snafu(display(
        "Could not read the reference time {value} (expected YYYY-MM-DDTHH:MM[:SS])"
    ))]
    InvalidReferenceTime { value: String },
    #[snafu(display("No sheet to read: pass --input or a configuration with sheetSources"))]
    NoInput {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between computed summary and reference summary"))]
    SummaryMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashboardError>;
pub type BDashResult<T> = Result<T, Box<dyn std::error::Error>>;

pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DEFAULT_TOP_EVENTS: usize = 10;
const OUTPUT_FILE_NAME: &str = "dashboard_summary.json";

/// What a sheet contains.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SheetKind {
    Events,
    Metrics,
    News,
}

impl SheetKind {
    pub fn parse(kind: &str) -> DashResult<SheetKind> {
        match kind {
            "events" => Ok(SheetKind::Events),
            "metrics" => Ok(SheetKind::Metrics),
            "news" => Ok(SheetKind::News),
            x => UnknownKindSnafu { kind: x }.fail(),
        }
    }
}

/// The configuration file and the command line, merged.
#[derive(Debug, Clone)]
struct DashboardPlan {
    name: String,
    sources: Vec<(PathBuf, SheetSource)>,
    field_specs: FieldSpecs,
    now: NaiveDateTime,
    show_past: bool,
    top_events: usize,
    output: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct DashboardData {
    events: Vec<Event>,
    metrics: Option<Vec<Metric>>,
    news: Option<Vec<NewsItem>>,
}

fn build_plan(args: &Args) -> DashResult<DashboardPlan> {
    let (config, root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        None => (DashboardConfig::default(), PathBuf::new()),
    };
    debug!("build_plan: config: {:?}", config);

    let mut sources: Vec<(PathBuf, SheetSource)> = match &args.input {
        Some(input) => {
            let source = SheetSource::from_file(
                args.input_type.as_deref().unwrap_or("csv"),
                args.kind.as_deref().unwrap_or("events"),
                input,
            );
            vec![(PathBuf::from(input), source)]
        }
        None => config
            .sheet_sources
            .iter()
            .map(|s| (root.join(&s.file_path), s.clone()))
            .collect(),
    };
    ensure!(!sources.is_empty(), NoInputSnafu {});
    if let Some(worksheet) = &args.excel_worksheet_name {
        for (_, source) in sources.iter_mut() {
            source.excel_worksheet_name = Some(worksheet.clone());
        }
    }

    let settings = &config.output_settings;
    let name = match (&args.input, settings.dashboard_name.is_empty()) {
        (Some(input), true) => io_common::simplify_file_name(input),
        _ => settings.dashboard_name.clone(),
    };

    let now = match args.now.as_ref().or(settings.reference_time.as_ref()) {
        Some(s) => parse_reference_time(s)?,
        None => Local::now().naive_local(),
    };

    let output = args.out.clone().or_else(|| {
        settings.output_directory.as_ref().map(|dir| {
            root.join(dir)
                .join(OUTPUT_FILE_NAME)
                .display()
                .to_string()
        })
    });

    Ok(DashboardPlan {
        name,
        sources,
        field_specs: config.field_specs()?,
        now,
        show_past: args.show_past || settings.show_past.unwrap_or(false),
        top_events: args
            .top
            .or(settings.top_events)
            .unwrap_or(DEFAULT_TOP_EVENTS),
        output,
    })
}

fn read_sheet(path: &Path, source: &SheetSource) -> DashResult<Sheet> {
    let p = path.display().to_string();
    info!("Attempting to read sheet {:?}", p);
    let res = match source.provider.as_str() {
        "csv" => io_csv::read_csv_sheet(&p, source),
        "xlsx" => io_xlsx::read_xlsx_sheet(&p, source),
        x => return UnknownProviderSnafu { provider: x }.fail(),
    };
    res.with_whatever_context(|_| format!("Could not read sheet {}", p))
}

// Several event sheets are read as one. Their declared headers only make sense
// for their own rows, so positions are dropped in that case.
fn merge_sheets(mut sheets: Vec<Sheet>) -> Sheet {
    if sheets.len() == 1 {
        return sheets.remove(0);
    }
    warn!(
        "merge_sheets: {} event sheets, column positions will be ignored",
        sheets.len()
    );
    Sheet::new(sheets.into_iter().flat_map(|s| s.rows).collect())
}

fn load_data(plan: &DashboardPlan) -> DashResult<DashboardData> {
    let mut event_sheets: Vec<Sheet> = Vec::new();
    let mut data = DashboardData::default();
    for (path, source) in plan.sources.iter() {
        let sheet = read_sheet(path, source)?;
        match source.kind()? {
            SheetKind::Events => event_sheets.push(sheet),
            SheetKind::Metrics => data
                .metrics
                .get_or_insert_with(Vec::new)
                .append(&mut normalize_metrics(&sheet)),
            SheetKind::News => data
                .news
                .get_or_insert_with(Vec::new)
                .append(&mut normalize_news(&sheet)),
        }
    }
    if !event_sheets.is_empty() {
        data.events = normalize_with(&merge_sheets(event_sheets), &plan.field_specs);
    }
    info!(
        "load_data: {} events, {} metrics, {} news items",
        data.events.len(),
        data.metrics.as_ref().map_or(0, |m| m.len()),
        data.news.as_ref().map_or(0, |n| n.len())
    );
    Ok(data)
}

fn format_date(d: Option<NaiveDateTime>) -> JSValue {
    match d {
        Some(x) => json!(x.format(DATE_FORMAT).to_string()),
        None => JSValue::Null,
    }
}

fn event_to_json(e: &Event, now: NaiveDateTime) -> JSValue {
    json!({
        "id": e.id,
        "title": e.title,
        "start": format_date(e.start),
        "end": format_date(e.end),
        "funds": e.funds,
        "country": e.country,
        "tag": e.tag,
        "tag2": e.tag2,
        "onboardingCount": e.onboarding_count,
        "image": e.image,
        "description": e.description,
        "eventDescription": e.event_description,
        "attendees": e.attendees,
        "benefit": e.benefit,
        "potential": e.potential,
        "status": EventStatus::of(e, now).name(),
    })
}

fn by_country_to_json(aggregates: &[CountryAggregate<'_>]) -> Vec<JSValue> {
    let scale = FundsScale::from_values(aggregates.iter().map(|a| a.total_funds));
    aggregates
        .iter()
        .map(|agg| {
            let ids: Vec<&str> = agg.events.iter().map(|e| e.id.as_str()).collect();
            json!({
                "label": display_country(agg.country),
                "country": agg.country,
                "totalFunds": agg.total_funds,
                "eventIds": ids,
                "color": scale.color(agg.total_funds),
            })
        })
        .collect()
}

fn marker_to_json(m: &MapMarker) -> JSValue {
    json!({
        "country": m.country,
        "label": m.label,
        "latitude": m.latitude,
        "longitude": m.longitude,
        "totalFunds": m.total_funds,
        "eventCount": m.event_count,
        "radius": m.radius,
        "color": m.color,
    })
}

fn build_summary_js(plan: &DashboardPlan, data: &DashboardData) -> JSValue {
    let c = OutputConfig {
        dashboard: plan.name.clone(),
        reference_time: plan.now.format(DATE_FORMAT).to_string(),
        show_past: plan.show_past,
        top_events: plan.top_events,
    };

    let selected = select_events(&data.events, plan.now, plan.show_past);
    let summary = summarize(selected.iter().copied());
    let by_country = aggregate_by_country(selected.iter().copied());
    let event_scale = FundsScale::from_values(selected.iter().map(|e| e.funds));
    let top: Vec<JSValue> = aggregate_top_by_funds(selected.iter().copied(), plan.top_events)
        .iter()
        .map(|e| {
            json!({
                "id": e.id,
                "title": e.title,
                "funds": e.funds,
                "color": event_scale.color(e.funds),
            })
        })
        .collect();
    let markers: Vec<JSValue> = map_markers(&by_country).iter().map(marker_to_json).collect();
    let events: Vec<JSValue> = selected.iter().map(|e| event_to_json(e, plan.now)).collect();

    let mut js = json!({
        "config": c,
        "summary": {
            "totalEvents": summary.total_events,
            "totalFunds": summary.total_funds,
            "activeCountries": summary.active_countries,
        },
        "events": events,
        "byCountry": by_country_to_json(&by_country),
        "topByFunds": top,
        "mapMarkers": markers,
    });
    if let Some(metrics) = &data.metrics {
        let l: Vec<JSValue> = metrics
            .iter()
            .map(|m| json!({"label": m.label, "value": m.value, "unit": m.unit}))
            .collect();
        js["metrics"] = JSValue::Array(l);
    }
    if let Some(news) = &data.news {
        let l: Vec<JSValue> = news
            .iter()
            .map(|n| json!({"title": n.title, "url": n.url, "source": n.source}))
            .collect();
        js["news"] = JSValue::Array(l);
    }
    js
}

fn write_output(pretty_js: &str, output: &Option<String>) -> DashResult<()> {
    match output.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing dashboard summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let plan = build_plan(args)?;
    info!(
        "dashboard {:?}: {} sources, reference time {}",
        plan.name,
        plan.sources.len(),
        plan.now
    );

    let data = load_data(&plan)?;
    let result_js = build_summary_js(&plan, &data);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_output(&pretty_js_stats, &plan.output)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        let summary_ref = read_summary(summary_p)?;
        debug!("summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return SummaryMismatchSnafu {}.fail();
        }
    }

    Ok(())
}

#[cfg(test)]
fn run_dashboard_test(test_name: &str, config_lpath: &str, summary_lpath: &str) {
    use clap::Parser;
    use snafu::ErrorCompat;

    let _ = env_logger::builder().is_test(true).try_init();
    let test_dir =
        option_env!("HIVECAL_TEST_DIR").unwrap_or(concat!(env!("CARGO_MANIFEST_DIR"), "/tests"));
    info!("Running test {}", test_name);
    let config_path = format!("{}/{}/{}", test_dir, test_name, config_lpath);
    let summary_path = format!("{}/{}/{}", test_dir, test_name, summary_lpath);
    let args = Args::parse_from([
        "hivecal",
        "--config",
        config_path.as_str(),
        "--reference",
        summary_path.as_str(),
        "--out",
        "stdout",
    ]);
    if let Err(e) = run_dashboard(&args) {
        eprintln!("An error occured {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        panic!("test {} failed: {}", test_name, e);
    }
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    run_dashboard_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    )
}
