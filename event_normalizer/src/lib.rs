/*!
Normalization of community event spreadsheets.

The calendar sheets maintained by the community differ from one deployment to
the next: headers in English or Spanish, with or without spaces, columns in
any order, amounts written as `3.165,00` or `9,178.38`. This crate turns the
rows of such a sheet into canonical [`Event`]s, ordered by start date, and
derives the views a dashboard needs from them (upcoming events, funds per
country, best funded events).

Bad data never makes the crate fail: an unreadable amount is `0`, an
unreadable date is absent, a missing column gives an empty field.

```
use event_normalizer::*;

let sheet = Sheet::new(vec![
    RawRow::from_pairs(vec![("Evento", "A"), ("Funds", "1.200,50"), ("Start Date", "2024-01-10")]),
    RawRow::from_pairs(vec![("Evento", "C"), ("Funds", "300"), ("Start Date", "2023-12-01")]),
]);
let events = normalize(&sheet);
assert_eq!(events[0].title, "C");
assert_eq!(events[1].funds, 1200.5);
```
*/

pub mod aggregate;
pub mod builder;
mod config;
pub mod content;
pub mod country;
pub mod dates;
pub mod feeds;
pub mod funds;
pub mod manual;
pub mod resolver;
pub mod tags;
pub mod views;

use log::{debug, info, warn};

pub use crate::aggregate::{
    aggregate_by_country, aggregate_top_by_funds, filter_upcoming, partition_by_time,
    select_events, summarize, CountryAggregate, DashboardSummary, EventStatus, Timeline,
};
pub use crate::config::*;
pub use crate::content::{ContentIndex, ContentKey, TagNamespace};
pub use crate::country::normalize_country;
pub use crate::dates::parse_date;
pub use crate::funds::parse_funds;
pub use crate::resolver::resolve;
pub use crate::tags::{sanitize_community_name, sanitize_tag};

/// Normalizes the rows of a calendar sheet with the default field specs.
pub fn normalize(sheet: &Sheet) -> Vec<Event> {
    normalize_with(sheet, &FieldSpecs::default_specs())
}

/// Builds one event per row and orders them by start date.
///
/// Events without a start come last. The sort is stable, so rows with equal
/// or missing starts keep their sheet order. The sheet is not modified and
/// the same sheet always gives the same events.
pub fn normalize_with(sheet: &Sheet, specs: &FieldSpecs) -> Vec<Event> {
    info!("normalize: processing {} rows", sheet.rows.len());
    let headers = sheet.headers.as_deref();
    let mut events: Vec<Event> = sheet
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| build_event(idx, row, headers, specs))
        .collect();

    events.sort_by_key(|e| (e.start.is_none(), e.start));

    let startless = events.iter().filter(|e| e.start.is_none()).count();
    info!(
        "normalize: {} events ({} without a start date)",
        events.len(),
        startless
    );
    events
}

fn build_event(
    idx: usize,
    row: &RawRow,
    headers: Option<&[String]>,
    specs: &FieldSpecs,
) -> Event {
    let view = resolver::RowView::new(row);
    let field = |f: EventField| view.resolve(headers, specs.spec(f));
    let id = format!("evt-{}", idx);

    let title = match field(EventField::Title) {
        t if t.is_empty() => UNTITLED_EVENT.to_string(),
        t => t,
    };

    let start_raw = field(EventField::StartDate);
    let start = parse_date(Some(&start_raw));
    if start.is_none() && !start_raw.is_empty() {
        warn!("{}: could not read start date {:?}", id, start_raw);
    }
    let end_raw = field(EventField::EndDate);
    let end = parse_date(Some(&end_raw));
    if end.is_none() && !end_raw.is_empty() {
        warn!("{}: could not read end date {:?}", id, end_raw);
    }

    let funds_raw = field(EventField::Funds);
    let parsed_funds = parse_funds(Some(&funds_raw));
    if parsed_funds < 0.0 {
        warn!("{}: negative funds {:?} counted as 0", id, funds_raw);
    } else if parsed_funds == 0.0
        && !funds_raw.is_empty()
        && !funds_raw.chars().any(|c| c.is_ascii_digit())
    {
        warn!("{}: could not read funds {:?}", id, funds_raw);
    }
    let funds = parsed_funds.max(0.0);

    let event = Event {
        title,
        start,
        end,
        funds,
        country: normalize_country(&field(EventField::Country)),
        tag: sanitize_tag(&field(EventField::Tag)),
        tag2: sanitize_tag(&field(EventField::Tag2)),
        onboarding_count: crate::funds::parse_count(&field(EventField::OnboardingCount)),
        image: field(EventField::Image),
        description: field(EventField::Description),
        event_description: field(EventField::EventDescription),
        attendees: field(EventField::Attendees),
        benefit: field(EventField::Benefit),
        potential: field(EventField::Potential),
        raw: row.clone(),
        id,
    };
    debug!("build_event: {:?}", event);
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn titles(events: &[Event]) -> Vec<String> {
        events.iter().map(|e| e.title.clone()).collect()
    }

    #[test]
    fn three_row_sheet() {
        init();
        let sheet = Sheet::new(vec![
            RawRow::from_pairs(vec![
                ("Evento", "A"),
                ("Funds", "1.200,50"),
                ("Start Date", "2024-01-10"),
                ("country", "Poland (EU)"),
            ]),
            RawRow::from_pairs(vec![("Evento", "B"), ("Funds", ""), ("Start Date", "")]),
            RawRow::from_pairs(vec![
                ("Evento", "C"),
                ("Funds", "300"),
                ("Start Date", "2023-12-01"),
            ]),
        ]);
        let events = normalize(&sheet);
        assert_eq!(titles(&events), vec!["C", "A", "B"]);

        assert_eq!(events[0].id, "evt-2");
        assert_eq!(events[0].funds, 300.0);
        assert_eq!(events[0].start, Some(day(2023, 12, 1)));

        assert_eq!(events[1].id, "evt-0");
        assert_eq!(events[1].funds, 1200.5);
        assert_eq!(events[1].start, Some(day(2024, 1, 10)));
        assert_eq!(events[1].country, "poland");

        assert_eq!(events[2].id, "evt-1");
        assert_eq!(events[2].funds, 0.0);
        assert_eq!(events[2].start, None);
    }

    #[test]
    fn missing_starts_go_last_in_sheet_order() {
        init();
        let sheet = Sheet::new(vec![
            RawRow::from_pairs(vec![("Evento", "A"), ("Start Date", "")]),
            RawRow::from_pairs(vec![("Evento", "B"), ("Start Date", "2024-01-01")]),
            RawRow::from_pairs(vec![("Evento", "C"), ("Start Date", "not a date")]),
            RawRow::from_pairs(vec![("Evento", "D"), ("Start Date", "2023-01-01")]),
        ]);
        assert_eq!(titles(&normalize(&sheet)), vec!["D", "B", "A", "C"]);
    }

    #[test]
    fn equal_starts_keep_sheet_order() {
        let sheet = Sheet::new(vec![
            RawRow::from_pairs(vec![("Evento", "first"), ("Start Date", "2024-01-01")]),
            RawRow::from_pairs(vec![("Evento", "second"), ("Start Date", "2024-01-01")]),
        ]);
        assert_eq!(titles(&normalize(&sheet)), vec!["first", "second"]);
    }

    #[test]
    fn defaults_for_missing_columns() {
        let sheet = Sheet::new(vec![RawRow::from_pairs(vec![("Unrelated", "x")])]);
        let events = normalize(&sheet);
        let e = &events[0];
        assert_eq!(e.title, UNTITLED_EVENT);
        assert_eq!(e.start, None);
        assert_eq!(e.end, None);
        assert_eq!(e.funds, 0.0);
        assert_eq!(e.country, "");
        assert_eq!(e.tag, "");
        assert_eq!(e.tag2, "");
        assert_eq!(e.onboarding_count, 0);
        assert_eq!(e.description, "");
        assert_eq!(e.raw.get("Unrelated"), Some("x"));
    }

    #[test]
    fn empty_sheet() {
        assert!(normalize(&Sheet::default()).is_empty());
    }

    #[test]
    fn every_field_from_a_full_row() {
        init();
        let sheet = Sheet::new(vec![RawRow::from_pairs(vec![
            ("Evento", "  Hive Meetup  "),
            ("Start Date", "2024-05-01 18:00"),
            ("End date", "2024-05-02"),
            ("Funds", "HBD 1,5"),
            ("Image link", " https://img.example/a.png "),
            ("description", "Short"),
            ("Descripción del evento", "Long text"),
            ("País", "Caracas, Venezuela"),
            ("Tag", "#Hive Onboarding!"),
            ("Tag2", "Hive-108943"),
            ("Onboarding", "12"),
            ("Attendees", "40"),
            ("Benefit", "Visibility"),
            ("Potential", "High"),
        ])]);
        let events = normalize(&sheet);
        let e = &events[0];
        assert_eq!(e.title, "Hive Meetup");
        assert_eq!(
            e.start,
            Some(
                NaiveDate::from_ymd_opt(2024, 5, 1)
                    .unwrap()
                    .and_hms_opt(18, 0, 0)
                    .unwrap()
            )
        );
        assert_eq!(e.end, Some(day(2024, 5, 2)));
        assert_eq!(e.funds, 1.5);
        assert_eq!(e.image, "https://img.example/a.png");
        assert_eq!(e.description, "Short");
        assert_eq!(e.event_description, "Long text");
        assert_eq!(e.country, "venezuela");
        assert_eq!(e.tag, "hive-onboarding");
        assert_eq!(e.tag2, "hive-108943");
        assert_eq!(e.onboarding_count, 12);
        assert_eq!(e.attendees, "40");
        assert_eq!(e.benefit, "Visibility");
        assert_eq!(e.potential, "High");
    }

    #[test]
    fn tag_columns_do_not_leak() {
        let sheet = Sheet::new(vec![
            RawRow::from_pairs(vec![("Evento", "only tag2"), ("Tag", ""), ("Tag2", "hive-108943")]),
            RawRow::from_pairs(vec![("Evento", "only tag"), ("Tag", "hiveio"), ("Tag2", "")]),
        ]);
        let events = normalize(&sheet);
        assert_eq!(events[0].tag, "");
        assert_eq!(events[0].tag2, "hive-108943");
        assert_eq!(events[1].tag, "hiveio");
        assert_eq!(events[1].tag2, "");
    }

    #[test]
    fn short_headers_in_any_case() {
        let sheet = Sheet::new(vec![RawRow::from_pairs(vec![
            ("EVENT", "A"),
            ("START", "2024-01-10"),
            ("End ", "2024-01-11"),
            ("Tag ", "hiveio"),
            ("Attendees", "40"),
        ])]);
        let events = normalize(&sheet);
        assert_eq!(events[0].title, "A");
        assert_eq!(events[0].start, Some(day(2024, 1, 10)));
        assert_eq!(events[0].end, Some(day(2024, 1, 11)));
        assert_eq!(events[0].tag, "hiveio");
        assert_eq!(events[0].attendees, "40");
    }

    #[test]
    fn negative_funds_are_zero() {
        let sheet = Sheet::new(vec![RawRow::from_pairs(vec![("Funds", "-50")])]);
        assert_eq!(normalize(&sheet)[0].funds, 0.0);
    }

    #[test]
    fn positions_follow_declared_headers() {
        let mut specs = FieldSpecs::default_specs();
        specs.set(EventField::Title, FieldSpec::new(&[1], &["evento"], &[]));
        let sheet = Sheet::with_headers(
            vec!["Evento".to_string(), "Nombre corto".to_string()],
            vec![RawRow::from_pairs(vec![
                ("Evento", "Long name"),
                ("Nombre corto", "Short"),
            ])],
        );
        assert_eq!(normalize_with(&sheet, &specs)[0].title, "Short");
        // Without declared headers the keyword applies.
        let sheet = Sheet::new(sheet.rows);
        assert_eq!(normalize_with(&sheet, &specs)[0].title, "Long name");
    }

    #[test]
    fn normalization_is_repeatable() {
        let sheet = Sheet::new(vec![
            RawRow::from_pairs(vec![("Evento", "A"), ("Start Date", "2024-02-01"), ("Funds", "5")]),
            RawRow::from_pairs(vec![("Evento", "B"), ("Start Date", "2024-01-01")]),
        ]);
        let before = sheet.clone();
        let first = normalize(&sheet);
        let second = normalize(&sheet);
        assert_eq!(first, second);
        assert_eq!(sheet, before);
    }
}
