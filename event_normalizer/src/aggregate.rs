use chrono::NaiveDateTime;
use log::{debug, info};
use std::collections::{HashMap, HashSet};

use crate::config::Event;
use crate::dates::start_of_day;

/// The events whose effective end falls on or after the start of the day of
/// `now`. Events without a start are left out, even when they have an end.
pub fn filter_upcoming(events: &[Event], now: NaiveDateTime) -> Vec<&Event> {
    events
        .iter()
        .filter(|e| EventStatus::of(e, now) == EventStatus::Upcoming)
        .collect()
}

/// The "show past events" switch: every event, undated ones included, when
/// `show_past` is set; only the upcoming ones otherwise.
pub fn select_events(events: &[Event], now: NaiveDateTime, show_past: bool) -> Vec<&Event> {
    if show_past {
        events.iter().collect()
    } else {
        filter_upcoming(events, now)
    }
}

/// Where an event stands relative to a reference instant.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum EventStatus {
    Upcoming,
    Past,
    Undated,
}

impl EventStatus {
    /// Events with an end but no start are never upcoming: they count as
    /// past, and only events with neither date are undated.
    pub fn of(event: &Event, now: NaiveDateTime) -> EventStatus {
        match event.effective_end() {
            None => EventStatus::Undated,
            Some(end) if event.start.is_some() && end >= start_of_day(now) => {
                EventStatus::Upcoming
            }
            Some(_) => EventStatus::Past,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Past => "past",
            EventStatus::Undated => "undated",
        }
    }
}

/// The three groups of `partition_by_time`, each in collection order.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Timeline<'a> {
    pub upcoming: Vec<&'a Event>,
    pub past: Vec<&'a Event>,
    pub undated: Vec<&'a Event>,
}

pub fn partition_by_time(events: &[Event], now: NaiveDateTime) -> Timeline<'_> {
    let mut timeline = Timeline::default();
    for e in events.iter() {
        match EventStatus::of(e, now) {
            EventStatus::Upcoming => timeline.upcoming.push(e),
            EventStatus::Past => timeline.past.push(e),
            EventStatus::Undated => timeline.undated.push(e),
        }
    }
    debug!(
        "partition_by_time: {} upcoming, {} past, {} undated",
        timeline.upcoming.len(),
        timeline.past.len(),
        timeline.undated.len()
    );
    timeline
}

/// The funds of all the events sharing one normalized country. The empty
/// country is the bucket of events with no known place.
#[derive(PartialEq, Debug, Clone)]
pub struct CountryAggregate<'a> {
    pub country: &'a str,
    pub total_funds: f64,
    pub events: Vec<&'a Event>,
}

/// Groups events by country, in the order the countries are first seen.
pub fn aggregate_by_country<'a, I>(events: I) -> Vec<CountryAggregate<'a>>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut buckets: Vec<CountryAggregate<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    for e in events {
        let key = e.country.as_str();
        let idx = *index.entry(key).or_insert_with(|| {
            buckets.push(CountryAggregate {
                country: key,
                total_funds: 0.0,
                events: Vec::new(),
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[idx];
        bucket.total_funds += e.funds;
        bucket.events.push(e);
    }
    info!("aggregate_by_country: {} countries", buckets.len());
    buckets
}

/// The `n` best funded events, ties kept in collection order.
pub fn aggregate_top_by_funds<'a, I>(events: I, n: usize) -> Vec<&'a Event>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut sorted: Vec<&'a Event> = events.into_iter().collect();
    // Stable: equal funds keep their relative order.
    sorted.sort_by(|a, b| b.funds.total_cmp(&a.funds));
    sorted.truncate(n);
    sorted
}

/// Headline figures for a set of events.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct DashboardSummary {
    pub total_events: usize,
    pub total_funds: f64,
    /// Distinct non-empty countries.
    pub active_countries: usize,
}

pub fn summarize<'a, I>(events: I) -> DashboardSummary
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut total_events = 0;
    let mut total_funds = 0.0;
    let mut countries: HashSet<&'a str> = HashSet::new();
    for e in events {
        total_events += 1;
        total_funds += e.funds;
        if !e.country.is_empty() {
            countries.insert(e.country.as_str());
        }
    }
    DashboardSummary {
        total_events,
        total_funds,
        active_countries: countries.len(),
    }
}
