//! Builds printable timetable pages out of the joined feed: one cohort of
//! trips per service calendar, ordered by first departure, split into pages
//! of at most `max_trips` columns.

use std::collections::HashSet;

use itertools::Itertools;

use crate::calendar::{self, ServiceSummary};
use crate::data::FeedIndex;
use crate::error::Error;
use crate::gtfs::{Route, Trip};
use crate::time::{self, Minutes};

pub const STOP_COLUMN_LABEL: &str = "Stop";

/// Construction options, built once at the boundary and passed by value.
#[derive(Debug, Clone)]
pub struct Options {
    /// Exact route id or short name to select; None keeps every route.
    pub route_filter: Option<String>,
    /// Trip columns per page.
    pub max_trips: usize,
    /// Normalized stop names or ids to emphasize. Empty means the
    /// all-uppercase-name convention decides instead.
    pub major_stops: HashSet<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            route_filter: None,
            max_trips: 8,
            major_stops: HashSet::new(),
        }
    }
}

/// One printable unit: the trips of one service cohort of one route that fit
/// a single page.
#[derive(Debug)]
pub struct TimetablePage {
    pub route: Route,
    pub agency_name: String,
    /// Stop-column label first, then one header per trip.
    pub headers: Vec<String>,
    /// Stop display name first, then one formatted time per trip.
    pub rows: Vec<Vec<String>>,
    /// Stop id aligned to each row.
    pub row_stop_ids: Vec<String>,
    /// Ids of the rows' stops classified as major.
    pub major_stops: HashSet<String>,
    pub summary: ServiceSummary,
    /// Only populated when the route has more than one service cohort.
    pub cohort: Option<String>,
    pub page_number: usize,
    pub page_count: usize,
}

impl TimetablePage {
    /// Document title shared by the rendering backends.
    pub fn title(&self) -> String {
        match self
            .route
            .route_long_name
            .as_deref()
            .filter(|name| !name.is_empty())
        {
            Some(long_name) => format!("{} {}", self.route.display_name(), long_name),
            None => self.route.display_name().to_string(),
        }
    }
}

/// Runs the whole pipeline over the index. Fails only when nothing at all
/// matched; per-trip gaps degrade to blank cells instead.
pub fn build_timetables(
    index: &FeedIndex,
    options: &Options,
) -> Result<Vec<TimetablePage>, Error> {
    let mut pages = Vec::new();
    for route in index.routes() {
        if !route.matches_filter(options.route_filter.as_deref()) {
            continue;
        }
        let scheduled: Vec<&Trip> = index
            .trips_of(&route.route_id)
            .iter()
            .filter(|trip| index.stop_times_of(&trip.trip_id).is_some())
            .collect();
        let cohorts = service_cohorts(&scheduled);
        let labeled = cohorts.len() > 1;
        for (service_id, members) in cohorts {
            let summary =
                calendar::summarize(service_id.and_then(|id| index.calendar_of(id)));
            let cohort = match (labeled, service_id) {
                (true, Some(id)) => Some(id.to_string()),
                _ => None,
            };
            pages.extend(paginate(
                index, options, route, &summary, &cohort, &members,
            ));
        }
        log::debug!("route {}: timetables built", route.route_id);
    }
    if pages.is_empty() {
        return Err(Error::NoMatchingTimetables);
    }
    Ok(pages)
}

/// Buckets a route's scheduled trips by service id, in order of first
/// appearance. Trips without a service reference share one fallback bucket.
fn service_cohorts<'t>(trips: &[&'t Trip]) -> Vec<(Option<&'t str>, Vec<&'t Trip>)> {
    let mut cohorts: Vec<(Option<&str>, Vec<&Trip>)> = Vec::new();
    for &trip in trips {
        let key = trip.service_id.as_deref();
        match cohorts.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, members)) => members.push(trip),
            None => cohorts.push((key, vec![trip])),
        }
    }
    cohorts
}

fn paginate(
    index: &FeedIndex,
    options: &Options,
    route: &Route,
    summary: &ServiceSummary,
    cohort: &Option<String>,
    trips: &[&Trip],
) -> Vec<TimetablePage> {
    let ordered: Vec<&Trip> = trips
        .iter()
        .copied()
        .sorted_by_key(|trip| start_minute(index, trip))
        .collect();
    let chunks: Vec<&[&Trip]> = ordered.chunks(options.max_trips.max(1)).collect();
    let page_count = chunks.len();
    chunks
        .into_iter()
        .enumerate()
        .map(|(chunk_index, chunk)| {
            let canonical = canonical_stops(index, chunk);
            TimetablePage {
                route: route.clone(),
                agency_name: index.agency_name(route).unwrap_or_default().to_string(),
                headers: headers(chunk),
                rows: rows(index, chunk, &canonical),
                major_stops: major_stops(index, options, &canonical),
                row_stop_ids: canonical,
                summary: summary.clone(),
                cohort: cohort.clone(),
                page_number: chunk_index + 1,
                page_count,
            }
        })
        .collect()
}

/// Sort key for trip ordering: the first stop-time's departure (or arrival)
/// in minutes. Unparsable or missing times sort as minute 0; this is a
/// stable-sort tie-break, not a claim about the actual start.
fn start_minute(index: &FeedIndex, trip: &Trip) -> Minutes {
    index
        .stop_times_of(&trip.trip_id)
        .and_then(|stop_times| stop_times.first())
        .and_then(|stop_time| stop_time.preferred_time())
        .and_then(time::parse_time)
        .unwrap_or(0)
}

fn headers(trips: &[&Trip]) -> Vec<String> {
    let mut headers = Vec::with_capacity(trips.len() + 1);
    headers.push(STOP_COLUMN_LABEL.to_string());
    headers.extend(trips.iter().map(|trip| trip.column_title().to_string()));
    headers
}

/// The canonical stop order of a page is the earliest trip's stop sequence,
/// verbatim, duplicates included.
fn canonical_stops(index: &FeedIndex, trips: &[&Trip]) -> Vec<String> {
    trips
        .first()
        .and_then(|trip| index.stop_times_of(&trip.trip_id))
        .unwrap_or(&[])
        .iter()
        .map(|stop_time| stop_time.stop_id.clone())
        .collect()
}

fn rows(index: &FeedIndex, trips: &[&Trip], canonical: &[String]) -> Vec<Vec<String>> {
    canonical
        .iter()
        .map(|stop_id| {
            let mut row = Vec::with_capacity(trips.len() + 1);
            row.push(
                index
                    .stop_name(stop_id)
                    .unwrap_or(stop_id.as_str())
                    .to_string(),
            );
            row.extend(trips.iter().map(|trip| cell_text(index, trip, stop_id)));
            row
        })
        .collect()
}

/// A trip's cell for a canonical stop: the first of its stop-times serving
/// that stop, formatted departure-else-arrival. Trips that skip the stop get
/// a blank cell.
fn cell_text(index: &FeedIndex, trip: &Trip, stop_id: &str) -> String {
    index
        .stop_times_of(&trip.trip_id)
        .unwrap_or(&[])
        .iter()
        .find(|stop_time| stop_time.stop_id == stop_id)
        .and_then(|stop_time| stop_time.preferred_time())
        .map(time::format_time)
        .unwrap_or_default()
}

fn major_stops(index: &FeedIndex, options: &Options, canonical: &[String]) -> HashSet<String> {
    canonical
        .iter()
        .filter(|stop_id| {
            is_major_stop(
                index.stop_name(stop_id).unwrap_or_default(),
                stop_id,
                &options.major_stops,
            )
        })
        .cloned()
        .collect()
}

/// With an explicit set both the display name and the id may match. Without
/// one, a trimmed non-empty name equal to its own uppercased form counts:
/// feeds conventionally capitalize major interchange names.
fn is_major_stop(name: &str, stop_id: &str, explicit: &HashSet<String>) -> bool {
    if !explicit.is_empty() {
        return explicit.contains(&normalize_major(name))
            || explicit.contains(&normalize_major(stop_id));
    }
    let trimmed = name.trim();
    !trimmed.is_empty() && trimmed == trimmed.to_uppercase()
}

/// Normal form for explicit major-stop entries: trimmed, case-insensitive.
pub fn normalize_major(value: &str) -> String {
    value.trim().to_lowercase()
}
