//! Loads the feed tables from a GTFS directory or zip archive. Archive
//! entries are decoded in place, so nothing is extracted to disk. The
//! stop_times table is streamed through a relevant-trip filter instead of
//! being materialized whole; on big feeds it dwarfs every other table.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use zip::ZipArchive;

use crate::error::Error;
use crate::gtfs::{Agency, Calendar, Feed, Route, Stop, StopTime, Trip};

enum FeedSource {
    Directory(PathBuf),
    Archive(Box<ZipArchive<File>>),
}

impl FeedSource {
    fn open(path: &Path) -> Result<Self, Error> {
        if path.is_dir() {
            Ok(Self::Directory(path.to_path_buf()))
        } else {
            let archive = ZipArchive::new(File::open(path)?)?;
            Ok(Self::Archive(Box::new(archive)))
        }
    }

    /// Reader over `<table>.txt`, or None when the feed does not carry it.
    fn reader(&mut self, table: &str) -> Result<Option<Box<dyn Read + '_>>, Error> {
        let file_name = format!("{table}.txt");
        match self {
            Self::Directory(directory) => {
                let path = directory.join(&file_name);
                if !path.is_file() {
                    return Ok(None);
                }
                Ok(Some(Box::new(File::open(path)?)))
            }
            Self::Archive(archive) => match archive.by_name(&file_name) {
                Ok(entry) => Ok(Some(Box::new(entry))),
                Err(zip::result::ZipError::FileNotFound) => Ok(None),
                Err(error) => Err(error.into()),
            },
        }
    }
}

pub fn load(path: &Path, route_filter: Option<&str>) -> Result<Feed, Error> {
    let mut source = FeedSource::open(path)?;

    let routes: Vec<Route> = required(&mut source, "routes")?;
    let trips: Vec<Trip> = required(&mut source, "trips")?;
    let stops: Vec<Stop> = required(&mut source, "stops")?;
    let calendar: Vec<Calendar> = optional(&mut source, "calendar")?;
    let agencies: Vec<Agency> = optional(&mut source, "agency")?;

    let relevant = relevant_trips(&routes, &trips, route_filter);
    let stop_times = match source.reader("stop_times")? {
        None => return Err(Error::MissingTable("stop_times")),
        Some(reader) => filtered_stop_times(reader, &relevant)?,
    };

    Ok(Feed {
        routes,
        trips,
        stops,
        stop_times,
        calendar,
        agencies,
    })
}

fn required<T: DeserializeOwned>(
    source: &mut FeedSource,
    table: &'static str,
) -> Result<Vec<T>, Error> {
    match source.reader(table)? {
        Some(reader) => read_table(reader, table),
        None => Err(Error::MissingTable(table)),
    }
}

fn optional<T: DeserializeOwned>(
    source: &mut FeedSource,
    table: &'static str,
) -> Result<Vec<T>, Error> {
    match source.reader(table)? {
        Some(reader) => read_table(reader, table),
        None => {
            log::debug!("optional table {table} not present");
            Ok(Vec::new())
        }
    }
}

fn read_table<T: DeserializeOwned>(reader: impl Read, table: &'static str) -> Result<Vec<T>, Error> {
    csv::Reader::from_reader(reader)
        .deserialize()
        .map(|row| row.map_err(|source| Error::Csv { table, source }))
        .collect()
}

/// Trip ids belonging to the routes the filter keeps; only their stop_times
/// rows are worth materializing.
fn relevant_trips<'t>(
    routes: &[Route],
    trips: &'t [Trip],
    route_filter: Option<&str>,
) -> HashSet<&'t str> {
    let selected: HashSet<&str> = routes
        .iter()
        .filter(|route| route.matches_filter(route_filter))
        .map(|route| route.route_id.as_str())
        .collect();
    trips
        .iter()
        .filter(|trip| selected.contains(trip.route_id.as_str()))
        .map(|trip| trip.trip_id.as_str())
        .collect()
}

fn filtered_stop_times(
    reader: impl Read,
    relevant: &HashSet<&str>,
) -> Result<Vec<StopTime>, Error> {
    let mut rows = Vec::new();
    for row in csv::Reader::from_reader(reader).deserialize::<StopTime>() {
        let row = row.map_err(|source| Error::Csv {
            table: "stop_times",
            source,
        })?;
        if relevant.contains(row.trip_id.as_str()) {
            rows.push(row);
        }
    }
    Ok(rows)
}
