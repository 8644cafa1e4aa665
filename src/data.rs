use std::collections::HashMap;

use crate::gtfs::{Calendar, Feed, Route, StopTime, Trip};

/// Lookup structures joining the feed tables, built in a single pass and
/// read-only afterwards. Trips that never appear in `stop_times` have no
/// entry here and drop out of everything downstream.
#[derive(Debug, Default)]
pub struct FeedIndex {
    routes: Vec<Route>,
    stop_names: HashMap<String, String>,
    trips_by_route: HashMap<String, Vec<Trip>>,
    stop_times_by_trip: HashMap<String, Vec<StopTime>>,
    calendar_by_service: HashMap<String, Calendar>,
    agency_names: HashMap<String, String>,
    single_agency: Option<String>,
}

impl From<Feed> for FeedIndex {
    fn from(feed: Feed) -> Self {
        let mut stop_names = HashMap::new();
        for stop in feed.stops {
            // last write wins on duplicate ids
            stop_names.insert(stop.stop_id, stop.stop_name);
        }

        let mut trips_by_route: HashMap<String, Vec<Trip>> = HashMap::new();
        for trip in feed.trips {
            trips_by_route
                .entry(trip.route_id.clone())
                .or_default()
                .push(trip);
        }

        let mut stop_times_by_trip: HashMap<String, Vec<StopTime>> = HashMap::new();
        for stop_time in feed.stop_times {
            stop_times_by_trip
                .entry(stop_time.trip_id.clone())
                .or_default()
                .push(stop_time);
        }
        for stop_times in stop_times_by_trip.values_mut() {
            // stable, so equal sequence numbers keep their input order
            stop_times.sort_by_key(|stop_time| stop_time.stop_sequence);
        }

        let calendar_by_service = feed
            .calendar
            .into_iter()
            .map(|entry| (entry.service_id.clone(), entry))
            .collect();

        let single_agency = match feed.agencies.as_slice() {
            [only] => Some(only.agency_name.clone()),
            _ => None,
        };
        let agency_names = feed
            .agencies
            .into_iter()
            .filter_map(|agency| agency.agency_id.map(|id| (id, agency.agency_name)))
            .collect();

        Self {
            routes: feed.routes,
            stop_names,
            trips_by_route,
            stop_times_by_trip,
            calendar_by_service,
            agency_names,
            single_agency,
        }
    }
}

impl FeedIndex {
    /// Routes in feed order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn stop_name(&self, stop_id: &str) -> Option<&str> {
        self.stop_names.get(stop_id).map(String::as_str)
    }

    /// A route's trips in feed order, including trips without stop-times.
    pub fn trips_of(&self, route_id: &str) -> &[Trip] {
        self.trips_by_route
            .get(route_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// A trip's stop-times ordered by sequence number, or None for a trip
    /// with no published stop sequence.
    pub fn stop_times_of(&self, trip_id: &str) -> Option<&[StopTime]> {
        self.stop_times_by_trip
            .get(trip_id)
            .map(Vec::as_slice)
    }

    pub fn calendar_of(&self, service_id: &str) -> Option<&Calendar> {
        self.calendar_by_service.get(service_id)
    }

    /// Agency display name for a route: the referenced agency if the route
    /// names one, otherwise the feed's sole agency if there is exactly one.
    pub fn agency_name(&self, route: &Route) -> Option<&str> {
        match route.agency_id.as_deref() {
            Some(id) if !id.is_empty() => self.agency_names.get(id).map(String::as_str),
            _ => self.single_agency.as_deref(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gtfs::{Agency, Stop};

    fn stop_time(trip_id: &str, stop_id: &str, stop_sequence: u32) -> StopTime {
        StopTime {
            trip_id: trip_id.to_string(),
            stop_id: stop_id.to_string(),
            stop_sequence,
            arrival_time: None,
            departure_time: None,
        }
    }

    #[test]
    fn orders_stop_times_by_sequence_regardless_of_input_order() {
        let feed = Feed {
            stop_times: vec![
                stop_time("t1", "c", 30),
                stop_time("t1", "a", 10),
                stop_time("t1", "b", 20),
            ],
            ..Feed::default()
        };
        let index = FeedIndex::from(feed);
        let ordered: Vec<&str> = index
            .stop_times_of("t1")
            .unwrap()
            .iter()
            .map(|stop_time| stop_time.stop_id.as_str())
            .collect();
        assert_eq!(ordered, ["a", "b", "c"]);
    }

    #[test]
    fn sorted_input_is_left_untouched() {
        let sorted = vec![
            stop_time("t1", "a", 1),
            stop_time("t1", "b", 2),
            stop_time("t1", "c", 3),
        ];
        let feed = Feed {
            stop_times: sorted.clone(),
            ..Feed::default()
        };
        let index = FeedIndex::from(feed);
        let ordered: Vec<&str> = index
            .stop_times_of("t1")
            .unwrap()
            .iter()
            .map(|stop_time| stop_time.stop_id.as_str())
            .collect();
        assert_eq!(ordered, ["a", "b", "c"]);
        assert_eq!(sorted.len(), 3);
    }

    #[test]
    fn trip_without_stop_times_has_no_entry() {
        let feed = Feed {
            stop_times: vec![stop_time("t1", "a", 1)],
            ..Feed::default()
        };
        let index = FeedIndex::from(feed);
        assert!(index.stop_times_of("t1").is_some());
        assert!(index.stop_times_of("t2").is_none());
    }

    #[test]
    fn duplicate_stop_ids_keep_the_last_name() {
        let feed = Feed {
            stops: vec![
                Stop {
                    stop_id: "s1".to_string(),
                    stop_name: "Old Name".to_string(),
                },
                Stop {
                    stop_id: "s1".to_string(),
                    stop_name: "New Name".to_string(),
                },
            ],
            ..Feed::default()
        };
        let index = FeedIndex::from(feed);
        assert_eq!(index.stop_name("s1"), Some("New Name"));
    }

    #[test]
    fn sole_agency_is_the_default_for_unreferenced_routes() {
        let feed = Feed {
            agencies: vec![Agency {
                agency_id: None,
                agency_name: "City Transit".to_string(),
            }],
            ..Feed::default()
        };
        let index = FeedIndex::from(feed);
        let route = Route {
            route_id: "r1".to_string(),
            route_short_name: None,
            route_long_name: None,
            route_desc: None,
            agency_id: None,
        };
        assert_eq!(index.agency_name(&route), Some("City Transit"));
    }
}
