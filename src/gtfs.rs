use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Stop {
    pub stop_id: String,
    pub stop_name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Route {
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
    pub route_desc: Option<String>,
    pub agency_id: Option<String>,
}

impl Route {
    /// Short name where the feed provides one, the raw id otherwise.
    pub fn display_name(&self) -> &str {
        match self.route_short_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.route_id,
        }
    }

    pub fn matches_filter(&self, filter: Option<&str>) -> bool {
        match filter {
            None => true,
            Some(wanted) => {
                self.route_id == wanted || self.route_short_name.as_deref() == Some(wanted)
            }
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Trip {
    pub trip_id: String,
    pub route_id: String,
    pub service_id: Option<String>,
    pub trip_headsign: Option<String>,
}

impl Trip {
    /// Headsign where present, the trip id otherwise; shown as the column header.
    pub fn column_title(&self) -> &str {
        match self.trip_headsign.as_deref() {
            Some(headsign) if !headsign.trim().is_empty() => headsign,
            _ => &self.trip_id,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct StopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub stop_sequence: u32,
    pub arrival_time: Option<String>,
    pub departure_time: Option<String>,
}

impl StopTime {
    /// Departure where present, arrival otherwise. Blank values count as absent.
    pub fn preferred_time(&self) -> Option<&str> {
        self.departure_time
            .as_deref()
            .filter(|value| !value.is_empty())
            .or_else(|| {
                self.arrival_time
                    .as_deref()
                    .filter(|value| !value.is_empty())
            })
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Calendar {
    pub service_id: String,
    pub monday: u8,
    pub tuesday: u8,
    pub wednesday: u8,
    pub thursday: u8,
    pub friday: u8,
    pub saturday: u8,
    pub sunday: u8,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Calendar {
    /// Active weekdays in Monday-first order.
    pub fn weekdays(&self) -> [bool; 7] {
        [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ]
        .map(|flag| flag != 0)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Agency {
    pub agency_id: Option<String>,
    pub agency_name: String,
}

/// The raw feed tables, decoded but not yet joined. Optional tables load as
/// empty lists when absent.
#[derive(Debug, Default)]
pub struct Feed {
    pub routes: Vec<Route>,
    pub trips: Vec<Trip>,
    pub stops: Vec<Stop>,
    pub stop_times: Vec<StopTime>,
    pub calendar: Vec<Calendar>,
    pub agencies: Vec<Agency>,
}
