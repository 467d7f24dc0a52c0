use csv::StringRecord;

/// A typed row read positionally from one of the feed files.
///
/// `COLUMNS` is the exact leading header the file must carry. The parser
/// guarantees `from_record` only sees records with at least that many fields.
pub trait Row: Sized {
    const COLUMNS: &'static [&'static str];

    fn from_record(record: &StringRecord) -> Self;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub trip_id: String,
    pub route_id: String,
    pub service_id: String,
}

impl Row for Trip {
    const COLUMNS: &'static [&'static str] = &["route_id", "service_id", "trip_id"];

    fn from_record(record: &StringRecord) -> Self {
        Self {
            route_id: record[0].to_owned(),
            service_id: record[1].to_owned(),
            trip_id: record[2].to_owned(),
        }
    }
}

/// Arrival and departure stay as raw text, e.g. "25:03:00" is legal GTFS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub trip_id: String,
    pub stop_id: String,
    pub arrival: String,
    pub departure: String,
}

impl Row for StopTime {
    const COLUMNS: &'static [&'static str] =
        &["trip_id", "arrival_time", "departure_time", "stop_id"];

    fn from_record(record: &StringRecord) -> Self {
        Self {
            trip_id: record[0].to_owned(),
            arrival: record[1].to_owned(),
            departure: record[2].to_owned(),
            stop_id: record[3].to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trip_fields_are_positional() {
        let record = StringRecord::from(vec!["Red", "Weekday", "T-100"]);
        assert_eq!(
            Trip::from_record(&record),
            Trip {
                trip_id: "T-100".into(),
                route_id: "Red".into(),
                service_id: "Weekday".into(),
            }
        );
    }

    #[test]
    fn stop_time_keeps_raw_times() {
        let record = StringRecord::from(vec!["T-100", "24:59:00", "25:01:30", "place-alfcl", "1"]);
        let stop_time = StopTime::from_record(&record);
        assert_eq!(stop_time.arrival, "24:59:00");
        assert_eq!(stop_time.departure, "25:01:30");
        assert_eq!(stop_time.stop_id, "place-alfcl");
    }
}
