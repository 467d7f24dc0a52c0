use serde::Serialize;

use crate::gtfs::{StopTime, Trip};

/// One trip on the requested route with its ordered schedule.
///
/// Borrows from the dataset; nothing is copied until it is serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TripResponse<'data> {
    pub trip_id: &'data str,
    pub route_id: &'data str,
    pub service_id: &'data str,
    pub schedules: Vec<StopResponse<'data>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StopResponse<'data> {
    pub stop_id: &'data str,
    pub arrival_time: &'data str,
    pub departure_time: &'data str,
}

impl<'data> TripResponse<'data> {
    pub fn new(trip: &'data Trip, schedules: Vec<StopResponse<'data>>) -> Self {
        Self {
            trip_id: &trip.trip_id,
            route_id: &trip.route_id,
            service_id: &trip.service_id,
            schedules,
        }
    }
}

impl<'data> From<&'data StopTime> for StopResponse<'data> {
    fn from(stop_time: &'data StopTime) -> Self {
        Self {
            stop_id: &stop_time.stop_id,
            arrival_time: &stop_time.arrival,
            departure_time: &stop_time.departure,
        }
    }
}
