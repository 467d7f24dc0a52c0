use std::{collections::HashSet, io::Read, path::Path, thread};

use itertools::Itertools;

use crate::error::{LoadError, Result};
use crate::gtfs::{StopTime, Trip};
use crate::parser::RecordReader;
use crate::response::{StopResponse, TripResponse};
use crate::table::{StopTimeTable, TripTable};

/// What to do with stop times whose `trip_id` is not in the trips file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Fail the whole load with [`LoadError::Integrity`].
    #[default]
    Reject,
    /// Unlink them from the trip index and keep going.
    Drop,
}

#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub orphans: OrphanPolicy,
    pub trips_capacity: usize,
    pub stop_times_capacity: usize,
}

impl LoadOptions {
    pub fn orphans(mut self, policy: OrphanPolicy) -> Self {
        self.orphans = policy;
        self
    }

    /// Pre-size both arenas when the feed size is roughly known.
    pub fn capacity(mut self, trips: usize, stop_times: usize) -> Self {
        self.trips_capacity = trips;
        self.stop_times_capacity = stop_times;
        self
    }
}

/// The loaded, immutable schedule. Share it as `Arc<Dataset>`.
#[derive(Debug)]
pub struct Dataset {
    trips: TripTable,
    stop_times: StopTimeTable,
    orphans_dropped: usize,
}

impl Dataset {
    pub fn load(trips_path: impl AsRef<Path>, stop_times_path: impl AsRef<Path>) -> Result<Self> {
        Self::load_with(trips_path, stop_times_path, &LoadOptions::default())
    }

    pub fn load_with(
        trips_path: impl AsRef<Path>,
        stop_times_path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<Self> {
        let trips = RecordReader::<Trip>::from_path(trips_path)?;
        let stop_times = RecordReader::<StopTime>::from_path(stop_times_path)?;
        Self::from_records(trips, stop_times, options)
    }

    pub fn from_readers<RT, RS>(trips: RT, stop_times: RS, options: &LoadOptions) -> Result<Self>
    where
        RT: Read,
        RS: Read + Send,
    {
        let trips = RecordReader::<Trip, _>::from_reader("trips.txt", trips)?;
        let stop_times = RecordReader::<StopTime, _>::from_reader("stop_times.txt", stop_times)?;
        Self::from_records(trips, stop_times, options)
    }

    fn from_records<RT, RS>(
        trips: RecordReader<Trip, RT>,
        stop_times: RecordReader<StopTime, RS>,
        options: &LoadOptions,
    ) -> Result<Self>
    where
        RT: Read,
        RS: Read + Send,
    {
        // Neither table reads the other, so build them side by side.
        let (trips, stop_times) = thread::scope(|scope| {
            let stop_times = scope
                .spawn(move || StopTimeTable::build(stop_times, options.stop_times_capacity));
            let trips = TripTable::build(trips, options.trips_capacity);
            let stop_times = stop_times
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (trips, stop_times)
        });

        let mut dataset = Self {
            trips: trips?,
            stop_times: stop_times?,
            orphans_dropped: 0,
        };
        dataset.check_integrity(options.orphans)?;
        Ok(dataset)
    }

    fn check_integrity(&mut self, policy: OrphanPolicy) -> Result<()> {
        let known: HashSet<&str> = self
            .trips
            .rows()
            .iter()
            .map(|trip| trip.trip_id.as_str())
            .collect();
        let orphans: Vec<String> = self
            .stop_times
            .keys()
            .filter(|trip_id| !known.contains(trip_id))
            .map(str::to_owned)
            .collect();

        if orphans.is_empty() {
            return Ok(());
        }

        match policy {
            OrphanPolicy::Reject => {
                // Report the earliest offending row so the error is stable across runs.
                let (trip_id, row) = orphans
                    .into_iter()
                    .filter_map(|trip_id| {
                        let row = *self.stop_times.positions(&trip_id)?.first()?;
                        Some((trip_id, row))
                    })
                    .min_by_key(|(_, row)| *row)
                    .unwrap_or_default();
                Err(LoadError::Integrity { trip_id, row })
            }
            OrphanPolicy::Drop => {
                for trip_id in &orphans {
                    if let Some(positions) = self.stop_times.unlink(trip_id) {
                        self.orphans_dropped += positions.len();
                    }
                }
                log::warn!(
                    "dropped {} stop_times referencing {} unknown trips",
                    self.orphans_dropped,
                    orphans.len()
                );
                Ok(())
            }
        }
    }

    /// Every trip on `route_id` with its stops, both in file order.
    ///
    /// An unknown route gives an empty list, and so does the schedule of a trip
    /// without stop times.
    pub fn lookup(&self, route_id: &str) -> Vec<TripResponse<'_>> {
        let trips: Vec<_> = self
            .trips
            .rows_for(route_id)
            .map(|trip| {
                let schedules = self
                    .stop_times
                    .rows_for(&trip.trip_id)
                    .map(StopResponse::from)
                    .collect();
                TripResponse::new(trip, schedules)
            })
            .collect();
        log::debug!("route {:?} has {} trips", route_id, trips.len());
        trips
    }

    pub fn trips(&self) -> &TripTable {
        &self.trips
    }

    pub fn stop_times(&self) -> &StopTimeTable {
        &self.stop_times
    }

    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }

    pub fn stop_time_count(&self) -> usize {
        self.stop_times.len()
    }

    pub fn route_count(&self) -> usize {
        self.trips.key_count()
    }

    pub fn route_ids(&self) -> Vec<&str> {
        self.trips.keys().sorted_unstable().collect()
    }

    /// Stop times unlinked under [`OrphanPolicy::Drop`].
    pub fn orphans_dropped(&self) -> usize {
        self.orphans_dropped
    }
}
