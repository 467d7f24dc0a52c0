use std::{collections::HashMap, time::Instant};

use crate::error::Result;
use crate::gtfs::{StopTime, Trip};

/// Rows that are grouped under a string key when their table is built.
pub trait Indexed {
    /// Plural noun for log lines.
    const LABEL: &'static str;

    fn index_key(&self) -> &str;
}

impl Indexed for Trip {
    const LABEL: &'static str = "trips";

    fn index_key(&self) -> &str {
        &self.route_id
    }
}

impl Indexed for StopTime {
    const LABEL: &'static str = "stop_times";

    fn index_key(&self) -> &str {
        &self.trip_id
    }
}

/// An arena of rows plus a map from key to the positions of its rows.
///
/// Both halves are filled by the same pass in [`IndexedTable::build`] and the
/// rows are never exposed mutably, so every stored position stays in bounds
/// and positions under one key stay in file order.
#[derive(Debug)]
pub struct IndexedTable<T> {
    rows: Vec<T>,
    index: HashMap<String, Vec<usize>>,
}

/// Trips, indexed by `route_id`.
pub type TripTable = IndexedTable<Trip>;

/// Stop times, indexed by `trip_id`.
pub type StopTimeTable = IndexedTable<StopTime>;

impl<T: Indexed> IndexedTable<T> {
    /// Consumes `rows` once, stopping at the first error.
    pub fn build<I>(rows: I, capacity: usize) -> Result<Self>
    where
        I: IntoIterator<Item = Result<T>>,
    {
        let now = Instant::now();
        let mut table = Self {
            rows: Vec::with_capacity(capacity),
            index: HashMap::new(),
        };

        for row in rows {
            table.push(row?);
        }

        log::info!(
            "parsed {} {} under {} keys in {} ms",
            table.rows.len(),
            T::LABEL,
            table.index.len(),
            now.elapsed().as_millis()
        );
        Ok(table)
    }

    fn push(&mut self, row: T) {
        let ix = self.rows.len();
        // Only allocate the owned key the first time it is seen.
        match self.index.get_mut(row.index_key()) {
            Some(positions) => positions.push(ix),
            None => {
                self.index.insert(row.index_key().to_owned(), vec![ix]);
            }
        }
        self.rows.push(row);
    }
}

impl<T> IndexedTable<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn get(&self, ix: usize) -> Option<&T> {
        self.rows.get(ix)
    }

    /// Positions of every row filed under `key`, in file order.
    pub fn positions(&self, key: &str) -> Option<&[usize]> {
        self.index.get(key).map(Vec::as_slice)
    }

    /// Rows filed under `key`, in file order. Empty when the key is unknown.
    pub fn rows_for<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a T> + 'a {
        self.positions(key)
            .unwrap_or(&[])
            .iter()
            .map(move |&ix| &self.rows[ix])
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn key_count(&self) -> usize {
        self.index.len()
    }

    /// Unlinks `key` from the index. The rows stay in the arena but become unreachable.
    pub(crate) fn unlink(&mut self, key: &str) -> Option<Vec<usize>> {
        self.index.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(route_id: &str, trip_id: &str) -> Result<Trip> {
        Ok(Trip {
            trip_id: trip_id.into(),
            route_id: route_id.into(),
            service_id: "S1".into(),
        })
    }

    #[test]
    fn groups_positions_by_route_in_file_order() {
        let table = TripTable::build(
            vec![trip("R1", "T1"), trip("R2", "T2"), trip("R1", "T3")],
            0,
        )
        .unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.key_count(), 2);
        assert_eq!(table.positions("R1"), Some(&[0, 2][..]));
        assert_eq!(table.positions("R2"), Some(&[1][..]));
        assert_eq!(table.positions("R3"), None);
    }

    #[test]
    fn repeated_rows_are_not_deduplicated() {
        let table = TripTable::build(vec![trip("R1", "T1"), trip("R1", "T1")], 0).unwrap();
        let ids: Vec<_> = table.rows_for("R1").map(|t| t.trip_id.as_str()).collect();
        assert_eq!(ids, ["T1", "T1"]);
    }

    #[test]
    fn every_position_is_in_bounds() {
        let table = TripTable::build(
            (0..50).map(|i| trip(&format!("R{}", i % 7), &format!("T{i}"))),
            8,
        )
        .unwrap();
        let keys: Vec<String> = table.keys().map(str::to_owned).collect();
        for key in keys {
            for &ix in table.positions(&key).unwrap() {
                assert_eq!(table.get(ix).unwrap().route_id, key);
            }
        }
    }

    #[test]
    fn first_error_aborts_the_build() {
        let rows = vec![
            trip("R1", "T1"),
            Err(crate::error::LoadError::Format {
                path: "trips.txt".into(),
                line: 3,
                reason: "short".into(),
            }),
        ];
        assert!(TripTable::build(rows, 0).is_err());
    }

    #[test]
    fn unknown_key_yields_no_rows() {
        let table = TripTable::build(vec![trip("R1", "T1")], 0).unwrap();
        assert_eq!(table.rows_for("nope").count(), 0);
    }
}
