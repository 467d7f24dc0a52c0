use std::{
    fs::File,
    io::Read,
    marker::PhantomData,
    path::{Path, PathBuf},
};

use csv::{StringRecord, StringRecordsIntoIter};

use crate::error::{LoadError, Result};
use crate::gtfs::Row;

/// Lazily yields typed rows from a comma-delimited file whose first line is a header.
///
/// The header is checked once on open; after that fields are only read by
/// position. The underlying reader is owned by the iterator and released when
/// it is dropped, whether or not it was fully drained.
pub struct RecordReader<T, R = File> {
    path: PathBuf,
    records: StringRecordsIntoIter<R>,
    _row: PhantomData<T>,
}

impl<T, R> std::fmt::Debug for RecordReader<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordReader")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<T: Row> RecordReader<T> {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_reader(path, file)
    }
}

impl<T: Row, R: Read> RecordReader<T, R> {
    /// `path` only labels errors; nothing is opened.
    pub fn from_reader(path: impl Into<PathBuf>, reader: R) -> Result<Self> {
        let path = path.into();
        let mut records = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();

        match records.next() {
            Some(Ok(header)) => check_header(&path, &header, T::COLUMNS)?,
            Some(Err(source)) => return Err(LoadError::Csv { path, source }),
            None => {
                return Err(LoadError::Format {
                    path,
                    line: 1,
                    reason: "missing header row".into(),
                })
            }
        }

        Ok(Self {
            path,
            records,
            _row: PhantomData,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T: Row, R: Read> Iterator for RecordReader<T, R> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(source) => {
                return Some(Err(LoadError::Csv {
                    path: self.path.clone(),
                    source,
                }))
            }
        };

        if record.len() < T::COLUMNS.len() {
            return Some(Err(LoadError::Format {
                path: self.path.clone(),
                line: record.position().map_or(0, |pos| pos.line()),
                reason: format!(
                    "expected {} fields, found {}",
                    T::COLUMNS.len(),
                    record.len()
                ),
            }));
        }

        Some(Ok(T::from_record(&record)))
    }
}

fn check_header(path: &Path, header: &StringRecord, expected: &[&str]) -> Result<()> {
    // Only the leading columns are fixed; feeds routinely append more.
    let matches = header.len() >= expected.len()
        && header
            .iter()
            .zip(expected)
            .enumerate()
            .all(|(ix, (found, want))| {
                let found = if ix == 0 {
                    found.trim_start_matches('\u{feff}')
                } else {
                    found
                };
                found == *want
            });

    if matches {
        Ok(())
    } else {
        Err(LoadError::Format {
            path: path.to_owned(),
            line: 1,
            reason: format!(
                "unexpected header {:?}, expected {:?}",
                header.iter().collect::<Vec<_>>(),
                expected
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs::{StopTime, Trip};

    fn trips(text: &str) -> Result<Vec<Trip>> {
        RecordReader::<Trip, _>::from_reader("trips.txt", text.as_bytes())?.collect()
    }

    #[test]
    fn reads_rows_in_file_order() {
        let rows = trips("route_id,service_id,trip_id\nR1,S1,T1\nR2,S1,T2\n").unwrap();
        let ids: Vec<_> = rows.iter().map(|trip| trip.trip_id.as_str()).collect();
        assert_eq!(ids, ["T1", "T2"]);
        assert_eq!(rows[1].route_id, "R2");
    }

    #[test]
    fn swapped_header_is_rejected() {
        let err = trips("service_id,route_id,trip_id\nS1,R1,T1\n").unwrap_err();
        assert!(err.is_format());
        assert!(matches!(err, LoadError::Format { line: 1, .. }));
    }

    #[test]
    fn empty_file_is_rejected() {
        let err = trips("").unwrap_err();
        assert!(matches!(err, LoadError::Format { line: 1, .. }));
    }

    #[test]
    fn extra_columns_are_ignored() {
        let rows = trips(
            "route_id,service_id,trip_id,trip_headsign\nR1,S1,T1,Alewife\n",
        )
        .unwrap();
        assert_eq!(rows[0].trip_id, "T1");
    }

    #[test]
    fn byte_order_mark_is_tolerated() {
        let rows = trips("\u{feff}route_id,service_id,trip_id\nR1,S1,T1\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn short_row_reports_its_line() {
        let text = "trip_id,arrival_time,departure_time,stop_id\n\
                    T1,08:00:00,08:00:30,STOP_A\n\
                    T1,08:05:00\n";
        let result: Result<Vec<StopTime>> =
            RecordReader::<StopTime, _>::from_reader("stop_times.txt", text.as_bytes())
                .unwrap()
                .collect();
        match result {
            Err(LoadError::Format { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = RecordReader::<Trip>::from_path("does/not/exist/trips.txt").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(!err.is_format());
    }
}
