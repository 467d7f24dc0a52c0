//! In-memory index over a GTFS feed's `trips.txt` and `stop_times.txt`,
//! answering "every trip on this route, with its stops" without scanning.

pub mod dataset;
pub mod error;
pub mod gtfs;
pub mod parser;
pub mod response;
pub mod table;

pub use dataset::{Dataset, LoadOptions, OrphanPolicy};
pub use error::LoadError;
pub use response::{StopResponse, TripResponse};
