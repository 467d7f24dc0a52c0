use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use route_schedules::OrphanPolicy;

#[derive(Parser)]
#[command(name = "route-schedules")]
#[command(author, version, about = "Serve per-route trip schedules from a GTFS feed")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding trips.txt and stop_times.txt
    #[arg(long, global = true, env = "SCHEDULES_DATA_DIR", default_value = "../MBTA_GTFS")]
    pub data_dir: PathBuf,

    /// Path to trips.txt, if not inside --data-dir
    #[arg(long, global = true)]
    pub trips: Option<PathBuf>,

    /// Path to stop_times.txt, if not inside --data-dir
    #[arg(long, global = true)]
    pub stop_times: Option<PathBuf>,

    /// Stop times pointing at unknown trips either fail the load or are dropped
    #[arg(long, global = true, value_enum, default_value_t = Orphans::Reject)]
    pub orphans: Orphans,

    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn trips_path(&self) -> PathBuf {
        self.trips
            .clone()
            .unwrap_or_else(|| self.data_dir.join("trips.txt"))
    }

    pub fn stop_times_path(&self) -> PathBuf {
        self.stop_times
            .clone()
            .unwrap_or_else(|| self.data_dir.join("stop_times.txt"))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the feed and serve GET /schedules/{route_id}
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "SCHEDULES_PORT", default_value = "4000")]
        port: u16,
    },

    /// Print the schedules of one route as JSON
    Lookup {
        route_id: String,

        #[arg(long)]
        pretty: bool,
    },

    /// Print row and route counts
    Stats,

    /// Time repeated lookups, over every route unless some are given
    Bench {
        #[arg(short = 'n', long, default_value = "100")]
        iterations: u32,

        routes: Vec<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Orphans {
    Reject,
    Drop,
}

impl From<Orphans> for OrphanPolicy {
    fn from(value: Orphans) -> Self {
        match value {
            Orphans::Reject => OrphanPolicy::Reject,
            Orphans::Drop => OrphanPolicy::Drop,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
