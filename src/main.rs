use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use route_schedules::{Dataset, LoadOptions};
use simple_logger::SimpleLogger;

mod cli;
mod server;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    SimpleLogger::new().with_level(cli.log_level.into()).init()?;

    // Nothing is served unless the whole feed loads.
    let data = load(&cli)?;

    match cli.command {
        Commands::Serve { host, port } => server::run(Arc::new(data), &host, port).await,
        Commands::Lookup { route_id, pretty } => {
            let trips = data.lookup(&route_id);
            let json = if pretty {
                serde_json::to_string_pretty(&trips)?
            } else {
                serde_json::to_string(&trips)?
            };
            println!("{json}");
            Ok(())
        }
        Commands::Stats => {
            println!("routes:     {}", data.route_count());
            println!("trips:      {}", data.trip_count());
            println!("stop_times: {}", data.stop_time_count());
            if data.orphans_dropped() > 0 {
                println!("dropped:    {}", data.orphans_dropped());
            }
            Ok(())
        }
        Commands::Bench { iterations, routes } => bench(&data, iterations, &routes),
    }
}

fn load(cli: &Cli) -> Result<Dataset> {
    let trips = cli.trips_path();
    let stop_times = cli.stop_times_path();
    let options = LoadOptions::default().orphans(cli.orphans.into());

    log::info!("Loading {:?} and {:?}", trips, stop_times);
    let now = Instant::now();
    let data = Dataset::load_with(&trips, &stop_times, &options)
        .with_context(|| format!("loading schedule from {:?} and {:?}", trips, stop_times))?;
    log::info!(
        "Loaded {} trips on {} routes with {} stop_times in {} ms",
        data.trip_count(),
        data.route_count(),
        data.stop_time_count(),
        now.elapsed().as_millis()
    );
    Ok(data)
}

/// Lookup plus JSON encoding per route, which is what one request costs.
fn bench(data: &Dataset, iterations: u32, routes: &[String]) -> Result<()> {
    let routes: Vec<&str> = if routes.is_empty() {
        data.route_ids()
    } else {
        routes.iter().map(String::as_str).collect()
    };

    let now = Instant::now();
    let mut bytes = 0;
    for _ in 0..iterations {
        for route_id in &routes {
            bytes += serde_json::to_vec(&data.lookup(route_id))?.len();
        }
    }
    let elapsed = now.elapsed();

    let lookups = routes.len() as u64 * u64::from(iterations);
    println!(
        "{} lookups over {} routes in {} ms ({:.1} us each, {} bytes)",
        lookups,
        routes.len(),
        elapsed.as_millis(),
        elapsed.as_secs_f64() * 1e6 / lookups.max(1) as f64,
        bytes
    );
    Ok(())
}
