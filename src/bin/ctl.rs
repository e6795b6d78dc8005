use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;

use transit_feed_data::gtfs::error::Error;
use transit_feed_data::gtfs::layout::Layout;
use transit_feed_data::gtfs::reader::TableStats;
use transit_feed_data::gtfs::source::{FeedSource, ROUTES, SHAPES, STOPS, STOP_TIMES, TRIPS};
use transit_feed_data::gtfs::structs::{Route, RouteType, ShapePoint, Stop, StopTime, Trip};

#[derive(Parser, Debug)]
#[command(author, version, about = "Print row statistics of a GTFS feed", long_about = None)]
struct Args {
    #[arg(long, default_value = "mbta_gtfs")]
    gtfs_path: PathBuf,

    #[arg(long)]
    layout: Option<PathBuf>,
}

fn print_table(stats: &Result<TableStats, Error>, name: &str) {
    match stats {
        Ok(stats) => println!("  {}: {}", name, stats.summary()),
        Err(e) => println!("  {}: {}", name, e),
    }
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();
    let args = Args::parse();
    let layout = match &args.layout {
        Some(path) => Layout::from_path(path)?,
        None => Layout::default(),
    };

    println!("Reading GTFS from path: {}", args.gtfs_path.display());
    let mut source = FeedSource::from_path(&args.gtfs_path)?;

    let mut route_types: BTreeMap<RouteType, usize> = BTreeMap::new();
    let routes = source.scan(ROUTES, &layout.routes, |row, cols| {
        match Route::from_row(&row, cols) {
            Some(route) => {
                *route_types.entry(route.route_type).or_default() += 1;
                true
            }
            None => false,
        }
    });
    let trips = source.scan(TRIPS, &layout.trips, |row, cols| {
        Trip::from_row(&row, cols).is_some()
    });
    let stops = source.scan(STOPS, &layout.stops, |row, cols| {
        Stop::from_row(&row, cols).is_some()
    });
    let stop_times = source.scan(STOP_TIMES, &layout.stop_times, |row, cols| {
        StopTime::from_row(&row, cols).is_some()
    });
    let shapes = source.scan(SHAPES, &layout.shapes, |row, cols| {
        ShapePoint::from_row(&row, cols).is_some()
    });

    println!("GTFS data:");
    print_table(&routes, "Routes");
    print_table(&trips, "Trips");
    print_table(&stops, "Stops");
    print_table(&stop_times, "Stop times");
    print_table(&shapes, "Shapes");
    println!("Routes by type:");
    for (route_type, count) in route_types {
        println!("  {}: {}", route_type, count);
    }
    Ok(())
}
