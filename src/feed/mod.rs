pub mod assemble;
pub mod error;
pub mod output;
pub mod selector;
pub mod shapes;
pub mod stop_times;
pub mod stops;
pub mod trips;
pub mod variant;

use std::path::Path;
use std::time::Instant;

use crate::gtfs::layout::Layout;
use crate::gtfs::source::FeedSource;

use assemble::TransitData;
use error::Error;
use trips::TripIndex;
use variant::Variant;

/// Settings of one transform run
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub variant: Variant,
    pub layout: Layout,
    pub include_shuttles: bool,
}

impl TransformOptions {
    pub fn new(variant: Variant) -> TransformOptions {
        TransformOptions {
            variant,
            layout: Layout::default(),
            include_shuttles: false,
        }
    }
}

/// Run the whole pipeline against a feed and return the assembled data.
///
/// Tables are read one after the other: routes, trips, stops, stop_times and
/// finally the shapes the selected routes reference. Only a table that
/// cannot be opened or read aborts the run; bad rows are skipped.
pub fn transform<P: AsRef<Path>>(
    gtfs_path: P,
    options: &TransformOptions,
) -> Result<TransitData, Error> {
    let start = Instant::now();
    let layout = &options.layout;
    let mut source = FeedSource::from_path(gtfs_path)?;

    let routes = selector::select_routes(
        &mut source,
        &layout.routes,
        options.variant,
        options.include_shuttles,
    )?;
    let trips = TripIndex::build(&mut source, &layout.trips, &routes)?;
    let stops = stops::load_stops(&mut source, &layout.stops)?;
    let stops_by_route = stop_times::join_stop_times(&mut source, &layout.stop_times, &trips)?;
    let shapes = shapes::load_shapes(&mut source, &layout.shapes, &trips.needed_shapes())?;

    let data = TransitData::assemble(
        options.variant,
        &routes,
        &trips,
        &stops,
        &stops_by_route,
        &shapes,
    );
    log::debug!("Transform done in {}ms", start.elapsed().as_millis());
    Ok(data)
}
