use crate::gtfs::error::Error;
use crate::gtfs::layout::StopColumns;
use crate::gtfs::source::{FeedSource, STOPS};
use crate::gtfs::structs::{Id, Stop};

use std::collections::HashMap;

/// Read every stop with a valid coordinate pair, keyed by stop id.
pub fn load_stops(
    source: &mut FeedSource,
    cols: &StopColumns,
) -> Result<HashMap<String, Stop>, Error> {
    let mut stops = HashMap::new();
    let stats = source.scan(STOPS, cols, |row, cols| {
        match Stop::from_row(&row, cols) {
            Some(stop) => {
                stops.insert(stop.id().to_owned(), stop);
                true
            }
            None => false,
        }
    })?;
    log::info!(
        "Loaded {} stops ({} rows without usable coordinates)",
        stops.len(),
        stats.rows - stats.kept
    );
    Ok(stops)
}
