use crate::feed::trips::TripIndex;
use crate::gtfs::error::Error;
use crate::gtfs::layout::StopTimeColumns;
use crate::gtfs::source::{FeedSource, STOP_TIMES};
use crate::gtfs::structs::StopTime;

use std::collections::{HashMap, HashSet};

/// Stream stop_times.txt and collect, per route, the ids of the stops its trips visit.
///
/// Each row is resolved to its route through the trip -> route index in
/// constant time. Rows of trips outside the index are ignored, and marking a
/// stop twice for the same route is a no-op.
pub fn join_stop_times(
    source: &mut FeedSource,
    cols: &StopTimeColumns,
    trips: &TripIndex,
) -> Result<HashMap<String, HashSet<String>>, Error> {
    let mut stops_by_route: HashMap<String, HashSet<String>> = HashMap::new();
    let stats = source.scan(STOP_TIMES, cols, |row, cols| {
        let stop_time = match StopTime::from_row(&row, cols) {
            Some(st) => st,
            None => return false,
        };
        let route_id = match trips.route_of(stop_time.trip_id) {
            Some(route_id) => route_id,
            None => return false,
        };
        if let Some(stops) = stops_by_route.get_mut(route_id) {
            if !stops.contains(stop_time.stop_id) {
                stops.insert(stop_time.stop_id.to_owned());
            }
        } else {
            stops_by_route.insert(
                route_id.to_owned(),
                HashSet::from([stop_time.stop_id.to_owned()]),
            );
        }
        true
    })?;
    log::info!(
        "Joined {} of {} stop times to {} routes",
        stats.kept,
        stats.rows,
        stops_by_route.len()
    );
    Ok(stops_by_route)
}
