use crate::gtfs::error::Error;
use crate::gtfs::layout::TripColumns;
use crate::gtfs::source::{FeedSource, TRIPS};
use crate::gtfs::structs::{Route, Trip};

use std::collections::{BTreeMap, HashMap, HashSet};

/// Trips and shapes of the selected routes, with the reverse lookup used to
/// join stop times back to their route.
#[derive(Debug, Default)]
pub struct TripIndex {
    /// Route id -> trip ids, in file order
    pub trips_by_route: HashMap<String, Vec<String>>,
    /// Route id -> shape ids, unique, in order of first appearance
    pub shapes_by_route: HashMap<String, Vec<String>>,
    /// Trip id -> route id
    pub route_by_trip: HashMap<String, String>,
}

impl TripIndex {
    pub fn build(
        source: &mut FeedSource,
        cols: &TripColumns,
        routes: &BTreeMap<String, Route>,
    ) -> Result<TripIndex, Error> {
        let mut index = TripIndex::default();
        let stats = source.scan(TRIPS, cols, |row, cols| {
            match Trip::from_row(&row, cols) {
                Some(trip) if routes.contains_key(&trip.route_id) => {
                    index.insert(trip);
                    true
                }
                _ => false,
            }
        })?;
        log::info!(
            "Indexed {} trips on {} routes and {} shapes from {} trip rows",
            index.route_by_trip.len(),
            index.trips_by_route.len(),
            index.needed_shapes().len(),
            stats.rows
        );
        let idle = routes.len() - index.trips_by_route.len();
        if idle > 0 {
            log::debug!("{} selected routes have no trips", idle);
        }
        Ok(index)
    }

    pub fn insert(&mut self, trip: Trip) {
        if let Some(shape_id) = trip.shape_id {
            let shapes = self
                .shapes_by_route
                .entry(trip.route_id.clone())
                .or_insert_with(Vec::new);
            if !shapes.contains(&shape_id) {
                shapes.push(shape_id);
            }
        }
        self.trips_by_route
            .entry(trip.route_id.clone())
            .or_insert_with(Vec::new)
            .push(trip.trip_id.clone());
        self.route_by_trip.insert(trip.trip_id, trip.route_id);
    }

    pub fn route_of(&self, trip_id: &str) -> Option<&str> {
        self.route_by_trip.get(trip_id).map(String::as_str)
    }

    pub fn shapes_of(&self, route_id: &str) -> &[String] {
        self.shapes_by_route
            .get(route_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every shape id referenced by a selected route
    pub fn needed_shapes(&self) -> HashSet<&str> {
        self.shapes_by_route
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }
}
