use crate::feed::trips::TripIndex;
use crate::feed::variant::Variant;
use crate::gtfs::structs::{Route, ShapePoint, Stop};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// A stop as it appears in the list of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopRecord {
    pub name: String,
    /// `[lat, lon]`, the order Leaflet expects
    pub coords: [f64; 2],
    #[serde(rename = "type")]
    pub mode: String,
    #[serde(rename = "stopId")]
    pub stop_id: String,
}

/// The path of one shape, points in sequence order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteShape {
    pub shape_id: String,
    pub coords: Vec<[f64; 2]>,
    /// Cumulative distance of each point, only when every point has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distances: Option<Vec<f64>>,
}

impl RouteShape {
    pub fn from_points(shape_id: &str, pts: &[ShapePoint]) -> RouteShape {
        RouteShape {
            shape_id: shape_id.to_owned(),
            coords: pts.iter().map(ShapePoint::lat_lon).collect(),
            distances: pts.iter().map(|pt| pt.shape_dist_traveled).collect(),
        }
    }
}

/// Everything a run writes out
#[derive(Debug, Clone, PartialEq)]
pub struct TransitData {
    pub variant: Variant,
    /// Route id -> stops, sorted by name
    pub route_stops: BTreeMap<String, Vec<StopRecord>>,
    /// Route id -> shapes, in the order trips first reference them
    pub route_shapes: BTreeMap<String, Vec<RouteShape>>,
    /// Stop id -> names of the routes serving it, rail only
    pub stop_routes: Option<BTreeMap<String, Vec<String>>>,
}

impl TransitData {
    /// Build the per-route output from the loaded tables.
    ///
    /// # Parameters
    /// - `variant`: Decides the stop labels and whether stop -> routes is built
    /// - `routes`: Selected routes keyed by id
    /// - `trips`: Trip and shape index of the selected routes
    /// - `stops`: Stops with valid coordinates keyed by id
    /// - `stops_by_route`: Stop ids visited by each route's trips
    /// - `shapes`: Sorted shape points keyed by shape id
    ///
    /// # Returns
    /// Output data holding only the routes with at least one resolved stop.
    pub fn assemble(
        variant: Variant,
        routes: &BTreeMap<String, Route>,
        trips: &TripIndex,
        stops: &HashMap<String, Stop>,
        stops_by_route: &HashMap<String, HashSet<String>>,
        shapes: &HashMap<String, Vec<ShapePoint>>,
    ) -> TransitData {
        let mut route_stops = BTreeMap::new();
        let mut route_shapes = BTreeMap::new();
        let mut stop_routes: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for (route_id, route) in routes {
            let label = variant.label(route.route_type);
            let mut records: Vec<StopRecord> = stops_by_route
                .get(route_id)
                .into_iter()
                .flatten()
                .filter_map(|stop_id| stops.get(stop_id))
                .map(|stop| StopRecord {
                    name: stop.stop_name.clone(),
                    coords: [stop.lat(), stop.lon()],
                    mode: label.to_owned(),
                    stop_id: stop.stop_id.clone(),
                })
                .collect();
            if records.is_empty() {
                log::debug!("Route {} has no resolved stops, skipping", route_id);
                continue;
            }
            records.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.stop_id.cmp(&b.stop_id)));

            if variant.emits_stop_routes() {
                for record in records.iter() {
                    stop_routes
                        .entry(record.stop_id.clone())
                        .or_default()
                        .insert(route.display_name().to_owned());
                }
            }

            let paths: Vec<RouteShape> = trips
                .shapes_of(route_id)
                .iter()
                .filter_map(|shape_id| {
                    shapes
                        .get(shape_id)
                        .map(|pts| RouteShape::from_points(shape_id, pts))
                })
                .collect();
            if !paths.is_empty() {
                route_shapes.insert(route_id.clone(), paths);
            }
            route_stops.insert(route_id.clone(), records);
        }

        let stop_routes = if variant.emits_stop_routes() {
            Some(
                stop_routes
                    .into_iter()
                    .map(|(stop_id, names)| (stop_id, names.into_iter().collect()))
                    .collect(),
            )
        } else {
            None
        };

        TransitData {
            variant,
            route_stops,
            route_shapes,
            stop_routes,
        }
    }

    /// Stops served by more than one route, rail only
    pub fn multi_route_stops(&self) -> usize {
        self.stop_routes
            .as_ref()
            .map(|m| m.values().filter(|names| names.len() > 1).count())
            .unwrap_or(0)
    }

    pub fn print_stats(&self) {
        let with_both = self
            .route_stops
            .keys()
            .filter(|id| self.route_shapes.contains_key(*id))
            .count();
        log::info!("Generated {} data:", self.variant);
        log::info!("  Routes with stops: {}", self.route_stops.len());
        log::info!("  Routes with shapes: {}", self.route_shapes.len());
        log::info!("  Routes with both stops and shapes: {}", with_both);
        log::info!("  Routes with stops only: {}", self.route_stops.len() - with_both);
        if let Some(stop_routes) = &self.stop_routes {
            log::info!(
                "  Stops served by several routes: {} of {}",
                self.multi_route_stops(),
                stop_routes.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs::structs::{RouteType, Trip};
    use geo_types::Point;

    fn route(id: &str, name: &str, route_type: RouteType) -> (String, Route) {
        (
            id.to_owned(),
            Route {
                route_id: id.to_owned(),
                route_short_name: None,
                route_long_name: Some(name.to_owned()),
                route_type,
            },
        )
    }

    fn stop(id: &str, name: &str, lat: f64, lon: f64) -> (String, Stop) {
        (
            id.to_owned(),
            Stop {
                stop_id: id.to_owned(),
                stop_name: name.to_owned(),
                geom: Point::new(lon, lat),
            },
        )
    }

    fn point(shape_id: &str, seq: u32, dist: Option<f64>) -> ShapePoint {
        ShapePoint {
            shape_id: shape_id.to_owned(),
            geom: Point::new(-71.0, seq as f64),
            shape_pt_sequence: seq,
            shape_dist_traveled: dist,
        }
    }

    #[test]
    fn stops_are_sorted_and_unresolved_routes_dropped() {
        let routes = BTreeMap::from([
            route("71", "Watertown Sq - Harvard", RouteType::Bus),
            route("73", "Waverley Sq - Harvard", RouteType::Bus),
        ]);
        let stops = HashMap::from([
            stop("S1", "Harvard Station", 42.3734, -71.1189),
            stop("S2", "Belmont St @ Common St", 42.38, -71.17),
        ]);
        let stops_by_route = HashMap::from([
            (
                "71".to_owned(),
                HashSet::from(["S1".to_owned(), "S2".to_owned(), "GONE".to_owned()]),
            ),
            ("73".to_owned(), HashSet::from(["GONE".to_owned()])),
        ]);
        let data = TransitData::assemble(
            Variant::Bus,
            &routes,
            &TripIndex::default(),
            &stops,
            &stops_by_route,
            &HashMap::new(),
        );
        assert_eq!(data.route_stops.keys().collect::<Vec<_>>(), vec!["71"]);
        let names: Vec<&str> = data.route_stops["71"].iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Belmont St @ Common St", "Harvard Station"]);
        assert_eq!(
            data.route_stops["71"][1],
            StopRecord {
                name: "Harvard Station".to_owned(),
                coords: [42.3734, -71.1189],
                mode: "Bus".to_owned(),
                stop_id: "S1".to_owned(),
            }
        );
        assert!(data.stop_routes.is_none());
        assert!(data.route_shapes.is_empty());
    }

    #[test]
    fn shapes_follow_first_seen_order_with_optional_distances() {
        let routes = BTreeMap::from([route("Red", "Red Line", RouteType::Subway)]);
        let stops = HashMap::from([stop("S1", "Alewife", 42.39, -71.14)]);
        let stops_by_route =
            HashMap::from([("Red".to_owned(), HashSet::from(["S1".to_owned()]))]);
        let mut trips = TripIndex::default();
        for (trip_id, shape_id) in [("T1", "b"), ("T2", "a"), ("T3", "missing")] {
            trips.insert(Trip {
                route_id: "Red".to_owned(),
                trip_id: trip_id.to_owned(),
                shape_id: Some(shape_id.to_owned()),
            });
        }
        let shapes = HashMap::from([
            ("a".to_owned(), vec![point("a", 1, Some(0.0)), point("a", 2, Some(1.5))]),
            ("b".to_owned(), vec![point("b", 1, Some(0.0)), point("b", 2, None)]),
        ]);
        let data = TransitData::assemble(
            Variant::Subway,
            &routes,
            &trips,
            &stops,
            &stops_by_route,
            &shapes,
        );
        let paths = &data.route_shapes["Red"];
        assert_eq!(
            paths.iter().map(|s| s.shape_id.as_str()).collect::<Vec<_>>(),
            vec!["b", "a"]
        );
        assert_eq!(paths[0].distances, None);
        assert_eq!(paths[1].distances, Some(vec![0.0, 1.5]));
        assert_eq!(paths[1].coords, vec![[1.0, -71.0], [2.0, -71.0]]);
    }

    #[test]
    fn rail_maps_stops_to_serving_routes() {
        let routes = BTreeMap::from([
            route("Red", "Red Line", RouteType::Subway),
            route("Orange", "Orange Line", RouteType::Subway),
            route("CR-Fitchburg", "Fitchburg Line", RouteType::Rail),
        ]);
        let stops = HashMap::from([
            stop("place-dwnxg", "Downtown Crossing", 42.3555, -71.0605),
            stop("place-portr", "Porter", 42.3884, -71.1191),
        ]);
        let stops_by_route = HashMap::from([
            (
                "Red".to_owned(),
                HashSet::from(["place-dwnxg".to_owned(), "place-portr".to_owned()]),
            ),
            ("Orange".to_owned(), HashSet::from(["place-dwnxg".to_owned()])),
            ("CR-Fitchburg".to_owned(), HashSet::from(["place-portr".to_owned()])),
        ]);
        let data = TransitData::assemble(
            Variant::Rail,
            &routes,
            &TripIndex::default(),
            &stops,
            &stops_by_route,
            &HashMap::new(),
        );
        let stop_routes = data.stop_routes.as_ref().unwrap();
        assert_eq!(stop_routes["place-dwnxg"], vec!["Orange Line", "Red Line"]);
        assert_eq!(stop_routes["place-portr"], vec!["Fitchburg Line", "Red Line"]);
        assert_eq!(data.multi_route_stops(), 2);
        assert_eq!(data.route_stops["CR-Fitchburg"][0].mode, "Commuter Rail");
        assert_eq!(data.route_stops["Red"][0].mode, "Subway");
    }
}
