use crate::gtfs::error::Error;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Column indices for every table the transform reads.
///
/// Columns are looked up by header name first (see [`Columns::resolve`]);
/// these indices only apply to columns the header does not name. The
/// defaults follow the column order of the GTFS reference. A feed without
/// usable headers needs a layout file overriding the affected indices, e.g.
///
/// ```json
/// { "routes": { "route_type": 6 } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    pub routes: RouteColumns,
    pub trips: TripColumns,
    pub stops: StopColumns,
    pub stop_times: StopTimeColumns,
    pub shapes: ShapeColumns,
}

impl Layout {
    /// Load a layout from a JSON file. Indices missing from the file keep their default.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Layout, Error> {
        let p = path.as_ref();
        let raw = std::fs::read_to_string(p).map_err(|e| Error::NamedFileIO {
            file_name: format!("{}", p.display()),
            source: Box::new(e),
        })?;
        serde_json::from_str(&raw).map_err(|e| Error::Layout {
            path: format!("{}", p.display()),
            source: e,
        })
    }
}

/// https://gtfs.org/documentation/schedule/reference/#routestxt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteColumns {
    pub route_id: usize,
    pub route_short_name: usize,
    pub route_long_name: usize,
    pub route_type: usize,
}

impl Default for RouteColumns {
    fn default() -> Self {
        RouteColumns {
            route_id: 0,
            route_short_name: 2,
            route_long_name: 3,
            route_type: 5,
        }
    }
}

/// https://gtfs.org/documentation/schedule/reference/#tripstxt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripColumns {
    pub route_id: usize,
    pub trip_id: usize,
    pub shape_id: usize,
}

impl Default for TripColumns {
    fn default() -> Self {
        TripColumns {
            route_id: 0,
            trip_id: 2,
            shape_id: 7,
        }
    }
}

/// https://gtfs.org/documentation/schedule/reference/#stopstxt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopColumns {
    pub stop_id: usize,
    pub stop_name: usize,
    pub stop_lat: usize,
    pub stop_lon: usize,
}

impl Default for StopColumns {
    fn default() -> Self {
        StopColumns {
            stop_id: 0,
            stop_name: 2,
            stop_lat: 5,
            stop_lon: 6,
        }
    }
}

/// https://gtfs.org/documentation/schedule/reference/#stop_timestxt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopTimeColumns {
    pub trip_id: usize,
    pub stop_id: usize,
    pub stop_sequence: usize,
}

impl Default for StopTimeColumns {
    fn default() -> Self {
        StopTimeColumns {
            trip_id: 0,
            stop_id: 3,
            stop_sequence: 4,
        }
    }
}

/// https://gtfs.org/documentation/schedule/reference/#shapestxt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeColumns {
    pub shape_id: usize,
    pub shape_pt_lat: usize,
    pub shape_pt_lon: usize,
    pub shape_pt_sequence: usize,
    pub shape_dist_traveled: usize,
}

impl Default for ShapeColumns {
    fn default() -> Self {
        ShapeColumns {
            shape_id: 0,
            shape_pt_lat: 1,
            shape_pt_lon: 2,
            shape_pt_sequence: 3,
            shape_dist_traveled: 4,
        }
    }
}

/// A set of column indices, each tied to the GTFS header name it reads.
pub trait Columns: Clone {
    fn slots(&mut self) -> Vec<(&mut usize, &'static str)>;

    /// Point every column at the position of its name in `headers`. Columns
    /// whose name is absent keep their index and are returned as missing.
    fn resolve(&self, headers: &[String]) -> (Self, Vec<(usize, &'static str)>) {
        let mut resolved = self.clone();
        let mut missing = Vec::new();
        for (idx, name) in resolved.slots() {
            match headers.iter().position(|h| h == name) {
                Some(pos) => *idx = pos,
                None => missing.push((*idx, name)),
            }
        }
        (resolved, missing)
    }
}

impl Columns for RouteColumns {
    fn slots(&mut self) -> Vec<(&mut usize, &'static str)> {
        vec![
            (&mut self.route_id, "route_id"),
            (&mut self.route_short_name, "route_short_name"),
            (&mut self.route_long_name, "route_long_name"),
            (&mut self.route_type, "route_type"),
        ]
    }
}

impl Columns for TripColumns {
    fn slots(&mut self) -> Vec<(&mut usize, &'static str)> {
        vec![
            (&mut self.route_id, "route_id"),
            (&mut self.trip_id, "trip_id"),
            (&mut self.shape_id, "shape_id"),
        ]
    }
}

impl Columns for StopColumns {
    fn slots(&mut self) -> Vec<(&mut usize, &'static str)> {
        vec![
            (&mut self.stop_id, "stop_id"),
            (&mut self.stop_name, "stop_name"),
            (&mut self.stop_lat, "stop_lat"),
            (&mut self.stop_lon, "stop_lon"),
        ]
    }
}

impl Columns for StopTimeColumns {
    fn slots(&mut self) -> Vec<(&mut usize, &'static str)> {
        vec![
            (&mut self.trip_id, "trip_id"),
            (&mut self.stop_id, "stop_id"),
            (&mut self.stop_sequence, "stop_sequence"),
        ]
    }
}

impl Columns for ShapeColumns {
    fn slots(&mut self) -> Vec<(&mut usize, &'static str)> {
        vec![
            (&mut self.shape_id, "shape_id"),
            (&mut self.shape_pt_lat, "shape_pt_lat"),
            (&mut self.shape_pt_lon, "shape_pt_lon"),
            (&mut self.shape_pt_sequence, "shape_pt_sequence"),
            (&mut self.shape_dist_traveled, "shape_dist_traveled"),
        ]
    }
}
