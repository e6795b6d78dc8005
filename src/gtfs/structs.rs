use crate::gtfs::layout::{RouteColumns, ShapeColumns, StopColumns, StopTimeColumns, TripColumns};
use crate::gtfs::reader::Row;

use geo_types::Point;
use std::fmt;

pub trait Id {
    fn id(&self) -> &str;
}

/// A transportation route.
/// https://gtfs.org/documentation/schedule/reference/#routestxt
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub route_id: String,
    pub route_short_name: Option<String>,
    pub route_long_name: Option<String>,
    pub route_type: RouteType,
}

impl Id for Route {
    fn id(&self) -> &str {
        &self.route_id
    }
}

impl Route {
    /// Returns `None` when the id is empty or the mode code is not a known route type.
    pub fn from_row(row: &Row, cols: &RouteColumns) -> Option<Route> {
        let route_type = row
            .parse::<u16>(cols.route_type)
            .and_then(|code| RouteType::try_from(code).ok())?;
        Some(Route {
            route_id: row.non_empty(cols.route_id)?.to_owned(),
            route_short_name: row.non_empty(cols.route_short_name).map(String::from),
            route_long_name: row.non_empty(cols.route_long_name).map(String::from),
            route_type,
        })
    }

    /// Long name, falling back to the short name and then to the id
    pub fn display_name(&self) -> &str {
        self.route_long_name
            .as_deref()
            .or(self.route_short_name.as_deref())
            .unwrap_or(&self.route_id)
    }
}

/// Type of transportation used on a route, from its `route_type` code.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum RouteType {
    Tram,
    Subway,
    Rail,
    Bus,
    Ferry,
    CableTram,
    AerialLift,
    Funicular,
    Trolleybus,
    Monorail,
}

impl RouteType {
    pub fn code(&self) -> u16 {
        match self {
            RouteType::Tram => 0,
            RouteType::Subway => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::CableTram => 5,
            RouteType::AerialLift => 6,
            RouteType::Funicular => 7,
            RouteType::Trolleybus => 11,
            RouteType::Monorail => 12,
        }
    }
}

impl TryFrom<u16> for RouteType {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(RouteType::Tram),
            1 => Ok(RouteType::Subway),
            2 => Ok(RouteType::Rail),
            3 => Ok(RouteType::Bus),
            4 => Ok(RouteType::Ferry),
            5 => Ok(RouteType::CableTram),
            6 => Ok(RouteType::AerialLift),
            7 => Ok(RouteType::Funicular),
            11 => Ok(RouteType::Trolleybus),
            12 => Ok(RouteType::Monorail),
            other => Err(other),
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

/// A scheduled trip for a route.
/// https://gtfs.org/documentation/schedule/reference/#tripstxt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub route_id: String,
    pub trip_id: String,
    pub shape_id: Option<String>,
}

impl Id for Trip {
    fn id(&self) -> &str {
        &self.trip_id
    }
}

impl Trip {
    pub fn from_row(row: &Row, cols: &TripColumns) -> Option<Trip> {
        Some(Trip {
            route_id: row.non_empty(cols.route_id)?.to_owned(),
            trip_id: row.non_empty(cols.trip_id)?.to_owned(),
            shape_id: row.non_empty(cols.shape_id).map(String::from),
        })
    }
}

/// A physical stop, station, or area.
/// https://gtfs.org/documentation/schedule/reference/#stopstxt
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub stop_id: String,
    pub stop_name: String,
    /// x is the longitude, y the latitude
    pub geom: Point<f64>,
}

impl Id for Stop {
    fn id(&self) -> &str {
        &self.stop_id
    }
}

impl Stop {
    /// Rows without a finite coordinate pair are rejected.
    pub fn from_row(row: &Row, cols: &StopColumns) -> Option<Stop> {
        let lat = row.parse_finite(cols.stop_lat)?;
        let lon = row.parse_finite(cols.stop_lon)?;
        Some(Stop {
            stop_id: row.non_empty(cols.stop_id)?.to_owned(),
            stop_name: row.get(cols.stop_name).unwrap_or_default().to_owned(),
            geom: Point::new(lon, lat),
        })
    }

    pub fn lat(&self) -> f64 {
        self.geom.y()
    }

    pub fn lon(&self) -> f64 {
        self.geom.x()
    }
}

/// Scheduled stop time for a trip, borrowed from the row it was read from.
/// https://gtfs.org/documentation/schedule/reference/#stop_timestxt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTime<'r> {
    pub trip_id: &'r str,
    pub stop_id: &'r str,
    pub stop_sequence: Option<u32>,
}

impl<'r> StopTime<'r> {
    pub fn from_row(row: &Row<'r>, cols: &StopTimeColumns) -> Option<StopTime<'r>> {
        Some(StopTime {
            trip_id: row.non_empty(cols.trip_id)?,
            stop_id: row.non_empty(cols.stop_id)?,
            stop_sequence: row.parse(cols.stop_sequence),
        })
    }
}

/// Shape point that defines the path of a route.
/// https://gtfs.org/documentation/schedule/reference/#shapestxt
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePoint {
    pub shape_id: String,
    /// x is the longitude, y the latitude
    pub geom: Point<f64>,
    pub shape_pt_sequence: u32,
    pub shape_dist_traveled: Option<f64>,
}

impl Id for ShapePoint {
    fn id(&self) -> &str {
        &self.shape_id
    }
}

impl ShapePoint {
    /// An unparseable distance is treated as absent; any other bad field rejects the point.
    pub fn from_row(row: &Row, cols: &ShapeColumns) -> Option<ShapePoint> {
        let lat = row.parse_finite(cols.shape_pt_lat)?;
        let lon = row.parse_finite(cols.shape_pt_lon)?;
        Some(ShapePoint {
            shape_id: row.non_empty(cols.shape_id)?.to_owned(),
            geom: Point::new(lon, lat),
            shape_pt_sequence: row.parse(cols.shape_pt_sequence)?,
            shape_dist_traveled: row.parse_finite(cols.shape_dist_traveled),
        })
    }

    pub fn lat_lon(&self) -> [f64; 2] {
        [self.geom.y(), self.geom.x()]
    }
}
