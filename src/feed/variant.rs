use crate::gtfs::structs::{Route, RouteType};

use clap::ValueEnum;
use std::fmt;

/// Which slice of the network a run extracts. Each variant fixes the route
/// types it keeps, the label its stops carry and the names of its outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Variant {
    Bus,
    Ferry,
    Subway,
    /// Subway and light rail together with commuter rail
    Rail,
}

/// Names of the generated files and of the constants they declare
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputNames {
    pub file_stem: &'static str,
    pub stops_var: &'static str,
    pub shapes_var: &'static str,
    pub stop_routes_var: Option<&'static str>,
}

impl Variant {
    pub fn route_types(&self) -> &'static [RouteType] {
        match self {
            Variant::Bus => &[RouteType::Bus],
            Variant::Ferry => &[RouteType::Ferry],
            Variant::Subway => &[RouteType::Tram, RouteType::Subway],
            Variant::Rail => &[RouteType::Tram, RouteType::Subway, RouteType::Rail],
        }
    }

    pub fn accepts(&self, route_type: RouteType) -> bool {
        self.route_types().contains(&route_type)
    }

    /// Label attached to every stop of a route of the given type
    pub fn label(&self, route_type: RouteType) -> &'static str {
        match self {
            Variant::Bus => "Bus",
            Variant::Ferry => "Ferry",
            Variant::Subway => "Subway",
            Variant::Rail if route_type == RouteType::Rail => "Commuter Rail",
            Variant::Rail => "Subway",
        }
    }

    /// Only the rail output maps stops to the routes serving them
    pub fn emits_stop_routes(&self) -> bool {
        self.output_names().stop_routes_var.is_some()
    }

    /// Replacement shuttles share route type 3 with regular buses
    pub fn is_shuttle(&self, route: &Route) -> bool {
        *self == Variant::Bus
            && (route.display_name().to_lowercase().contains("shuttle")
                || route.route_id.contains("Shuttle-"))
    }

    pub fn output_names(&self) -> OutputNames {
        match self {
            Variant::Bus => OutputNames {
                file_stem: "mbta-bus-data",
                stops_var: "mbtaBusData",
                shapes_var: "busRouteShapes",
                stop_routes_var: None,
            },
            Variant::Ferry => OutputNames {
                file_stem: "mbta-ferry-data",
                stops_var: "mbtaFerryData",
                shapes_var: "ferryRouteShapes",
                stop_routes_var: None,
            },
            Variant::Subway => OutputNames {
                file_stem: "mbta-subway-data",
                stops_var: "mbtaSubwayData",
                shapes_var: "subwayRouteShapes",
                stop_routes_var: None,
            },
            Variant::Rail => OutputNames {
                file_stem: "mbta-rail-data",
                stops_var: "mbtaRailData",
                shapes_var: "railRouteShapes",
                stop_routes_var: Some("railStopRoutes"),
            },
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Bus => "bus",
            Variant::Ferry => "ferry",
            Variant::Subway => "subway",
            Variant::Rail => "rail",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(id: &str, long_name: &str, route_type: RouteType) -> Route {
        Route {
            route_id: id.to_owned(),
            route_short_name: None,
            route_long_name: Some(long_name.to_owned()),
            route_type,
        }
    }

    #[test]
    fn rail_labels_commuter_rail_separately() {
        assert_eq!(Variant::Rail.label(RouteType::Rail), "Commuter Rail");
        assert_eq!(Variant::Rail.label(RouteType::Subway), "Subway");
        assert_eq!(Variant::Rail.label(RouteType::Tram), "Subway");
        assert_eq!(Variant::Bus.label(RouteType::Bus), "Bus");
    }

    #[test]
    fn target_sets() {
        assert!(Variant::Bus.accepts(RouteType::Bus));
        assert!(!Variant::Bus.accepts(RouteType::Ferry));
        assert!(Variant::Subway.accepts(RouteType::Tram));
        assert!(!Variant::Subway.accepts(RouteType::Rail));
        assert!(Variant::Rail.accepts(RouteType::Rail));
        assert!(Variant::Ferry.accepts(RouteType::Ferry));
    }

    #[test]
    fn shuttles_only_matter_for_buses() {
        let shuttle = route("Shuttle-Generic", "Red Line Shuttle", RouteType::Bus);
        assert!(Variant::Bus.is_shuttle(&shuttle));
        assert!(!Variant::Bus.is_shuttle(&route("71", "Watertown Sq - Harvard", RouteType::Bus)));
        assert!(!Variant::Rail.is_shuttle(&shuttle));
    }

    #[test]
    fn only_rail_emits_stop_routes() {
        assert!(Variant::Rail.emits_stop_routes());
        assert!(!Variant::Bus.emits_stop_routes());
        assert_eq!(Variant::Ferry.output_names().file_stem, "mbta-ferry-data");
    }
}
