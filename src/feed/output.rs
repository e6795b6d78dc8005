use crate::feed::assemble::{RouteShape, StopRecord, TransitData};
use crate::feed::error::Error;

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One of the structures a run declares
#[derive(serde::Serialize)]
#[serde(untagged)]
pub enum Structure<'a> {
    RouteStops(&'a BTreeMap<String, Vec<StopRecord>>),
    RouteShapes(&'a BTreeMap<String, Vec<RouteShape>>),
    StopRoutes(&'a BTreeMap<String, Vec<String>>),
}

/// Structures keyed by their constant name, serialized in declaration order
pub struct Named<'a>(pub Vec<(&'static str, Structure<'a>)>);

impl Serialize for Named<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, structure) in &self.0 {
            map.serialize_entry(name, structure)?;
        }
        map.end()
    }
}

pub fn named_structures(data: &TransitData) -> Named<'_> {
    let names = data.variant.output_names();
    let mut structures = vec![
        (names.stops_var, Structure::RouteStops(&data.route_stops)),
        (names.shapes_var, Structure::RouteShapes(&data.route_shapes)),
    ];
    if let (Some(var), Some(stop_routes)) = (names.stop_routes_var, &data.stop_routes) {
        structures.push((var, Structure::StopRoutes(stop_routes)));
    }
    Named(structures)
}

/// Render the data as JavaScript `const` declarations
pub fn to_js(data: &TransitData) -> Result<String, Error> {
    let mut out = String::new();
    for (var, structure) in named_structures(data).0 {
        out.push_str("const ");
        out.push_str(var);
        out.push_str(" = ");
        out.push_str(&serde_json::to_string_pretty(&structure)?);
        out.push_str(";\n\n");
    }
    Ok(out)
}

/// Render the data as a single JSON object keyed by the constant names
pub fn to_json(data: &TransitData) -> Result<String, Error> {
    let mut out = serde_json::to_string_pretty(&named_structures(data))?;
    out.push('\n');
    Ok(out)
}

/// Write `<stem>.js` and `<stem>.json` into `output_dir`
///
/// # Returns
/// The paths written, JavaScript first
pub fn write_outputs<P: AsRef<Path>>(
    data: &TransitData,
    output_dir: P,
) -> Result<Vec<PathBuf>, Error> {
    let stem = data.variant.output_names().file_stem;
    let dir = output_dir.as_ref();
    let outputs = [
        (dir.join(format!("{}.js", stem)), to_js(data)?),
        (dir.join(format!("{}.json", stem)), to_json(data)?),
    ];
    let mut written = Vec::new();
    for (path, contents) in outputs {
        std::fs::write(&path, contents).map_err(|e| Error::Output {
            path: format!("{}", path.display()),
            source: e,
        })?;
        log::info!("Saved {}", path.display());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::variant::Variant;
    use serde_json::Value;

    fn bus_data() -> TransitData {
        TransitData {
            variant: Variant::Bus,
            route_stops: BTreeMap::from([(
                "71".to_owned(),
                vec![StopRecord {
                    name: "Harvard Station".to_owned(),
                    coords: [42.3734, -71.1189],
                    mode: "Bus".to_owned(),
                    stop_id: "S1".to_owned(),
                }],
            )]),
            route_shapes: BTreeMap::from([(
                "71".to_owned(),
                vec![RouteShape {
                    shape_id: "710001".to_owned(),
                    coords: vec![[42.1, -71.1], [42.2, -71.2]],
                    distances: None,
                }],
            )]),
            stop_routes: None,
        }
    }

    #[test]
    fn js_declares_each_structure() {
        let js = to_js(&bus_data()).unwrap();
        assert!(js.starts_with("const mbtaBusData = {\n  \"71\": [\n"));
        assert!(js.contains("\n};\n\nconst busRouteShapes = {\n"));
        assert!(js.ends_with("};\n\n"));
        assert!(js.contains("\"type\": \"Bus\""));
        assert!(js.contains("\"stopId\": \"S1\""));
        assert!(js.contains("42.3734"));
        let name = js.find("\"name\"").unwrap();
        let coords = js.find("\"coords\"").unwrap();
        assert!(name < coords);
        assert!(!js.contains("distances"));
        assert!(!js.contains("StopRoutes"));
    }

    #[test]
    fn json_companion_parses_back() {
        let json = to_json(&bus_data()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        let stops: BTreeMap<String, Vec<StopRecord>> =
            serde_json::from_value(value["mbtaBusData"].clone()).unwrap();
        assert_eq!(stops, bus_data().route_stops);
        assert_eq!(value["busRouteShapes"]["71"][0]["shape_id"], "710001");
    }

    #[test]
    fn rail_output_includes_stop_routes() {
        let mut data = bus_data();
        data.variant = Variant::Rail;
        data.stop_routes = Some(BTreeMap::from([(
            "S1".to_owned(),
            vec!["Red Line".to_owned()],
        )]));
        let js = to_js(&data).unwrap();
        assert!(js.contains("const mbtaRailData = "));
        assert!(js.contains("const railStopRoutes = {\n  \"S1\": [\n    \"Red Line\"\n  ]\n};\n\n"));
    }

    #[test]
    fn non_ascii_names_are_not_escaped() {
        let mut data = bus_data();
        data.route_stops.get_mut("71").unwrap()[0].name = "Café Square".to_owned();
        assert!(to_js(&data).unwrap().contains("Café Square"));
    }

    #[test]
    fn outputs_are_written_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_outputs(&bus_data(), dir.path()).unwrap();
        assert_eq!(written[0], dir.path().join("mbta-bus-data.js"));
        assert_eq!(written[1], dir.path().join("mbta-bus-data.json"));
        assert!(written.iter().all(|p| p.is_file()));
    }
}
