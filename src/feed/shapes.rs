use crate::gtfs::error::Error;
use crate::gtfs::layout::ShapeColumns;
use crate::gtfs::source::{FeedSource, SHAPES};
use crate::gtfs::structs::ShapePoint;

use std::collections::{HashMap, HashSet};

/// A polyline needs at least two points
pub const MIN_SHAPE_POINTS: usize = 2;

/// Load the points of the shapes in `needed`, sorted by sequence.
///
/// # Parameters
/// - `source`: The feed to read from
/// - `cols`: Column layout of shapes.txt
/// - `needed`: Shape ids referenced by the selected routes
///
/// # Returns
/// Shape id -> points in ascending `shape_pt_sequence`. Rows of other shapes
/// are skipped before any numeric field is parsed. Shapes left with fewer
/// than [`MIN_SHAPE_POINTS`] valid points are omitted. A feed without
/// shapes.txt yields an empty map.
pub fn load_shapes(
    source: &mut FeedSource,
    cols: &ShapeColumns,
    needed: &HashSet<&str>,
) -> Result<HashMap<String, Vec<ShapePoint>>, Error> {
    let mut shapes: HashMap<String, Vec<ShapePoint>> = HashMap::new();
    if needed.is_empty() {
        return Ok(shapes);
    }
    if !source.contains(SHAPES) {
        log::warn!("{} not found, routes will have no shapes", SHAPES);
        return Ok(shapes);
    }

    let stats = source.scan(SHAPES, cols, |row, cols| {
        match row.non_empty(cols.shape_id) {
            Some(shape_id) if needed.contains(shape_id) => {}
            _ => return false,
        }
        match ShapePoint::from_row(&row, cols) {
            Some(pt) => {
                shapes.entry(pt.shape_id.clone()).or_default().push(pt);
                true
            }
            None => false,
        }
    })?;

    // Stable sort, points sharing a sequence number keep their file order
    for pts in shapes.values_mut() {
        pts.sort_by_key(|pt| pt.shape_pt_sequence);
    }
    let before = shapes.len();
    shapes.retain(|_, pts| pts.len() >= MIN_SHAPE_POINTS);
    log::info!(
        "Loaded {} of {} needed shapes ({} points kept out of {} rows, {} too short)",
        shapes.len(),
        needed.len(),
        stats.kept,
        stats.rows,
        before - shapes.len()
    );
    Ok(shapes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn feed(shapes_txt: &str) -> (tempfile::TempDir, FeedSource) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SHAPES), shapes_txt).unwrap();
        let source = FeedSource::from_path(dir.path()).unwrap();
        (dir, source)
    }

    #[test]
    fn points_are_sorted_by_sequence() {
        let (_dir, mut source) = feed(
            "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence,shape_dist_traveled\n\
             s1,42.3,-71.3,3,0.3\n\
             s1,42.1,-71.1,1,0.1\n\
             s1,42.2,-71.2,2,0.2\n",
        );
        let shapes = load_shapes(&mut source, &ShapeColumns::default(), &HashSet::from(["s1"]))
            .unwrap();
        let seqs: Vec<u32> = shapes["s1"].iter().map(|p| p.shape_pt_sequence).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
        assert_eq!(shapes["s1"][0].lat_lon(), [42.1, -71.1]);
    }

    #[test]
    fn equal_sequences_keep_file_order() {
        let (_dir, mut source) = feed(
            "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\n\
             s1,1.0,1.0,5\n\
             s1,2.0,2.0,5\n\
             s1,0.0,0.0,1\n",
        );
        let shapes = load_shapes(&mut source, &ShapeColumns::default(), &HashSet::from(["s1"]))
            .unwrap();
        let lats: Vec<f64> = shapes["s1"].iter().map(|p| p.geom.y()).collect();
        assert_eq!(lats, vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn unneeded_bad_and_short_shapes_are_skipped() {
        let (_dir, mut source) = feed(
            "shape_id,shape_pt_lat,shape_pt_lon,shape_pt_sequence\n\
             other,bad,bad,bad\n\
             s1,42.1,-71.1,1\n\
             s1,oops,-71.1,2\n\
             s2,42.1,-71.1,1\n\
             s2,42.2,-71.2,2\n",
        );
        let needed = HashSet::from(["s1", "s2"]);
        let shapes = load_shapes(&mut source, &ShapeColumns::default(), &needed).unwrap();
        assert!(!shapes.contains_key("s1"));
        assert!(!shapes.contains_key("other"));
        assert_eq!(shapes["s2"].len(), 2);
    }

    #[test]
    fn missing_shapes_table_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = FeedSource::from_path(dir.path()).unwrap();
        let shapes = load_shapes(&mut source, &ShapeColumns::default(), &HashSet::from(["s1"]))
            .unwrap();
        assert!(shapes.is_empty());
    }
}
