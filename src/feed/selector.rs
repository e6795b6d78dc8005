use crate::feed::variant::Variant;
use crate::gtfs::error::Error;
use crate::gtfs::layout::RouteColumns;
use crate::gtfs::source::{FeedSource, ROUTES};
use crate::gtfs::structs::{Id, Route};

use std::collections::BTreeMap;

/// Read routes.txt and keep the routes whose type belongs to `variant`.
///
/// # Parameters
/// - `source`: The feed to read from
/// - `cols`: Column layout of routes.txt
/// - `variant`: Decides which route types are kept
/// - `include_shuttles`: Keep bus replacement shuttles instead of dropping them
///
/// # Returns
/// Selected routes keyed by route id. Rows with a missing id or an
/// unparseable or unknown mode code are left out.
pub fn select_routes(
    source: &mut FeedSource,
    cols: &RouteColumns,
    variant: Variant,
    include_shuttles: bool,
) -> Result<BTreeMap<String, Route>, Error> {
    let mut routes = BTreeMap::new();
    let mut shuttles = 0;
    let stats = source.scan(ROUTES, cols, |row, cols| {
        let route = match Route::from_row(&row, cols) {
            Some(route) if variant.accepts(route.route_type) => route,
            _ => return false,
        };
        if !include_shuttles && variant.is_shuttle(&route) {
            shuttles += 1;
            return false;
        }
        routes.insert(route.id().to_owned(), route);
        true
    })?;
    log::info!(
        "Selected {} {} routes out of {} ({} shuttles skipped)",
        routes.len(),
        variant,
        stats.rows,
        shuttles
    );
    Ok(routes)
}
