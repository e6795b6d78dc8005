pub mod feed;
pub mod gtfs;
