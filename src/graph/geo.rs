//! Distance metrics between coordinates, used to weight road segments and
//! to snap query points onto the graph.

use crate::graph::Coord;

/// Mean Earth radius in metres (IUGG)
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Great-circle distance in metres between two coordinates (haversine formula)
pub fn haversine_m(a: &Coord, b: &Coord) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlat = lat2 - lat1;
    let dlng = (b.lng() - a.lng()).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().min(1.0).asin()
}

/// Planar distance in degrees, treating latitude and longitude as cartesian axes
pub fn euclidean(a: &Coord, b: &Coord) -> f64 {
    let dlat = a.lat() - b.lat();
    let dlng = a.lng() - b.lng();
    (dlat * dlat + dlng * dlng).sqrt()
}
