use std::f64::consts::PI;

use crate::core::{Position, EARTH_RADIUS_M};

/// Great-circle distance between two positions on a spherical Earth (m)
pub fn haversine_distance(a: Position, b: Position) -> f64 {
    let lat1_rad = a.latitude * PI / 180.0;
    let lat2_rad = b.latitude * PI / 180.0;
    let delta_lat = (b.latitude - a.latitude) * PI / 180.0;
    let delta_lon = (b.longitude - a.longitude) * PI / 180.0;

    let x = (delta_lat / 2.0).sin() * (delta_lat / 2.0).sin()
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin() * (delta_lon / 2.0).sin();
    // rounding can push antipodal pairs just past 1
    let x = x.clamp(0.0, 1.0);

    EARTH_RADIUS_M * 2.0 * x.sqrt().atan2((1.0 - x).sqrt())
}
