//! Distance between geographic fixes
//!
//! Two views of the separation between fixes:
//! - great-circle distance over a spherical WGS84 earth, used by the
//!   arbitration policy's movement check
//! - local tangent-plane (East-North-Up) displacement for consumers that
//!   want a movement vector, valid for the short baselines the policy
//!   operates on

use nalgebra::Vector3;

use crate::core::{LocationFix, EARTH_RADIUS_WGS84};

/// Great-circle distance between two fixes in meters (haversine)
pub fn great_circle_m(a: &LocationFix, b: &LocationFix) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();

    EARTH_RADIUS_WGS84 * c
}

/// East-North-Up displacement from `from` to `to` in meters
///
/// Small-angle tangent-plane approximation centered on `from`. The up
/// component is always zero; fixes carry no altitude.
pub fn enu_displacement(from: &LocationFix, to: &LocationFix) -> Vector3<f64> {
    let ref_lat = from.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let east = dlon * ref_lat.cos() * EARTH_RADIUS_WGS84;
    let north = dlat * EARTH_RADIUS_WGS84;

    Vector3::new(east, north, 0.0)
}

/// Euclidean length of the tangent-plane displacement in meters
pub fn enu_distance_m(from: &LocationFix, to: &LocationFix) -> f64 {
    enu_displacement(from, to).norm()
}
