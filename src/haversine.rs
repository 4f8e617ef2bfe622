//! Great-circle distances and nearby-rickshaw search.
//!
//! Straight-line only; there is no road network behind any of this.

use rayon::prelude::*;

use crate::model::ERickshaw;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed rickshaw pace for pickup estimates (walking pace / 3).
pub const RIDE_MINUTES_PER_KM: f64 = 4.0;

/// Default search radius for nearby rickshaws.
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 2.0;

/// Haversine distance between two points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance between two points in meters.
pub fn haversine_m(from: (f64, f64), to: (f64, f64)) -> f64 {
    haversine_km(from, to) * 1000.0
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Rickshaws within `radius_km` of `user`, nearest first.
///
/// Each returned rickshaw carries a fresh `distance_km` and `eta_min`.
pub fn nearby_rickshaws(user: (f64, f64), radius_km: f64, rickshaws: &[ERickshaw]) -> Vec<ERickshaw> {
    let mut nearby: Vec<ERickshaw> = rickshaws
        .par_iter()
        .filter_map(|rickshaw| {
            let km = haversine_km(user, rickshaw.position);
            if km > radius_km {
                return None;
            }
            let mut annotated = rickshaw.clone();
            annotated.distance_km = round_to(km, 2);
            annotated.eta_min = (km * RIDE_MINUTES_PER_KM).ceil() as u32;
            Some(annotated)
        })
        .collect();

    nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    tracing::debug!(count = nearby.len(), radius_km, "nearby rickshaws");
    nearby
}
