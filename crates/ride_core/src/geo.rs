//! Coordinates, great-circle distance, and arrival estimates.
//!
//! The distance function is the standard Haversine formula (Earth radius
//! 6371 km); arrival estimates convert distance at a fixed linear rate of
//! about 2 minutes per kilometer, clamped to a minimum of one minute.

use h3o::{CellIndex, Resolution};
use serde::{Deserialize, Serialize};

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Linear conversion rate from distance to an arrival estimate.
pub const MINUTES_PER_KM: f64 = 2.0;

/// Arrival estimates never drop below one minute.
pub const MIN_ETA_MINUTES: u32 = 1;

/// H3 resolution used for spatial indexing (~240m cell size).
pub const INDEX_RESOLUTION: Resolution = Resolution::Nine;

/// A geographic coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Great-circle distance between two coordinates in kilometers.
pub fn haversine_km(a: LatLng, b: LatLng) -> f64 {
    let (lat1, lon1) = (a.latitude.to_radians(), a.longitude.to_radians());
    let (lat2, lon2) = (b.latitude.to_radians(), b.longitude.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let sin_dlat = (dlat * 0.5).sin();
    let sin_dlon = (dlon * 0.5).sin();
    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Estimated minutes to cover `distance_km`, never below [MIN_ETA_MINUTES].
pub fn eta_minutes(distance_km: f64) -> u32 {
    ((distance_km * MINUTES_PER_KM).round() as u32).max(MIN_ETA_MINUTES)
}

/// The H3 index cell containing `position`, or `None` for coordinates
/// outside the valid latitude/longitude ranges.
pub fn cell_for(position: LatLng) -> Option<CellIndex> {
    h3o::LatLng::new(position.latitude, position.longitude)
        .ok()
        .map(|c| c.to_cell(INDEX_RESOLUTION))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKET_ST: LatLng = LatLng {
        latitude: 37.7855,
        longitude: -122.4010,
    };
    const VALENCIA_ST: LatLng = LatLng {
        latitude: 37.7649,
        longitude: -122.4214,
    };

    #[test]
    fn distance_is_symmetric() {
        let ab = haversine_km(MARKET_ST, VALENCIA_ST);
        let ba = haversine_km(VALENCIA_ST, MARKET_ST);
        assert_eq!(ab, ba);
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_km(MARKET_ST, MARKET_ST), 0.0);
    }

    #[test]
    fn distance_matches_known_value() {
        // SF downtown to the Mission, roughly 2.9 km as the crow flies.
        let km = haversine_km(MARKET_ST, VALENCIA_ST);
        assert!(km > 2.5 && km < 3.5, "unexpected distance: {km}");
    }

    #[test]
    fn eta_never_below_one_minute() {
        assert_eq!(eta_minutes(0.0), 1);
        assert_eq!(eta_minutes(0.1), 1);
    }

    #[test]
    fn eta_is_monotonic_in_distance() {
        let mut last = 0;
        for tenths in 0..100 {
            let eta = eta_minutes(tenths as f64 / 10.0);
            assert!(eta >= last, "eta regressed at {tenths} tenths of a km");
            last = eta;
        }
    }

    #[test]
    fn eta_uses_two_minutes_per_km() {
        assert_eq!(eta_minutes(1.0), 2);
        assert_eq!(eta_minutes(2.5), 5);
    }

    #[test]
    fn cell_for_rejects_out_of_range_coordinates() {
        assert!(cell_for(LatLng::new(95.0, 0.0)).is_none());
        assert!(cell_for(MARKET_ST).is_some());
    }

    #[test]
    fn nearby_points_share_or_neighbor_cells() {
        let a = cell_for(MARKET_ST).expect("cell");
        let b = cell_for(LatLng::new(37.78551, -122.40101)).expect("cell");
        let dist = a.grid_distance(b).expect("grid distance");
        assert!(dist <= 1);
    }
}
