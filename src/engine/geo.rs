//! Great-circle distance between pickup and delivery sites.

use crate::types::GeoPoint;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers.
///
/// # Example
///
/// ```
/// use foodbridge_engine::engine::geo::haversine_km;
/// use foodbridge_engine::types::GeoPoint;
///
/// let berlin = GeoPoint::new(52.52, 13.405);
/// let potsdam = GeoPoint::new(52.3906, 13.0645);
/// let d = haversine_km(berlin, potsdam);
/// assert!(d > 26.0 && d < 28.0);
/// ```
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

// ============================================================================
// Unit Tests
// ============================================================================
