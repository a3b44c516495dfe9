//! Great-circle distance via the haversine formula.
//!
//! All tour legs are straight-line estimates over a spherical Earth; roads
//! and flight paths are out of scope.

use crate::planner::PlanError;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two `(lat, lon)` points, in kilometers.
///
/// Inputs are degrees. Rejects non-finite coordinates with
/// [`PlanError::InvalidCoordinate`]; symmetric up to floating-point rounding.
pub fn distance_km(from: (f64, f64), to: (f64, f64)) -> Result<f64, PlanError> {
    let (lat1, lon1) = check_finite(from)?;
    let (lat2, lon2) = check_finite(to)?;

    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    Ok(EARTH_RADIUS_KM * c)
}

fn check_finite(point: (f64, f64)) -> Result<(f64, f64), PlanError> {
    if point.0.is_finite() && point.1.is_finite() {
        Ok(point)
    } else {
        Err(PlanError::InvalidCoordinate {
            lat: point.0,
            lon: point.1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let dist = distance_km((36.1, -115.1), (36.1, -115.1)).unwrap();
        assert!(dist < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_known_distance() {
        // Las Vegas (36.17, -115.14) to Los Angeles (34.05, -118.24)
        // Actual distance ~370 km
        let dist = distance_km((36.17, -115.14), (34.05, -118.24)).unwrap();
        assert!(
            dist > 350.0 && dist < 400.0,
            "LV to LA should be ~370km, got {}",
            dist
        );
    }

    #[test]
    fn test_symmetric() {
        let ab = distance_km((36.17, -115.14), (34.05, -118.24)).unwrap();
        let ba = distance_km((34.05, -118.24), (36.17, -115.14)).unwrap();
        assert!((ab - ba).abs() < 1e-9, "Distance should be symmetric");
    }

    #[test]
    fn test_antipodal_near_half_circumference() {
        let dist = distance_km((0.0, 0.0), (0.0, 180.0)).unwrap();
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((dist - half_circumference).abs() < 1.0);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        assert!(matches!(
            distance_km((f64::NAN, 0.0), (0.0, 0.0)),
            Err(PlanError::InvalidCoordinate { .. })
        ));
        assert!(matches!(
            distance_km((0.0, 0.0), (0.0, f64::INFINITY)),
            Err(PlanError::InvalidCoordinate { .. })
        ));
    }
}
