use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(format!(
                "Invalid latitude: {} (must be between -90 and 90)",
                lat
            ));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(format!(
                "Invalid longitude: {} (must be between -180 and 180)",
                lng
            ));
        }
        Ok(Coordinates { lat, lng })
    }

    /// Calculate distance between two coordinates using Haversine formula
    /// Returns distance in kilometers
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        const EARTH_RADIUS_KM: f64 = 6371.0;

        let lat1_rad = self.lat.to_radians();
        let lat2_rad = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_validation() {
        assert!(Coordinates::new(39.9042, 116.4074).is_ok());
        assert!(Coordinates::new(91.0, 0.0).is_err()); // Invalid lat
        assert!(Coordinates::new(0.0, 181.0).is_err()); // Invalid lng
    }

    #[test]
    fn test_distance_calculation() {
        let beijing = Coordinates::new(39.9042, 116.4074).unwrap();
        let shanghai = Coordinates::new(31.2304, 121.4737).unwrap();

        let distance = beijing.distance_to(&shanghai);
        // Beijing to Shanghai is approximately 1068 km
        assert!((distance - 1068.0).abs() < 20.0);
    }

    #[test]
    fn test_distance_symmetry() {
        let a = Coordinates::new(39.9163, 116.3972).unwrap();
        let b = Coordinates::new(39.8822, 116.4066).unwrap();

        assert_eq!(a.distance_to(&b), b.distance_to(&a));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let a = Coordinates::new(48.8566, 2.3522).unwrap();
        assert_eq!(a.distance_to(&a), 0.0);
    }
}
