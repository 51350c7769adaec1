use crate::Degrees;
use crate::Miles;
use crate::EARTH_RADIUS_MILES;
use crate::UNKNOWN_DISTANCE;

/// A point on the surface of the earth.
///
/// Latitude runs from -90 (south pole) to +90 (north pole).
/// Longitude runs from -180 (inclusive) to +180 (exclusive); -180 and
/// +180 name the same meridian and we arbitrarily keep -180.
/// Longitude wraps around; latitude does not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: Degrees,
    pub long: Degrees,
}

impl Coord {
    pub fn new(lat: Degrees, long: Degrees) -> Self {
        Self { lat, long }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3},{:.3})", self.lat, self.long)
    }
}

/// Great-circle distance in miles between two coordinates.
///
/// For nearly identical points the computed cosine can drift slightly
/// above 1, which acos() rejects. Cosines within 1e-6 of unit are
/// treated as coincident points; anything further out is a numerical
/// failure and reports the unknown-distance sentinel.
pub fn sphere_dist(p: Coord, q: Coord) -> Miles {
    let p_lat = p.lat.to_radians();
    let p_long = p.long.to_radians();
    let q_lat = q.lat.to_radians();
    let q_long = q.long.to_radians();
    let anglecos =
        p_lat.sin() * q_lat.sin() + p_lat.cos() * q_lat.cos() * (q_long - p_long).cos();
    if anglecos.abs() > 1.0 {
        if anglecos.abs() > 1.000001 {
            log::warn!("out-of-range cosine {} in spherical distance", anglecos);
            return UNKNOWN_DISTANCE;
        } else {
            return 0.;
        }
    }
    EARTH_RADIUS_MILES * anglecos.acos()
}

/// Euclidean distance in degree space, as if a degree had constant
/// length both latitudinally and longitudinally.
pub fn degree_dist(p: Coord, q: Coord) -> Degrees {
    ((p.lat - q.lat).powi(2) + (p.long - q.long).powi(2)).sqrt()
}
