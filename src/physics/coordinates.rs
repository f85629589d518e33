use nalgebra::Vector3;

// ---------------------------------------------------------------------------
// Body-fixed spherical coordinates
// ---------------------------------------------------------------------------

/// Geocentric spherical position in the body-fixed frame.
///
/// `lat` is in [-pi/2, pi/2], `lon` in [-pi, pi]. The conversion from
/// Cartesian is singular at the origin, and longitude is undefined on the
/// polar axis. Neither case is guarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub r: f64,   // radius
    pub lat: f64, // rad
    pub lon: f64, // rad
}

impl Spherical {
    pub fn new(r: f64, lat: f64, lon: f64) -> Self {
        Self { r, lat, lon }
    }

    /// lat = asin(z/r), lon = atan2(y, x).
    pub fn from_cartesian(pos: &Vector3<f64>) -> Self {
        let r = pos.norm();
        Self {
            r,
            lat: (pos.z / r).asin(),
            lon: pos.y.atan2(pos.x),
        }
    }

    pub fn to_cartesian(&self) -> Vector3<f64> {
        let (slat, clat) = self.lat.sin_cos();
        let (slon, clon) = self.lon.sin_cos();
        Vector3::new(
            self.r * clat * clon,
            self.r * clat * slon,
            self.r * slat,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cartesian_round_trip() {
        let lats = [-1.5, -0.9, -0.2, 0.0, 0.3, 0.87, 1.55];
        let lons = [-3.1, -1.7, 0.0, 0.5, 2.2, 3.14];
        for &r in &[0.5, 1.0, 1.5, 6_778_137.0] {
            for &lat in &lats {
                for &lon in &lons {
                    let s = Spherical::new(r, lat, lon);
                    let pos = s.to_cartesian();
                    let back = Spherical::from_cartesian(&pos).to_cartesian();
                    assert_relative_eq!(back, pos, epsilon = 1e-9 * r, max_relative = 1e-12);
                }
            }
        }
    }

    #[test]
    fn axes_map_to_expected_angles() {
        let s = Spherical::from_cartesian(&Vector3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(s.r, 2.0);
        assert_relative_eq!(s.lat, 0.0);
        assert_relative_eq!(s.lon, std::f64::consts::FRAC_PI_2);

        let n = Spherical::from_cartesian(&Vector3::new(0.0, 0.0, 3.0));
        assert_relative_eq!(n.lat, std::f64::consts::FRAC_PI_2);
    }
}
