use std::sync::Arc;

use log::debug;
use nalgebra::Vector3;

use super::coefficients::{CentralBody, CoefficientTable};
use super::coordinates::Spherical;
use super::legendre::Legendre;
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Degree/order policy
// ---------------------------------------------------------------------------

/// What to do when a caller asks for more harmonic terms than the model has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegreePolicy {
    /// Silently use the model maximum.
    #[default]
    Clamp,
    /// Report `Error::DegreeOutOfRange` / `Error::OrderOutOfRange`.
    Strict,
}

// ---------------------------------------------------------------------------
// Gravity field: potential and spherical partials
// ---------------------------------------------------------------------------

/// Partial derivatives of the potential in body-fixed spherical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Partials {
    pub dudr: f64,
    pub dudlat: f64,
    pub dudlon: f64,
}

/// Truncated spherical-harmonic gravity field.
///
/// Immutable once built: it can be shared (e.g. behind an `Arc`) by any
/// number of models and threads. Scratch space for the Legendre table is
/// supplied by the caller or allocated per call.
#[derive(Debug, Clone)]
pub struct GravityField {
    gm: f64,
    re: f64,
    max_degree: usize,
    cosine: CoefficientTable,
    sine: CoefficientTable,
}

impl GravityField {
    pub fn new(gm: f64, re: f64, cosine: CoefficientTable, sine: CoefficientTable) -> Result<Self> {
        if cosine.max_degree() != sine.max_degree() {
            return Err(Error::TableMismatch {
                cosine: cosine.max_degree(),
                sine: sine.max_degree(),
            });
        }
        let max_degree = cosine.max_degree();
        debug!("gravity field: gm={gm:e} re={re} degree={max_degree}");
        Ok(Self {
            gm,
            re,
            max_degree,
            cosine,
            sine,
        })
    }

    /// Field at the full resolution the body reference provides.
    pub fn from_body<B: CentralBody + ?Sized>(body: &B) -> Self {
        let degree = body.max_degree();
        let order = body.max_order();
        Self {
            gm: body.gm(),
            re: body.reference_radius(),
            max_degree: degree,
            cosine: body.cosine_coefficients(degree, order),
            sine: body.sine_coefficients(degree, order),
        }
    }

    pub fn gm(&self) -> f64 {
        self.gm
    }

    pub fn reference_radius(&self) -> f64 {
        self.re
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    pub fn cosine(&self) -> &CoefficientTable {
        &self.cosine
    }

    pub fn sine(&self) -> &CoefficientTable {
        &self.sine
    }

    /// Apply `policy` to a requested degree.
    pub fn resolve_degree(&self, degree: usize, policy: DegreePolicy) -> Result<usize> {
        match policy {
            DegreePolicy::Clamp => Ok(degree.min(self.max_degree)),
            DegreePolicy::Strict if degree > self.max_degree => Err(Error::DegreeOutOfRange {
                requested: degree,
                max: self.max_degree,
            }),
            DegreePolicy::Strict => Ok(degree),
        }
    }

    /// Potential at (r, lat, lon) through `degree` (clamped to the model).
    pub fn potential(&self, degree: usize, r: f64, lat: f64, lon: f64) -> f64 {
        let mut legendre = Legendre::new(self.max_degree);
        self.potential_with(&mut legendre, degree, r, lat, lon)
    }

    /// Potential using every degree the model carries.
    pub fn potential_max(&self, r: f64, lat: f64, lon: f64) -> f64 {
        self.potential(self.max_degree, r, lat, lon)
    }

    /// Potential using caller-owned Legendre scratch, grown if it is too
    /// small for the clamped degree.
    pub fn potential_with(
        &self,
        legendre: &mut Legendre,
        degree: usize,
        r: f64,
        lat: f64,
        lon: f64,
    ) -> f64 {
        let degree = degree.min(self.max_degree);
        legendre.ensure_degree(degree);
        legendre.set(lat);

        let ratio = self.re / r;
        let mut rr = ratio;
        let mut sum = 0.0;
        for l in 2..=degree {
            rr *= ratio;
            let mut term = 0.0;
            for m in 0..=l {
                let (sml, cml) = (m as f64 * lon).sin_cos();
                let cs = self.cosine.get(l, m) * cml + self.sine.get(l, m) * sml;
                term += legendre.get(l, m) * cs;
            }
            sum += rr * term;
        }
        self.gm / r * (1.0 + sum)
    }

    /// Spherical partials through (degree, order), both clamped. Undersized
    /// scratch is grown as in [`GravityField::potential_with`].
    pub fn partials(
        &self,
        legendre: &mut Legendre,
        degree: usize,
        order: usize,
        r: f64,
        lat: f64,
        lon: f64,
    ) -> Partials {
        let degree = degree.min(self.max_degree);
        legendre.ensure_degree(degree);
        let (slat, clat) = lat.sin_cos();
        legendre.set_sin_cos(slat, clat);
        let tlat = slat / clat;

        let ratio = self.re / r;
        let mut rr = ratio;
        let (mut sum_r, mut sum_lat, mut sum_lon) = (0.0, 0.0, 0.0);
        for l in 2..=degree {
            rr *= ratio;
            let (mut sub_r, mut sub_lat, mut sub_lon) = (0.0, 0.0, 0.0);
            for m in 0..=l.min(order) {
                let mf = m as f64;
                let (sml, cml) = (mf * lon).sin_cos();
                let c = self.cosine.get(l, m);
                let s = self.sine.get(l, m);
                let plm = legendre.get(l, m);
                let cs = c * cml + s * sml;

                sub_r += plm * cs;
                sub_lat += (legendre.get(l, m + 1) - mf * tlat * plm) * cs;
                sub_lon += mf * plm * (s * cml - c * sml);
            }
            sum_r += rr * (l + 1) as f64 * sub_r;
            sum_lat += rr * sub_lat;
            sum_lon += rr * sub_lon;
        }

        let gm_r = self.gm / r;
        Partials {
            dudr: -gm_r / r * (1.0 + sum_r),
            dudlat: gm_r * sum_lat,
            dudlon: gm_r * sum_lon,
        }
    }
}

// ---------------------------------------------------------------------------
// Spherical partials -> body-fixed Cartesian acceleration
// ---------------------------------------------------------------------------

/// Chain rule from (dU/dr, dU/dlat, dU/dlon) to Cartesian acceleration.
///
/// Singular on the polar axis (ri = rj = 0) and at r = 0.
pub fn partials_to_cartesian(p: &Partials, r: f64, pos: &Vector3<f64>) -> Vector3<f64> {
    let (ri, rj, rk) = (pos.x, pos.y, pos.z);
    let r2 = r * r;
    let rirj2 = ri * ri + rj * rj;
    let rirj = rirj2.sqrt();

    let dlat_term = p.dudr / r - rk * p.dudlat / (r2 * rirj);
    let dlon_term = p.dudlon / rirj2;

    Vector3::new(
        dlat_term * ri - dlon_term * rj,
        dlat_term * rj + dlon_term * ri,
        p.dudr / r * rk + p.dudlat * rirj / r2,
    )
}

/// Acceleration due to `gm` alone.
pub fn point_mass_accel(gm: f64, pos: &Vector3<f64>) -> Vector3<f64> {
    let r = pos.norm();
    -gm / (r * r * r) * pos
}

/// Gravity acceleration at a fixed degree/order, owning its Legendre scratch.
///
/// One instance per model; the shared field sits behind an `Arc`.
#[derive(Debug, Clone)]
pub struct GravityAcceleration {
    field: Arc<GravityField>,
    degree: usize,
    order: usize,
    legendre: Legendre,
}

impl GravityAcceleration {
    /// Clamp degree to the field maximum and order to the degree.
    pub fn new(field: Arc<GravityField>, degree: usize, order: usize) -> Self {
        let degree = degree.min(field.max_degree());
        let order = order.min(degree);
        Self::build(field, degree, order)
    }

    pub fn with_policy(
        field: Arc<GravityField>,
        degree: usize,
        order: usize,
        policy: DegreePolicy,
    ) -> Result<Self> {
        let degree = field.resolve_degree(degree, policy)?;
        let order = match policy {
            DegreePolicy::Clamp => order.min(degree),
            DegreePolicy::Strict if order > degree => {
                return Err(Error::OrderOutOfRange { order, degree })
            }
            DegreePolicy::Strict => order,
        };
        Ok(Self::build(field, degree, order))
    }

    /// Full degree and order of the field.
    pub fn full(field: Arc<GravityField>) -> Self {
        let n = field.max_degree();
        Self::build(field, n, n)
    }

    fn build(field: Arc<GravityField>, degree: usize, order: usize) -> Self {
        let legendre = Legendre::new(field.max_degree());
        Self {
            field,
            degree,
            order,
            legendre,
        }
    }

    pub fn field(&self) -> &GravityField {
        &self.field
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn partials(&mut self, r: f64, lat: f64, lon: f64) -> Partials {
        self.field
            .partials(&mut self.legendre, self.degree, self.order, r, lat, lon)
    }

    /// Body-fixed acceleration at a spherical position.
    pub fn acceleration_spherical(&mut self, r: f64, lat: f64, lon: f64) -> Vector3<f64> {
        let pos = Spherical::new(r, lat, lon).to_cartesian();
        let p = self.partials(r, lat, lon);
        partials_to_cartesian(&p, r, &pos)
    }

    /// Body-fixed acceleration at a Cartesian position.
    pub fn acceleration(&mut self, pos: &Vector3<f64>) -> Vector3<f64> {
        let s = Spherical::from_cartesian(pos);
        let p = self.partials(s.r, s.lat, s.lon);
        partials_to_cartesian(&p, s.r, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::coefficients::Wgs84Egm96;
    use approx::assert_relative_eq;

    fn canonical_field() -> Arc<GravityField> {
        Arc::new(GravityField::from_body(&Wgs84Egm96::canonical()))
    }

    #[test]
    fn regression_northern_point() {
        let mut g = GravityAcceleration::new(canonical_field(), 4, 4);
        let lat = 50.0_f64.to_radians();
        let lon = (-100.0_f64).to_radians();
        let expected = Vector3::new(0.000273974088, 0.001553775992, -0.001882985691);

        let a_sph = g.acceleration_spherical(1.5, lat, lon);
        assert_relative_eq!(a_sph, expected, epsilon = 1e-11);

        let pos = Spherical::new(1.5, lat, lon).to_cartesian();
        let a_cart = g.acceleration(&pos);
        assert_relative_eq!(a_cart, expected, epsilon = 1e-11);
    }

    #[test]
    fn regression_southern_point() {
        let mut g = GravityAcceleration::new(canonical_field(), 4, 4);
        let lat = (-50.0_f64).to_radians();
        let lon = 100.0_f64.to_radians();
        let expected = Vector3::new(0.000273975775, -0.001553773172, 0.001882993210);

        let a_sph = g.acceleration_spherical(1.5, lat, lon);
        assert_relative_eq!(a_sph, expected, epsilon = 1e-11);

        let pos = Spherical::new(1.5, lat, lon).to_cartesian();
        assert_relative_eq!(g.acceleration(&pos), expected, epsilon = 1e-11);
    }

    #[test]
    fn degree_request_clamps_to_model() {
        let field = canonical_field();
        for &(r, lat, lon) in &[(1.5, 0.87, -1.74), (1.1, -0.2, 3.0), (4.0, 1.3, 0.1)] {
            assert_eq!(field.potential(100, r, lat, lon), field.potential(4, r, lat, lon));
            assert_eq!(field.potential_max(r, lat, lon), field.potential(4, r, lat, lon));
        }
        let g = GravityAcceleration::new(field, 100, 100);
        assert_eq!(g.degree(), 4);
        assert_eq!(g.order(), 4);
    }

    #[test]
    fn strict_policy_reports_excess_degree() {
        let field = canonical_field();
        assert_eq!(
            field.resolve_degree(7, DegreePolicy::Strict),
            Err(Error::DegreeOutOfRange { requested: 7, max: 4 })
        );
        assert_eq!(field.resolve_degree(7, DegreePolicy::Clamp), Ok(4));

        let err = GravityAcceleration::with_policy(field.clone(), 3, 4, DegreePolicy::Strict)
            .unwrap_err();
        assert_eq!(err, Error::OrderOutOfRange { order: 4, degree: 3 });
        assert!(GravityAcceleration::with_policy(field, 4, 2, DegreePolicy::Strict).is_ok());
    }

    #[test]
    fn degree_zero_is_point_mass() {
        let field = canonical_field();
        let r = 1.3;
        assert_relative_eq!(field.potential(0, r, 0.4, 1.0), field.gm() / r);

        let mut g = GravityAcceleration::new(field.clone(), 0, 0);
        let pos = Spherical::new(r, 0.4, 1.0).to_cartesian();
        assert_relative_eq!(
            g.acceleration(&pos),
            point_mass_accel(field.gm(), &pos),
            max_relative = 1e-12
        );
    }

    #[test]
    fn radial_partial_matches_potential_slope() {
        let field = canonical_field();
        let mut legendre = Legendre::new(4);
        let (r, lat, lon) = (1.2, 0.5, -0.8);
        let h = 1e-6;
        let numeric =
            (field.potential(4, r + h, lat, lon) - field.potential(4, r - h, lat, lon)) / (2.0 * h);
        let p = field.partials(&mut legendre, 4, 4, r, lat, lon);
        assert_relative_eq!(p.dudr, numeric, max_relative = 1e-7);

        let h = 1e-4;
        let numeric_lat =
            (field.potential(4, r, lat + h, lon) - field.potential(4, r, lat - h, lon)) / (2.0 * h);
        assert_relative_eq!(p.dudlat, numeric_lat, epsilon = 1e-12);

        let numeric_lon =
            (field.potential(4, r, lat, lon + h) - field.potential(4, r, lat, lon - h)) / (2.0 * h);
        assert_relative_eq!(p.dudlon, numeric_lon, epsilon = 1e-12);
    }

    #[test]
    fn undersized_scratch_is_grown() {
        let field = canonical_field();
        let (r, lat, lon) = (1.2, 0.5, -0.8);

        let mut small = Legendre::new(2);
        let u = field.potential_with(&mut small, 4, r, lat, lon);
        assert_eq!(small.max_degree(), 4);
        assert_eq!(u, field.potential(4, r, lat, lon));
        assert!(u != field.potential(2, r, lat, lon));

        let mut small = Legendre::new(1);
        let mut full = Legendre::new(4);
        assert_eq!(
            field.partials(&mut small, 4, 4, r, lat, lon),
            field.partials(&mut full, 4, 4, r, lat, lon)
        );
    }

    #[test]
    fn polar_axis_is_singular() {
        let mut g = GravityAcceleration::full(canonical_field());
        let a = g.acceleration(&Vector3::new(0.0, 0.0, 1.5));
        assert!(a.iter().any(|v| !v.is_finite()), "{a:?}");
    }

    #[test]
    fn mismatched_tables_rejected() {
        let (cosine, sine) = (CoefficientTable::zeros(4), CoefficientTable::zeros(3));
        let err = GravityField::new(1.0, 1.0, cosine, sine).unwrap_err();
        assert_eq!(err, Error::TableMismatch { cosine: 4, sine: 3 });
    }

    #[test]
    fn shared_field_gives_identical_results_per_adapter() {
        let field = canonical_field();
        let mut a = GravityAcceleration::full(field.clone());
        let mut b = GravityAcceleration::full(field);
        let p1 = Vector3::new(1.1, -0.3, 0.6);
        let p2 = Vector3::new(-0.2, 1.4, -0.9);
        let first = a.acceleration(&p1);
        let _ = b.acceleration(&p2);
        assert_eq!(b.acceleration(&p1), first);
        assert_eq!(a.acceleration(&p1), first);
    }
}
