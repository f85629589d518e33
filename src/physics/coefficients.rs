use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Triangular coefficient table C(l, m) / S(l, m)
// ---------------------------------------------------------------------------

/// Unnormalized spherical-harmonic coefficients for 0 <= m <= l <= N,
/// stored row by row with 0-based degree/order indexing.
///
/// Degree 0 and 1 entries are always zero: the monopole is carried by gm
/// and the origin sits at the center of mass.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientTable {
    max_degree: usize,
    values: Vec<f64>,
}

impl CoefficientTable {
    pub fn zeros(max_degree: usize) -> Self {
        Self {
            max_degree,
            values: vec![0.0; tri_len(max_degree)],
        }
    }

    /// Build a table from `(l, m, value)` triples; unlisted terms are zero.
    pub fn from_terms(max_degree: usize, terms: &[(usize, usize, f64)]) -> Result<Self> {
        let mut table = Self::zeros(max_degree);
        for &(l, m, value) in terms {
            table.set(l, m, value)?;
        }
        Ok(table)
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    pub fn set(&mut self, l: usize, m: usize, value: f64) -> Result<()> {
        if l > self.max_degree || m > l {
            return Err(Error::CoefficientIndex {
                degree: l,
                order: m,
                max: self.max_degree,
            });
        }
        if l < 2 {
            return Err(Error::LowDegreeTerm { degree: l });
        }
        self.values[tri_idx(l, m)] = value;
        Ok(())
    }

    /// Coefficient (l, m), or zero outside the stored triangle.
    #[inline]
    pub fn get(&self, l: usize, m: usize) -> f64 {
        if l > self.max_degree || m > l {
            return 0.0;
        }
        self.values[tri_idx(l, m)]
    }

    /// Copy of this table sized to `degree`, keeping orders up to `order`.
    /// Terms beyond the available data are zero-filled.
    pub fn resized(&self, degree: usize, order: usize) -> Self {
        let mut out = Self::zeros(degree);
        for l in 2..=degree.min(self.max_degree) {
            for m in 0..=l.min(order) {
                out.values[tri_idx(l, m)] = self.get(l, m);
            }
        }
        out
    }
}

#[inline]
fn tri_len(max_degree: usize) -> usize {
    (max_degree + 1) * (max_degree + 2) / 2
}

#[inline]
fn tri_idx(l: usize, m: usize) -> usize {
    l * (l + 1) / 2 + m
}

// ---------------------------------------------------------------------------
// Central body reference
// ---------------------------------------------------------------------------

/// Constants describing a central body: its gravitational parameter,
/// reference ellipsoid, rotation, and harmonic coefficients.
pub trait CentralBody {
    fn gm(&self) -> f64;
    fn reference_radius(&self) -> f64;
    fn j2(&self) -> f64;
    fn semi_major_axis(&self) -> f64;
    fn flattening(&self) -> f64;
    /// Rotation rate, rad per time unit.
    fn rotation_rate(&self) -> f64;
    fn max_degree(&self) -> usize;
    fn max_order(&self) -> usize;
    /// Cosine coefficients sized to (degree, order), zero beyond available data.
    fn cosine_coefficients(&self, degree: usize, order: usize) -> CoefficientTable;
    /// Sine coefficients sized to (degree, order), zero beyond available data.
    fn sine_coefficients(&self, degree: usize, order: usize) -> CoefficientTable;
}

/// Distance/time units a reference model reports its constants in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    /// Meters and seconds.
    #[default]
    Metric,
    /// Earth radii and minutes.
    Canonical,
}

// ---------------------------------------------------------------------------
// WGS84 ellipsoid + EGM96 geopotential (4x4, unnormalized)
// ---------------------------------------------------------------------------

pub const WGS84_GM: f64 = 3.986_004_418e14; // m^3/s^2
pub const WGS84_A: f64 = 6_378_137.0; // m
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;
pub const WGS84_OMEGA: f64 = 7.292_115e-5; // rad/s

const EGM96_DEGREE: usize = 4;

// (l, m, C, S), unnormalized
const EGM96_TERMS: [(usize, usize, f64, f64); 12] = [
    (2, 0, -1.082_626_683_553_151_3e-3, 0.0),
    (2, 1, -2.414_000_000_001_367e-10, 1.543_100_000_004_475_8e-9),
    (2, 2, 1.574_460_374_564_035e-6, -9.038_038_066_385_57e-7),
    (3, 0, 2.532_656_485_332_235_5e-6, 0.0),
    (3, 1, 2.192_638_529_168_585_3e-6, 2.684_248_902_967_788_7e-7),
    (3, 2, 3.089_892_068_805_108_6e-7, -2.114_376_124_373_429_2e-7),
    (3, 3, 1.005_487_780_643_843_4e-7, 1.972_225_590_059_065e-7),
    (4, 0, 1.619_621_591_367e-6, 0.0),
    (4, 1, -5.087_993_604_038_327e-7, -4.491_448_728_393_361e-7),
    (4, 2, 7.841_758_598_437_623e-8, 1.481_778_682_956_123_2e-7),
    (4, 3, 5.920_994_026_291_321_6e-8, -1.200_776_676_336_266_8e-8),
    (4, 4, -3.984_074_117_662_744e-9, 6.525_714_253_704_298e-9),
];

/// Combined WGS84 ellipsoid and EGM96 geopotential truncated at 4x4.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wgs84Egm96 {
    units: Units,
}

impl Wgs84Egm96 {
    pub fn metric() -> Self {
        Self { units: Units::Metric }
    }

    /// Earth radii and minutes.
    pub fn canonical() -> Self {
        Self {
            units: Units::Canonical,
        }
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Seconds per model time unit.
    pub fn time_unit(&self) -> f64 {
        match self.units {
            Units::Metric => 1.0,
            Units::Canonical => 60.0,
        }
    }

    /// Meters per model distance unit.
    pub fn distance_unit(&self) -> f64 {
        match self.units {
            Units::Metric => 1.0,
            Units::Canonical => WGS84_A,
        }
    }

    fn table(&self, degree: usize, order: usize, pick: fn(f64, f64) -> f64) -> CoefficientTable {
        let mut full = CoefficientTable::zeros(EGM96_DEGREE);
        for &(l, m, c, s) in EGM96_TERMS.iter() {
            full.values[tri_idx(l, m)] = pick(c, s);
        }
        full.resized(degree, order)
    }
}

impl CentralBody for Wgs84Egm96 {
    fn gm(&self) -> f64 {
        let du = self.distance_unit();
        let tu = self.time_unit();
        WGS84_GM * tu * tu / (du * du * du)
    }

    fn reference_radius(&self) -> f64 {
        WGS84_A / self.distance_unit()
    }

    fn j2(&self) -> f64 {
        -EGM96_TERMS[0].2
    }

    fn semi_major_axis(&self) -> f64 {
        WGS84_A / self.distance_unit()
    }

    fn flattening(&self) -> f64 {
        WGS84_F
    }

    fn rotation_rate(&self) -> f64 {
        WGS84_OMEGA * self.time_unit()
    }

    fn max_degree(&self) -> usize {
        EGM96_DEGREE
    }

    fn max_order(&self) -> usize {
        EGM96_DEGREE
    }

    fn cosine_coefficients(&self, degree: usize, order: usize) -> CoefficientTable {
        self.table(degree, order, |c, _| c)
    }

    fn sine_coefficients(&self, degree: usize, order: usize) -> CoefficientTable {
        self.table(degree, order, |_, s| s)
    }
}
