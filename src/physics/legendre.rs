// ---------------------------------------------------------------------------
// Unnormalized associated Legendre functions P(l, m)(sin lat)
// ---------------------------------------------------------------------------

/// Table of unnormalized associated Legendre function values for a single
/// latitude, for degrees 0..=N and orders 0..=l+1.
///
/// The extra order (m = l + 1, always zero) lets the latitude partial read
/// P(l, m+1) without a bounds special case. The buffer is sized once and
/// regenerated in place by [`Legendre::set`], so an instance belongs to one
/// model or thread at a time.
#[derive(Debug, Clone)]
pub struct Legendre {
    max_degree: usize,
    values: Vec<f64>,
}

impl Legendre {
    pub fn new(max_degree: usize) -> Self {
        let len = row_offset(max_degree + 1);
        let mut legendre = Self {
            max_degree,
            values: vec![0.0; len],
        };
        legendre.set_sin_cos(0.0, 1.0);
        legendre
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Grow the table so it holds at least `degree`. Never shrinks; values
    /// are stale until the next [`Legendre::set`].
    pub fn ensure_degree(&mut self, degree: usize) {
        if degree > self.max_degree {
            self.max_degree = degree;
            self.values.resize(row_offset(degree + 1), 0.0);
        }
    }

    /// Regenerate the table for geocentric latitude `lat` (rad).
    pub fn set(&mut self, lat: f64) {
        let (slat, clat) = lat.sin_cos();
        self.set_sin_cos(slat, clat);
    }

    /// Regenerate the table from precomputed sin/cos of latitude.
    ///
    /// Recursion (no Condon-Shortley phase):
    ///   P(l,0) = ((2l-1) sin P(l-1,0) - (l-1) P(l-2,0)) / l
    ///   P(l,m) = P(l-2,m) + (2l-1) cos P(l-1,m-1),  0 < m < l
    ///   P(l,l) = (2l-1) cos P(l-1,l-1)
    pub fn set_sin_cos(&mut self, slat: f64, clat: f64) {
        self.values.fill(0.0);
        self.values[idx(0, 0)] = 1.0;
        if self.max_degree == 0 {
            return;
        }
        self.values[idx(1, 0)] = slat;
        self.values[idx(1, 1)] = clat;

        for l in 2..=self.max_degree {
            let two_l_m1 = (2 * l - 1) as f64;
            let lf = l as f64;
            self.values[idx(l, 0)] = (two_l_m1 * slat * self.values[idx(l - 1, 0)]
                - (lf - 1.0) * self.values[idx(l - 2, 0)])
                / lf;
            for m in 1..l {
                // P(l-2, m) is zero once m exceeds l-2
                let lower = if m <= l - 2 {
                    self.values[idx(l - 2, m)]
                } else {
                    0.0
                };
                self.values[idx(l, m)] = lower + two_l_m1 * clat * self.values[idx(l - 1, m - 1)];
            }
            self.values[idx(l, l)] = two_l_m1 * clat * self.values[idx(l - 1, l - 1)];
        }
    }

    /// P(l, m). Zero for m > l; degrees above the table maximum read as zero.
    #[inline]
    pub fn get(&self, l: usize, m: usize) -> f64 {
        if l > self.max_degree || m > l + 1 {
            return 0.0;
        }
        self.values[idx(l, m)]
    }
}

/// Start of row `l` in the flat buffer (row k holds k + 2 entries).
#[inline]
fn row_offset(l: usize) -> usize {
    l * (l + 3) / 2
}

#[inline]
fn idx(l: usize, m: usize) -> usize {
    row_offset(l) + m
}
