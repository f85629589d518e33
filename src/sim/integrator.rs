// ---------------------------------------------------------------------------
// Differential systems and fixed-step integrators
// ---------------------------------------------------------------------------

/// A system of first-order ODEs, dx/dt = f(t, x).
///
/// Implemented by vehicle models. `derivatives` takes `&mut self` so models
/// can keep their own scratch (e.g. a gravity Legendre table).
pub trait DifferentialSystem {
    /// Number of state elements.
    fn order(&self) -> usize;

    /// Write f(t, x) into `xdot`. Both slices have length `order()`.
    fn derivatives(&mut self, t: f64, x: &[f64], xdot: &mut [f64]);
}

/// Advances a [`DifferentialSystem`] by one step.
///
/// Implementations own scratch buffers sized for a fixed state order and
/// are not meant to be shared between concurrently stepping models.
pub trait Integrator {
    /// State order this integrator was sized for.
    fn order(&self) -> usize;

    /// Advance `x0` at `t0` by `dt`, writing the new state into `x1`.
    /// Returns the new time, `t0 + dt`.
    fn step(
        &mut self,
        t0: f64,
        dt: f64,
        x0: &[f64],
        x1: &mut [f64],
        system: &mut dyn DifferentialSystem,
    ) -> f64;
}

/// Classical 4th-order Runge-Kutta.
///
/// The weighted stage sum is accumulated as each stage is evaluated, so
/// only three state-sized buffers are kept regardless of stage count.
#[derive(Debug, Clone)]
pub struct Rk4 {
    xdot: Vec<f64>,
    xtmp: Vec<f64>,
    acc: Vec<f64>,
}

impl Rk4 {
    pub fn new(order: usize) -> Self {
        Self {
            xdot: vec![0.0; order],
            xtmp: vec![0.0; order],
            acc: vec![0.0; order],
        }
    }
}

impl Integrator for Rk4 {
    fn order(&self) -> usize {
        self.acc.len()
    }

    fn step(
        &mut self,
        t0: f64,
        dt: f64,
        x0: &[f64],
        x1: &mut [f64],
        system: &mut dyn DifferentialSystem,
    ) -> f64 {
        debug_assert_eq!(x0.len(), self.acc.len());
        debug_assert_eq!(x1.len(), self.acc.len());
        let half = 0.5 * dt;

        // k1
        system.derivatives(t0, x0, &mut self.xdot);
        for i in 0..x0.len() {
            self.acc[i] = self.xdot[i];
            self.xtmp[i] = x0[i] + half * self.xdot[i];
        }

        // k2
        system.derivatives(t0 + half, &self.xtmp, &mut self.xdot);
        for i in 0..x0.len() {
            self.acc[i] += 2.0 * self.xdot[i];
            self.xtmp[i] = x0[i] + half * self.xdot[i];
        }

        // k3
        system.derivatives(t0 + half, &self.xtmp, &mut self.xdot);
        for i in 0..x0.len() {
            self.acc[i] += 2.0 * self.xdot[i];
            self.xtmp[i] = x0[i] + dt * self.xdot[i];
        }

        // k4
        system.derivatives(t0 + dt, &self.xtmp, &mut self.xdot);
        let sixth = dt / 6.0;
        for i in 0..x0.len() {
            x1[i] = x0[i] + sixth * (self.acc[i] + self.xdot[i]);
        }

        t0 + dt
    }
}

/// Forward Euler. First order; mostly useful as a cheap comparison.
#[derive(Debug, Clone)]
pub struct Euler {
    xdot: Vec<f64>,
}

impl Euler {
    pub fn new(order: usize) -> Self {
        Self {
            xdot: vec![0.0; order],
        }
    }
}

impl Integrator for Euler {
    fn order(&self) -> usize {
        self.xdot.len()
    }

    fn step(
        &mut self,
        t0: f64,
        dt: f64,
        x0: &[f64],
        x1: &mut [f64],
        system: &mut dyn DifferentialSystem,
    ) -> f64 {
        debug_assert_eq!(x0.len(), self.xdot.len());
        system.derivatives(t0, x0, &mut self.xdot);
        for i in 0..x0.len() {
            x1[i] = x0[i] + dt * self.xdot[i];
        }
        t0 + dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// dx/dt = x
    struct Growth;

    impl DifferentialSystem for Growth {
        fn order(&self) -> usize {
            1
        }
        fn derivatives(&mut self, _t: f64, x: &[f64], xdot: &mut [f64]) {
            xdot[0] = x[0];
        }
    }

    /// Undamped oscillator, x'' = -x, with a call counter.
    struct Oscillator {
        calls: usize,
    }

    impl DifferentialSystem for Oscillator {
        fn order(&self) -> usize {
            2
        }
        fn derivatives(&mut self, _t: f64, x: &[f64], xdot: &mut [f64]) {
            self.calls += 1;
            xdot[0] = x[1];
            xdot[1] = -x[0];
        }
    }

    /// dx/dt = t, exact solution t^2 / 2.
    struct Ramp;

    impl DifferentialSystem for Ramp {
        fn order(&self) -> usize {
            1
        }
        fn derivatives(&mut self, t: f64, _x: &[f64], xdot: &mut [f64]) {
            xdot[0] = t;
        }
    }

    fn run(
        integrator: &mut dyn Integrator,
        sys: &mut dyn DifferentialSystem,
        x0: &[f64],
        dt: f64,
        n: usize,
    ) -> (f64, Vec<f64>) {
        let mut t = 0.0;
        let mut x = x0.to_vec();
        let mut next = vec![0.0; x.len()];
        for _ in 0..n {
            t = integrator.step(t, dt, &x, &mut next, sys);
            std::mem::swap(&mut x, &mut next);
        }
        (t, x)
    }

    #[test]
    fn rk4_exponential_growth() {
        let mut rk4 = Rk4::new(1);
        let (t, x) = run(&mut rk4, &mut Growth, &[1.0], 0.1, 10);
        assert_relative_eq!(t, 1.0, epsilon = 1e-12);
        let rel = (x[0] - std::f64::consts::E).abs() / std::f64::consts::E;
        assert!(rel < 1e-5, "relative error {rel:e}");
    }

    #[test]
    fn rk4_exact_for_quadratic_in_time() {
        let mut rk4 = Rk4::new(1);
        let (_, x) = run(&mut rk4, &mut Ramp, &[0.0], 0.25, 8);
        assert_relative_eq!(x[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn rk4_uses_four_evaluations_per_step() {
        let mut rk4 = Rk4::new(2);
        let mut osc = Oscillator { calls: 0 };
        let _ = run(&mut rk4, &mut osc, &[1.0, 0.0], 0.01, 25);
        assert_eq!(osc.calls, 100);
    }

    #[test]
    fn rk4_beats_euler_on_oscillator() {
        let dt = 0.01;
        let n = 628;
        let exact = (n as f64 * dt).cos();

        let mut rk4 = Rk4::new(2);
        let (_, xr) = run(&mut rk4, &mut Oscillator { calls: 0 }, &[1.0, 0.0], dt, n);
        let mut euler = Euler::new(2);
        let (_, xe) = run(&mut euler, &mut Oscillator { calls: 0 }, &[1.0, 0.0], dt, n);

        let err_rk4 = (xr[0] - exact).abs();
        let err_euler = (xe[0] - exact).abs();
        assert!(err_rk4 < 1e-8, "rk4 error {err_rk4:e}");
        assert!(err_euler > 1e-3, "euler error {err_euler:e}");
    }

    #[test]
    fn returned_time_is_direct_sum() {
        let mut rk4 = Rk4::new(1);
        let mut x1 = [0.0];
        let t1 = rk4.step(1e9, 1e-3, &[1.0], &mut x1, &mut Growth);
        assert_eq!(t1, 1e9 + 1e-3);
        assert_eq!(rk4.order(), 1);
    }
}
