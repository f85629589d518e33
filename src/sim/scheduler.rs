use log::{trace, warn};

// ---------------------------------------------------------------------------
// Steppable models
// ---------------------------------------------------------------------------

/// Anything that can be moved forward in time.
///
/// [`StepScheduler`] only ever calls [`Steppable::advance_by`]; `advance`
/// is for callers stepping at the model's own rate.
pub trait Steppable {
    /// Advance by the model's own default increment.
    fn advance(&mut self);

    /// Advance by exactly `delta`.
    fn advance_by(&mut self, delta: f64);
}

// ---------------------------------------------------------------------------
// Integration step vs. output interval
// ---------------------------------------------------------------------------

/// Splits each output interval `odt` into integration steps of `dt`.
///
/// Every call except the last advances by exactly `dt`; the last covers
/// whatever remains, which is kept below `1.5 * dt` so no vanishingly small
/// step is left dangling. `dt <= odt` always holds: setting an output
/// interval below the step shrinks the step to match.
///
/// The scheduler holds no per-model state, so one instance can drive any
/// number of models sharing the same step sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepScheduler {
    dt: f64,
    odt: f64,
}

impl StepScheduler {
    pub fn new(dt: f64, odt: f64) -> Self {
        let mut scheduler = Self { dt, odt };
        scheduler.enforce();
        scheduler
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn odt(&self) -> f64 {
        self.odt
    }

    /// Largest step the final call of an interval may take.
    pub fn dtroom(&self) -> f64 {
        1.5 * self.dt
    }

    /// Set the integration step; shrunk to `odt` if larger.
    pub fn set_dt(&mut self, dt: f64) {
        self.dt = dt;
        self.enforce();
    }

    /// Set the output interval; `dt` shrinks to it if larger.
    pub fn set_odt(&mut self, odt: f64) {
        self.odt = odt;
        self.enforce();
    }

    fn enforce(&mut self) {
        if self.odt < self.dt {
            warn!("integration step {} exceeds output interval {}, shrinking", self.dt, self.odt);
            self.dt = self.odt;
        }
    }

    /// Drive `model` across one output interval. Returns the number of
    /// calls made.
    pub fn step(&self, model: &mut dyn Steppable) -> usize {
        let dtroom = self.dtroom();
        let mut accumulated = 0.0;
        let mut calls = 0;
        loop {
            let remaining = self.odt - accumulated;
            calls += 1;
            if remaining > dtroom {
                model.advance_by(self.dt);
                accumulated += self.dt;
            } else {
                trace!("final step {remaining} after {} full steps", calls - 1);
                model.advance_by(remaining);
                return calls;
            }
        }
    }
}
