use log::debug;

use super::integrator::{DifferentialSystem, Integrator};
use super::scheduler::Steppable;
use crate::error::{Error, Result};

/// A differential system paired with the integrator that advances it.
///
/// Holds the current time and state plus a spare buffer the integrator
/// writes into, so stepping never allocates.
pub struct Propagator<S, I> {
    system: S,
    integrator: I,
    time: f64,
    state: Vec<f64>,
    next: Vec<f64>,
    default_step: f64,
}

impl<S: DifferentialSystem, I: Integrator> Propagator<S, I> {
    pub fn new(system: S, integrator: I, t0: f64, x0: Vec<f64>, default_step: f64) -> Result<Self> {
        let order = system.order();
        if x0.len() != order {
            return Err(Error::StateLength {
                expected: order,
                got: x0.len(),
            });
        }
        if integrator.order() != order {
            return Err(Error::StateLength {
                expected: order,
                got: integrator.order(),
            });
        }
        debug!("propagator: order={order} t0={t0} step={default_step}");
        Ok(Self {
            system,
            integrator,
            time: t0,
            next: vec![0.0; order],
            state: x0,
            default_step,
        })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn state(&self) -> &[f64] {
        &self.state
    }

    pub fn system(&self) -> &S {
        &self.system
    }

    pub fn system_mut(&mut self) -> &mut S {
        &mut self.system
    }

    pub fn default_step(&self) -> f64 {
        self.default_step
    }

    pub fn set_default_step(&mut self, step: f64) {
        self.default_step = step;
    }

    /// Replace time and state, e.g. after an impulsive maneuver.
    pub fn reset(&mut self, t: f64, x: &[f64]) -> Result<()> {
        if x.len() != self.state.len() {
            return Err(Error::StateLength {
                expected: self.state.len(),
                got: x.len(),
            });
        }
        self.time = t;
        self.state.copy_from_slice(x);
        Ok(())
    }
}

impl<S: DifferentialSystem, I: Integrator> Steppable for Propagator<S, I> {
    fn advance(&mut self) {
        let step = self.default_step;
        self.advance_by(step);
    }

    fn advance_by(&mut self, delta: f64) {
        self.time = self
            .integrator
            .step(self.time, delta, &self.state, &mut self.next, &mut self.system);
        std::mem::swap(&mut self.state, &mut self.next);
    }
}
