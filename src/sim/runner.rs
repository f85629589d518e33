use log::{debug, info};

use super::integrator::{DifferentialSystem, Integrator};
use super::propagator::Propagator;
use super::scheduler::{StepScheduler, Steppable};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Step sizes, span and gravity truncation for a propagation run.
/// Times are in the model's time unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PropagationConfig {
    pub dt: f64,       // integration step
    pub odt: f64,      // output interval
    pub duration: f64, // total span
    pub degree: usize, // gravity degree
    pub order: usize,  // gravity order
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            dt: 10.0,
            odt: 60.0,
            duration: 5400.0, // ~1 LEO orbit, s
            degree: 4,
            order: 4,
        }
    }
}

impl PropagationConfig {
    /// Reject non-positive or non-finite spans. The scheduler and
    /// integrators assume these were checked.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [("dt", self.dt), ("odt", self.odt), ("duration", self.duration)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidStep(format!("{name} must be positive, got {value}")));
            }
        }
        Ok(())
    }

    /// Number of output intervals needed to cover `duration`. A ratio
    /// within rounding noise of a whole number counts as that number.
    pub fn output_count(&self) -> usize {
        let q = self.duration / self.odt;
        let n = q.round();
        if (q - n).abs() <= 1e-9 * n.max(1.0) {
            n as usize
        } else {
            q.ceil() as usize
        }
    }
}

// ---------------------------------------------------------------------------
// Propagation loop
// ---------------------------------------------------------------------------

/// State snapshot at an output tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub state: Vec<f64>,
}

/// Propagate `system` from `x0` at t = 0, sampling at every output interval.
///
/// The returned trajectory starts with the initial state and holds one
/// sample per interval after it.
pub fn propagate<S, I>(
    system: S,
    integrator: I,
    x0: Vec<f64>,
    config: &PropagationConfig,
) -> Result<Vec<Sample>>
where
    S: DifferentialSystem,
    I: Integrator,
{
    config.validate()?;
    let mut propagator = Propagator::new(system, integrator, 0.0, x0, config.dt)?;
    let scheduler = StepScheduler::new(config.dt, config.odt);
    let ticks = config.output_count();

    let mut trajectory = Vec::with_capacity(ticks + 1);
    trajectory.push(snapshot(&propagator));

    let mut calls = 0;
    for _ in 0..ticks {
        calls += scheduler.step(&mut propagator);
        trajectory.push(snapshot(&propagator));
        debug!("t={:.3}", propagator.time());
    }

    info!(
        "propagated {} intervals ({} integrator steps) to t={:.3}",
        ticks,
        calls,
        propagator.time()
    );
    Ok(trajectory)
}

/// Drive any steppable model for `ticks` output intervals.
pub fn run_intervals(scheduler: &StepScheduler, model: &mut dyn Steppable, ticks: usize) -> usize {
    (0..ticks).map(|_| scheduler.step(&mut *model)).sum()
}

fn snapshot<S: DifferentialSystem, I: Integrator>(p: &Propagator<S, I>) -> Sample {
    Sample {
        time: p.time(),
        state: p.state().to_vec(),
    }
}
