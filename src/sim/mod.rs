pub mod integrator;
pub mod propagator;
pub mod runner;
pub mod scheduler;

pub use integrator::{DifferentialSystem, Euler, Integrator, Rk4};
pub use propagator::Propagator;
pub use runner::{propagate, run_intervals, PropagationConfig, Sample};
pub use scheduler::{StepScheduler, Steppable};
