pub mod dynamics;
pub mod error;
pub mod io;
pub mod physics;
pub mod sim;

pub use error::{Error, Result};

// Flat re-exports for the common propagation path
pub mod prelude {
    pub use crate::dynamics::{AttitudeModel, OrbitModel};
    pub use crate::error::{Error, Result};
    pub use crate::physics::{
        CentralBody, DegreePolicy, GravityAcceleration, GravityField, Spherical, Wgs84Egm96,
    };
    pub use crate::sim::{
        propagate, DifferentialSystem, Integrator, PropagationConfig, Propagator, Rk4,
        StepScheduler, Steppable,
    };
}
