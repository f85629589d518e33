pub mod attitude;
pub mod orbit;

pub use attitude::AttitudeModel;
pub use orbit::{GravitySource, OrbitModel};
