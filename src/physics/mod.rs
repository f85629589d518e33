pub mod coefficients;
pub mod coordinates;
pub mod gravity;
pub mod legendre;

pub use coefficients::{CentralBody, CoefficientTable, Units, Wgs84Egm96};
pub use coordinates::Spherical;
pub use gravity::{DegreePolicy, GravityAcceleration, GravityField, Partials};
pub use legendre::Legendre;
