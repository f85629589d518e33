use nalgebra::{Rotation3, Vector3};

use crate::physics::gravity::{point_mass_accel, GravityAcceleration};
use crate::sim::integrator::DifferentialSystem;

// ---------------------------------------------------------------------------
// Translational vehicle model
// ---------------------------------------------------------------------------

/// Gravity source for [`OrbitModel`].
#[derive(Debug, Clone)]
pub enum GravitySource {
    PointMass { gm: f64 },
    /// Harmonic field evaluated in the rotating body-fixed frame.
    Harmonic(GravityAcceleration),
}

/// Point-mass vehicle in an inertial frame, state `[x, y, z, vx, vy, vz]`.
///
/// The body-fixed frame spins about +z at `rotation_rate`, at angle
/// `theta0 + rotation_rate * t`. Harmonic gravity is evaluated at the
/// body-fixed position and rotated back to inertial.
#[derive(Debug, Clone)]
pub struct OrbitModel {
    gravity: GravitySource,
    rotation_rate: f64,
    theta0: f64,
}

impl OrbitModel {
    pub fn point_mass(gm: f64) -> Self {
        Self {
            gravity: GravitySource::PointMass { gm },
            rotation_rate: 0.0,
            theta0: 0.0,
        }
    }

    pub fn harmonic(gravity: GravityAcceleration, rotation_rate: f64) -> Self {
        Self {
            gravity: GravitySource::Harmonic(gravity),
            rotation_rate,
            theta0: 0.0,
        }
    }

    /// Body-fixed frame angle at t = 0, rad.
    pub fn with_theta0(mut self, theta0: f64) -> Self {
        self.theta0 = theta0;
        self
    }

    pub fn gm(&self) -> f64 {
        match &self.gravity {
            GravitySource::PointMass { gm } => *gm,
            GravitySource::Harmonic(g) => g.field().gm(),
        }
    }

    pub fn rotation_rate(&self) -> f64 {
        self.rotation_rate
    }

    /// Inertial-from-body-fixed rotation at time `t`.
    pub fn body_to_inertial(&self, t: f64) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vector3::z_axis(), self.theta0 + self.rotation_rate * t)
    }

    /// Inertial gravitational acceleration at inertial position `pos`.
    pub fn acceleration(&mut self, t: f64, pos: &Vector3<f64>) -> Vector3<f64> {
        match &mut self.gravity {
            GravitySource::PointMass { gm } => point_mass_accel(*gm, pos),
            GravitySource::Harmonic(g) => {
                let rot = Rotation3::from_axis_angle(
                    &Vector3::z_axis(),
                    self.theta0 + self.rotation_rate * t,
                );
                let pos_bf = rot.inverse() * pos;
                rot * g.acceleration(&pos_bf)
            }
        }
    }
}

impl DifferentialSystem for OrbitModel {
    fn order(&self) -> usize {
        6
    }

    fn derivatives(&mut self, t: f64, x: &[f64], xdot: &mut [f64]) {
        let pos = Vector3::new(x[0], x[1], x[2]);
        let accel = self.acceleration(t, &pos);
        xdot[..3].copy_from_slice(&x[3..6]);
        xdot[3] = accel.x;
        xdot[4] = accel.y;
        xdot[5] = accel.z;
    }
}

/// Pack position and velocity into a 6-element state.
pub fn state_vector(pos: &Vector3<f64>, vel: &Vector3<f64>) -> Vec<f64> {
    vec![pos.x, pos.y, pos.z, vel.x, vel.y, vel.z]
}

pub fn position(x: &[f64]) -> Vector3<f64> {
    Vector3::new(x[0], x[1], x[2])
}

pub fn velocity(x: &[f64]) -> Vector3<f64> {
    Vector3::new(x[3], x[4], x[5])
}

/// Circular orbit speed at radius `r`.
pub fn circular_velocity(gm: f64, r: f64) -> f64 {
    (gm / r).sqrt()
}

/// Two-body specific orbital energy, v^2/2 - gm/r.
pub fn specific_energy(gm: f64, x: &[f64]) -> f64 {
    0.5 * velocity(x).norm_squared() - gm / position(x).norm()
}

/// Two-body orbital period for semi-major axis `a`.
pub fn period(gm: f64, a: f64) -> f64 {
    2.0 * std::f64::consts::PI * (a * a * a / gm).sqrt()
}
