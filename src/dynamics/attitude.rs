use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::sim::integrator::DifferentialSystem;

// ---------------------------------------------------------------------------
// Rigid-body attitude: quaternion + body rates
// ---------------------------------------------------------------------------

/// Rotational dynamics of a rigid body about its principal axes.
///
/// State: `[qw, qx, qy, qz, wx, wy, wz]`, with q the body-to-inertial
/// rotation and w the body-frame angular velocity (rad per time unit).
#[derive(Debug, Clone)]
pub struct AttitudeModel {
    pub inertia: Vector3<f64>, // principal moments
    pub torque: Vector3<f64>,  // constant body-frame torque
}

impl AttitudeModel {
    pub fn torque_free(inertia: Vector3<f64>) -> Self {
        Self {
            inertia,
            torque: Vector3::zeros(),
        }
    }

    /// Euler's equations: I w' = tau - w x (I w).
    pub fn angular_acceleration(&self, omega: &Vector3<f64>) -> Vector3<f64> {
        let i_omega = self.inertia.component_mul(omega);
        (self.torque - omega.cross(&i_omega)).component_div(&self.inertia)
    }

    /// Body-frame angular momentum.
    pub fn angular_momentum(&self, omega: &Vector3<f64>) -> Vector3<f64> {
        self.inertia.component_mul(omega)
    }

    pub fn kinetic_energy(&self, omega: &Vector3<f64>) -> f64 {
        0.5 * omega.dot(&self.angular_momentum(omega))
    }
}

impl DifferentialSystem for AttitudeModel {
    fn order(&self) -> usize {
        7
    }

    fn derivatives(&mut self, _t: f64, x: &[f64], xdot: &mut [f64]) {
        let q = Quaternion::new(x[0], x[1], x[2], x[3]);
        let omega = Vector3::new(x[4], x[5], x[6]);

        // q' = 1/2 q (x) (0, w)
        let dq = q * Quaternion::from_imag(omega) * 0.5;
        let domega = self.angular_acceleration(&omega);

        xdot[0] = dq.w;
        xdot[1] = dq.i;
        xdot[2] = dq.j;
        xdot[3] = dq.k;
        xdot[4] = domega.x;
        xdot[5] = domega.y;
        xdot[6] = domega.z;
    }
}

/// Pack attitude and body rates into a 7-element state.
pub fn state_vector(q: &UnitQuaternion<f64>, omega: &Vector3<f64>) -> Vec<f64> {
    let q = q.quaternion();
    vec![q.w, q.i, q.j, q.k, omega.x, omega.y, omega.z]
}

/// Attitude from a state, renormalized.
pub fn attitude(x: &[f64]) -> UnitQuaternion<f64> {
    UnitQuaternion::new_normalize(Quaternion::new(x[0], x[1], x[2], x[3]))
}

pub fn body_rates(x: &[f64]) -> Vector3<f64> {
    Vector3::new(x[4], x[5], x[6])
}

/// Renormalize the quaternion part of a state in place.
pub fn normalize(x: &mut [f64]) {
    let n = (x[0] * x[0] + x[1] * x[1] + x[2] * x[2] + x[3] * x[3]).sqrt();
    x[..4].iter_mut().for_each(|v| *v /= n);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::integrator::Rk4;
    use crate::sim::propagator::Propagator;
    use crate::sim::scheduler::{StepScheduler, Steppable};
    use approx::assert_relative_eq;

    fn tumbling() -> (AttitudeModel, Vec<f64>) {
        let model = AttitudeModel::torque_free(Vector3::new(2.0, 3.0, 4.0));
        let x0 = state_vector(&UnitQuaternion::identity(), &Vector3::new(0.3, 0.05, 0.2));
        (model, x0)
    }

    #[test]
    fn spin_about_principal_axis_is_steady() {
        let model = AttitudeModel::torque_free(Vector3::new(5.0, 5.0, 1.0));
        let x0 = state_vector(&UnitQuaternion::identity(), &Vector3::new(0.0, 0.0, 0.5));
        let mut p = Propagator::new(model, Rk4::new(7), 0.0, x0, 0.01).unwrap();
        for _ in 0..200 {
            p.advance();
        }
        let q = attitude(p.state());
        assert_relative_eq!(body_rates(p.state()), Vector3::new(0.0, 0.0, 0.5), epsilon = 1e-12);
        // 2 time units at 0.5 rad/unit about z
        assert_relative_eq!(q.angle(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(q.axis().unwrap().into_inner(), Vector3::z(), epsilon = 1e-9);
    }

    #[test]
    fn torque_free_invariants_hold() {
        let (model, x0) = tumbling();
        let e0 = model.kinetic_energy(&body_rates(&x0));
        let q0 = attitude(&x0);
        let h0 = q0 * model.angular_momentum(&body_rates(&x0));

        let mut p = Propagator::new(model, Rk4::new(7), 0.0, x0, 0.01).unwrap();
        let sched = StepScheduler::new(0.01, 0.5);
        for _ in 0..40 {
            sched.step(&mut p);
        }

        let x = p.state();
        let m = p.system();
        let qnorm = Quaternion::new(x[0], x[1], x[2], x[3]).norm();
        assert_relative_eq!(qnorm, 1.0, epsilon = 1e-8);
        assert_relative_eq!(m.kinetic_energy(&body_rates(x)), e0, max_relative = 1e-8);
        // inertial angular momentum is fixed
        let h = attitude(x) * m.angular_momentum(&body_rates(x));
        assert_relative_eq!(h, h0, epsilon = 1e-7);
    }

    #[test]
    fn constant_torque_spins_up() {
        let mut model = AttitudeModel::torque_free(Vector3::new(1.0, 1.0, 2.0));
        model.torque = Vector3::new(0.0, 0.0, 0.4);
        let x0 = state_vector(&UnitQuaternion::identity(), &Vector3::zeros());
        let mut p = Propagator::new(model, Rk4::new(7), 0.0, x0, 0.05).unwrap();
        for _ in 0..20 {
            p.advance();
        }
        // w_z = tau / I * t
        assert_relative_eq!(p.state()[6], 0.2, epsilon = 1e-12);
    }

    #[test]
    fn normalize_restores_unit_quaternion() {
        let mut x = vec![2.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0];
        normalize(&mut x);
        assert_eq!(&x[..4], &[1.0, 0.0, 0.0, 0.0]);
        assert_eq!(&x[4..], &[1.0, 2.0, 3.0]);
    }
}
