use std::sync::Arc;

use nalgebra::Vector3;

use vehsim::dynamics::orbit::{self, OrbitModel};
use vehsim::io::csv;
use vehsim::physics::{CentralBody, GravityAcceleration, GravityField, Spherical, Wgs84Egm96};
use vehsim::sim::{self, PropagationConfig, Rk4, Sample};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    // -----------------------------------------------------------------------
    // Central body and initial orbit: 400 km circular, 51.6 deg inclination
    // -----------------------------------------------------------------------
    let body = Wgs84Egm96::metric();
    let field = Arc::new(GravityField::from_body(&body));

    let r0 = body.reference_radius() + 400_000.0;
    let inc = 51.6_f64.to_radians();
    let v0 = orbit::circular_velocity(body.gm(), r0);
    let x0 = orbit::state_vector(
        &Vector3::new(r0, 0.0, 0.0),
        &Vector3::new(0.0, v0 * inc.cos(), v0 * inc.sin()),
    );

    let config = PropagationConfig {
        duration: orbit::period(body.gm(), r0),
        ..Default::default()
    };

    // -----------------------------------------------------------------------
    // Propagate under the harmonic field and under point mass
    // -----------------------------------------------------------------------
    let gravity = GravityAcceleration::new(field, config.degree, config.order);
    let harmonic = OrbitModel::harmonic(gravity, body.rotation_rate());
    let traj = sim::propagate(harmonic, Rk4::new(6), x0.clone(), &config)?;
    let kepler = sim::propagate(OrbitModel::point_mass(body.gm()), Rk4::new(6), x0, &config)?;

    print_report(&body, &config, &traj, &kepler);

    if let Some(path) = std::env::args().nth(1) {
        csv::write_samples_file(&path, &traj)?;
        println!("  Trajectory written to {path}");
    }
    Ok(())
}

fn print_report(body: &Wgs84Egm96, config: &PropagationConfig, traj: &[Sample], kepler: &[Sample]) {
    let re = body.reference_radius();

    println!();
    println!("====================================================================");
    println!("  ORBIT PROPAGATION — WGS84 / EGM96 {}x{}", config.degree, config.order);
    println!("====================================================================");
    println!();
    println!(
        "  dt = {} s   output every {} s   span {:.0} s   {} samples",
        config.dt,
        config.odt,
        config.duration,
        traj.len()
    );
    println!();
    println!(
        "  {:>8}  {:>9}  {:>8}  {:>9}  {:>12}",
        "t (s)", "alt (km)", "lat (deg)", "lon (deg)", "vs 2-body (m)"
    );
    println!("  {}", "─".repeat(56));

    let sample_interval = (traj.len() / 20).max(1);
    for (i, (s, k)) in traj.iter().zip(kepler).enumerate() {
        if i % sample_interval != 0 && i != traj.len() - 1 {
            continue;
        }
        let pos = orbit::position(&s.state);
        let sph = Spherical::from_cartesian(&pos);
        let sep = (pos - orbit::position(&k.state)).norm();
        println!(
            "  {:>8.0}  {:>9.2}  {:>8.3}  {:>9.3}  {:>12.1}",
            s.time,
            (sph.r - re) / 1000.0,
            sph.lat.to_degrees(),
            sph.lon.to_degrees(),
            sep
        );
    }

    if let (Some(first), Some(last)) = (traj.first(), traj.last()) {
        let e0 = orbit::specific_energy(body.gm(), &first.state);
        let e1 = orbit::specific_energy(body.gm(), &last.state);
        println!();
        println!("  Two-body energy change: {:.3e} (relative)", (e1 - e0) / e0.abs());
    }
    println!("====================================================================");
    println!();
}
