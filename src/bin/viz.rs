use std::sync::Arc;

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use nalgebra::Vector3;

use vehsim::dynamics::orbit::{self, OrbitModel};
use vehsim::physics::{CentralBody, GravityAcceleration, GravityField, Spherical, Wgs84Egm96};
use vehsim::sim::{self, PropagationConfig, Rk4, Sample};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

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
        odt: 30.0,
        duration: 3.0 * orbit::period(body.gm(), r0),
        ..Default::default()
    };

    let gravity = GravityAcceleration::new(field, config.degree, config.order);
    let harmonic = OrbitModel::harmonic(gravity, body.rotation_rate());
    let (trajectory, kepler) = match (
        sim::propagate(harmonic, Rk4::new(6), x0.clone(), &config),
        sim::propagate(OrbitModel::point_mass(body.gm()), Rk4::new(6), x0, &config),
    ) {
        (Ok(t), Ok(k)) => (t, k),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("propagation failed: {e}");
            std::process::exit(1);
        }
    };

    let app = OrbitViz {
        trajectory,
        kepler,
        re: body.reference_radius(),
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Orbit Propagation", options, Box::new(|_| Ok(Box::new(app))))
}

struct OrbitViz {
    trajectory: Vec<Sample>,
    kepler: Vec<Sample>,
    re: f64,
}

impl eframe::App for OrbitViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("WGS84 / EGM96 4x4 vs two-body");
            ui.label(format!(
                "Samples: {}  |  Span: {:.0} min",
                self.trajectory.len(),
                self.trajectory.last().map_or(0.0, |s| s.time) / 60.0,
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_w = available.x / 2.0 - 8.0;
            let half_h = available.y / 2.0 - 8.0;

            ui.horizontal(|ui| {
                // Altitude vs Time
                ui.vertical(|ui| {
                    ui.label("Altitude (km)");
                    let points: PlotPoints = self
                        .trajectory
                        .iter()
                        .map(|s| {
                            let alt = orbit::position(&s.state).norm() - self.re;
                            [s.time / 60.0, alt / 1000.0]
                        })
                        .collect();
                    Plot::new("altitude")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (min)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Altitude", points));
                        });
                });

                // Separation from the two-body solution
                ui.vertical(|ui| {
                    ui.label("Separation from two-body (km)");
                    let points: PlotPoints = self
                        .trajectory
                        .iter()
                        .zip(&self.kepler)
                        .map(|(s, k)| {
                            let d = orbit::position(&s.state) - orbit::position(&k.state);
                            [s.time / 60.0, d.norm() / 1000.0]
                        })
                        .collect();
                    Plot::new("separation")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Time (min)")
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Separation", points));
                        });
                });
            });

            ui.horizontal(|ui| {
                // Inertial latitude/longitude track
                ui.vertical(|ui| {
                    ui.label("Inertial track (deg)");
                    let points: PlotPoints = self
                        .trajectory
                        .iter()
                        .map(|s| {
                            let sph = Spherical::from_cartesian(&orbit::position(&s.state));
                            [sph.lon.to_degrees(), sph.lat.to_degrees()]
                        })
                        .collect();
                    Plot::new("track")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("Longitude (deg)")
                        .show(ui, |plot_ui| {
                            plot_ui.points(egui_plot::Points::new("Track", points).radius(1.5));
                        });
                });

                // Orbit plane projection
                ui.vertical(|ui| {
                    ui.label("Equatorial projection (km)");
                    let points: PlotPoints = self
                        .trajectory
                        .iter()
                        .map(|s| [s.state[0] / 1000.0, s.state[1] / 1000.0])
                        .collect();
                    Plot::new("projection")
                        .width(half_w)
                        .height(half_h)
                        .x_axis_label("x (km)")
                        .data_aspect(1.0)
                        .show(ui, |plot_ui| {
                            plot_ui.line(Line::new("Orbit", points));
                        });
                });
            });
        });
    }
}
