pub mod bc;
pub mod io;
pub mod post;
pub mod streamlines;
pub mod tracers;

pub use streamlines::StreamlineSeed;
pub use tracers::Tracer;

use crate::global_variables::*;
use crate::{LbmError, NodeType, Residuals};
use rayon::prelude::*;
use std::collections::HashMap;
use std::process;
use std::time::{Duration, Instant};

pub const D: usize = 2;

pub const Q: usize = 9;

pub const C: [[i32; D]; Q] = [
    [0, 0],
    [1, 0],
    [0, 1],
    [-1, 0],
    [0, -1],
    [1, 1],
    [-1, 1],
    [-1, -1],
    [1, -1],
];

pub const W: [Float; Q] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Opposite direction of each lattice velocity: `C[Q_BAR[q]] == -C[q]`.
pub const Q_BAR: [usize; Q] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// Second order equilibrium population of direction `q`.
pub fn equilibrium(weight: Float, density: Float, velocity: [Float; D], q: usize) -> Float {
    let [ux, uy] = velocity;
    let cx = C[q][0] as Float;
    let cy = C[q][1] as Float;
    let u_dot_c = ux * cx + uy * cy;
    let u_2 = ux * ux + uy * uy;
    weight
        * density
        * (1.0 + CS_2_INV * u_dot_c + 0.5 * CS_4_INV * u_dot_c * u_dot_c - 0.5 * CS_2_INV * u_2)
}

pub fn equilibrium_distribution(density: Float, velocity: [Float; D]) -> [Float; Q] {
    std::array::from_fn(|q| equilibrium(W[q], density, velocity, q))
}

pub fn relaxation_time(viscosity: Float) -> Float {
    viscosity / CS_2 + 0.5
}

/// Run state of a wind tunnel: the lattice plus everything drawn on top of it.
pub struct Simulation {
    pub case_name: String,
    pub time_step: usize,
    pub simulation_time: Instant,
    running: bool,
    show_tracers: bool,
    show_streamlines: bool,
    obstacle_origin: [usize; D],
    lattice: Lattice,
    tracers: Vec<Tracer>,
    streamline_seeds: Vec<StreamlineSeed>,
}

impl Simulation {
    pub fn new(
        nx: usize,
        ny: usize,
        viscosity: Float,
        free_stream_velocity: [Float; D],
    ) -> Result<Self, LbmError> {
        let lattice = Lattice::new(nx, ny, viscosity, free_stream_velocity)?;
        let tracers = tracers::default_tracers(&lattice);
        let streamline_seeds = streamlines::default_seeds(&lattice);
        Ok(Self {
            case_name: String::from(CASE_NAME),
            time_step: 0,
            simulation_time: Instant::now(),
            running: true,
            show_tracers: true,
            show_streamlines: true,
            obstacle_origin: [nx / 4, ny / 2],
            lattice,
            tracers,
            streamline_seeds,
        })
    }

    pub fn from_conditions(conditions: &HashMap<String, String>) -> Result<Self, LbmError> {
        let case_name = conditions
            .get("case_name")
            .cloned()
            .unwrap_or_else(|| String::from(CASE_NAME));
        let nx = crate::io::parse_parameter(conditions, "nx", DEFAULT_NX)?;
        let ny = crate::io::parse_parameter(conditions, "ny", DEFAULT_NY)?;
        let viscosity = crate::io::parse_parameter(conditions, "viscosity", DEFAULT_VISCOSITY)?;
        let free_stream_velocity = crate::io::parse_pair(
            conditions,
            "free_stream_velocity",
            DEFAULT_FREE_STREAM_VELOCITY,
        )?;
        let obstacle_origin =
            crate::io::parse_pair(conditions, "obstacle_origin", [nx / 4, ny / 2])?;
        let show_tracers = crate::io::parse_parameter(conditions, "tracers", true)?;
        let show_streamlines = crate::io::parse_parameter(conditions, "streamlines", true)?;
        let mut simulation = Simulation::new(nx, ny, viscosity, free_stream_velocity)?;
        simulation.case_name = case_name;
        simulation.obstacle_origin = obstacle_origin;
        simulation.show_tracers = show_tracers;
        simulation.show_streamlines = show_streamlines;
        Ok(simulation)
    }

    /// Advances the lattice by one tick if the simulation is running.
    pub fn advance(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.lattice.step();
        self.after_step();
        true
    }

    pub fn advance_with_timings(&mut self) -> Option<Vec<(&'static str, Duration)>> {
        if !self.running {
            return None;
        }
        let mut elapsed_times = self.lattice.step_with_timings();
        let tracers_time = Instant::now();
        self.after_step();
        elapsed_times.push(("tracers", tracers_time.elapsed()));
        Some(elapsed_times)
    }

    fn after_step(&mut self) {
        if self.show_tracers {
            tracers::advance_tracers(&mut self.tracers, &self.lattice);
        }
        self.time_step += 1;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    pub fn show_tracers(&self) -> bool {
        self.show_tracers
    }

    pub fn set_show_tracers(&mut self, show: bool) {
        self.show_tracers = show;
    }

    pub fn show_streamlines(&self) -> bool {
        self.show_streamlines
    }

    pub fn set_show_streamlines(&mut self, show: bool) {
        self.show_streamlines = show;
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn tracers(&self) -> &[Tracer] {
        &self.tracers
    }

    pub fn streamline_seeds(&self) -> &[StreamlineSeed] {
        &self.streamline_seeds
    }

    pub fn obstacle_origin(&self) -> [usize; D] {
        self.obstacle_origin
    }

    pub fn set_obstacle_origin(&mut self, origin: [usize; D]) {
        self.obstacle_origin = origin;
    }

    /// Resets the whole distribution to the uniform equilibrium of `velocity`.
    pub fn set_free_stream_velocity(&mut self, velocity: [Float; D]) {
        self.lattice.set_free_stream_velocity(velocity);
    }

    /// Replaces the obstacle with the cells `obstacle_origin + offset` and
    /// rebuilds tracers and streamline seeds.
    pub fn bind_obstacle(&mut self, offsets: &[[Float; D]]) -> Result<(), LbmError> {
        self.lattice.bind_obstacle(self.obstacle_origin, offsets)?;
        self.tracers = tracers::default_tracers(&self.lattice);
        self.streamline_seeds = streamlines::default_seeds(&self.lattice);
        Ok(())
    }

    /// Streamlines of the current field, or none while they are hidden.
    pub fn streamlines(&self) -> Vec<Vec<[Float; D]>> {
        if !self.show_streamlines {
            return Vec::new();
        }
        streamlines::trace_all(&self.streamline_seeds, &self.lattice)
    }

    /// Recomputes the curl if a step happened since the last refresh.
    pub fn refresh_curl(&mut self) {
        if self.lattice.curl_is_stale() {
            self.lattice.update_curl();
        }
    }
}

/// Grid state: populations plus the macroscopic fields derived from them,
/// stored as one array per field indexed by `y * nx + x`.
pub struct Lattice {
    pub nx: usize,
    pub ny: usize,
    pub viscosity: Float,
    pub tau: Float,
    pub omega: Float,
    pub omega_prime: Float,
    free_stream_velocity: [Float; D],
    f: Vec<[Float; Q]>,
    f_star: Vec<[Float; Q]>,
    density: Vec<Float>,
    velocity: Vec<[Float; D]>,
    pressure: Vec<Float>,
    pressure_gradient: Vec<[Float; D]>,
    curl: Vec<Float>,
    curl_is_stale: bool,
    node_types: Vec<NodeType>,
}

impl Lattice {
    pub fn new(
        nx: usize,
        ny: usize,
        viscosity: Float,
        free_stream_velocity: [Float; D],
    ) -> Result<Self, LbmError> {
        if nx < MIN_DIMENSION || ny < MIN_DIMENSION {
            return Err(LbmError::InvalidDimensions { nx, ny });
        }
        if !(viscosity > 0.0) {
            return Err(LbmError::InvalidParameter {
                key: String::from("viscosity"),
                value: viscosity.to_string(),
            });
        }
        let tau = relaxation_time(viscosity);
        let omega = DELTA_T / tau;
        let omega_prime = 1.0 - omega;
        let number_of_nodes = nx * ny;
        let mut lattice = Self {
            nx,
            ny,
            viscosity,
            tau,
            omega,
            omega_prime,
            free_stream_velocity,
            f: vec![[0.0; Q]; number_of_nodes],
            f_star: vec![[0.0; Q]; number_of_nodes],
            density: vec![0.0; number_of_nodes],
            velocity: vec![[0.0; D]; number_of_nodes],
            pressure: vec![0.0; number_of_nodes],
            pressure_gradient: vec![[0.0; D]; number_of_nodes],
            curl: vec![0.0; number_of_nodes],
            curl_is_stale: false,
            node_types: vec![NodeType::Fluid; number_of_nodes],
        };
        lattice.initialize_distribution();
        Ok(lattice)
    }

    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.nx + x
    }

    pub fn number_of_nodes(&self) -> usize {
        self.nx * self.ny
    }

    fn initialize_distribution(&mut self) {
        let f_eq = equilibrium_distribution(LATTICE_DENSITY, self.free_stream_velocity);
        self.f.fill(f_eq);
        self.f_star.fill(f_eq);
        self.density.fill(LATTICE_DENSITY);
        self.velocity.fill(self.free_stream_velocity);
        self.pressure.fill(CS_2 * LATTICE_DENSITY);
        self.pressure_gradient.fill([0.0; D]);
        self.curl.fill(0.0);
        self.curl_is_stale = true;
    }

    pub fn set_free_stream_velocity(&mut self, velocity: [Float; D]) {
        self.free_stream_velocity = velocity;
        self.initialize_distribution();
    }

    /// One tick: moments, bounce-back, collision, streaming, then the
    /// pressure gradient of the moments taken at the start of the tick.
    pub fn step(&mut self) {
        self.update_moments();
        self.bounce_back();
        self.collision_step();
        self.streaming_step();
        self.update_pressure_gradient();
        self.curl_is_stale = true;
    }

    pub fn step_with_timings(&mut self) -> Vec<(&'static str, Duration)> {
        let um_time = Instant::now();
        self.update_moments();
        let um_duration = um_time.elapsed();

        let bb_time = Instant::now();
        self.bounce_back();
        let bb_duration = bb_time.elapsed();

        let cs_time = Instant::now();
        self.collision_step();
        let cs_duration = cs_time.elapsed();

        let ss_time = Instant::now();
        self.streaming_step();
        let ss_duration = ss_time.elapsed();

        let pg_time = Instant::now();
        self.update_pressure_gradient();
        let pg_duration = pg_time.elapsed();

        self.curl_is_stale = true;
        vec![
            ("um", um_duration),
            ("bb", bb_duration),
            ("cs", cs_duration),
            ("ss", ss_duration),
            ("pg", pg_duration),
        ]
    }

    pub fn update_moments(&mut self) {
        self.f
            .par_iter()
            .zip(self.density.par_iter_mut())
            .zip(self.velocity.par_iter_mut())
            .zip(self.pressure.par_iter_mut())
            .for_each(|(((f, density), velocity), pressure)| {
                *density = f.iter().sum();
                *velocity = if *density > 0.0 {
                    [
                        (1.0 / *density) * (f[1] - f[3] + f[5] - f[6] - f[7] + f[8]),
                        (1.0 / *density) * (f[2] - f[4] + f[5] + f[6] - f[7] - f[8]),
                    ]
                } else {
                    [0.0; D]
                };
                *pressure = CS_2 * *density;
            });
    }

    /// BGK relaxation into the post-collision buffer. The last two rows and
    /// columns are copied through unrelaxed.
    pub fn collision_step(&mut self) {
        let nx = self.nx;
        let ny = self.ny;
        let omega = self.omega;
        let omega_prime = self.omega_prime;
        self.f_star
            .par_chunks_mut(nx)
            .zip(self.f.par_chunks(nx))
            .zip(self.density.par_chunks(nx))
            .zip(self.velocity.par_chunks(nx))
            .enumerate()
            .for_each(|(j, (((f_star_row, f_row), density_row), velocity_row))| {
                for i in 0..nx {
                    if i >= nx - 2 || j >= ny - 2 {
                        f_star_row[i] = f_row[i];
                        continue;
                    }
                    let density = density_row[i];
                    let velocity = velocity_row[i];
                    for q in 0..Q {
                        f_star_row[i][q] = omega_prime * f_row[i][q]
                            + omega * equilibrium(W[q], density, velocity, q);
                    }
                }
            });
    }

    /// Pull streaming from the post-collision buffer. Interior nodes receive
    /// `f_star[x - cx, y - cy][q]`, the outer ring keeps its own values.
    pub fn streaming_step(&mut self) {
        let nx = self.nx;
        let ny = self.ny;
        let f_star = &self.f_star;
        self.f
            .par_chunks_mut(nx)
            .enumerate()
            .for_each(|(j, f_row)| {
                for i in 0..nx {
                    let interior = i >= 1 && i < nx - 1 && j >= 1 && j < ny - 1;
                    if !interior {
                        f_row[i] = f_star[j * nx + i];
                        continue;
                    }
                    for q in 0..Q {
                        let [cx, cy] = C[q];
                        let source_i = ((i as i32) - cx) as usize;
                        let source_j = ((j as i32) - cy) as usize;
                        f_row[i][q] = f_star[source_j * nx + source_i][q];
                    }
                }
            });
    }

    pub fn total_density(&self) -> Float {
        self.density.par_iter().sum::<Float>()
    }

    pub fn total_mass(&self) -> Float {
        self.f
            .par_iter()
            .map(|f| f.iter().sum::<Float>())
            .sum::<Float>()
    }

    pub fn distribution(&self) -> &[[Float; Q]] {
        &self.f
    }

    pub fn density(&self) -> &[Float] {
        &self.density
    }

    pub fn velocity(&self) -> &[[Float; D]] {
        &self.velocity
    }

    pub fn velocity_at(&self, x: usize, y: usize) -> [Float; D] {
        self.velocity[self.index(x, y)]
    }

    pub fn pressure(&self) -> &[Float] {
        &self.pressure
    }

    pub fn pressure_gradient(&self) -> &[[Float; D]] {
        &self.pressure_gradient
    }

    pub fn curl(&self) -> &[Float] {
        &self.curl
    }

    pub fn curl_is_stale(&self) -> bool {
        self.curl_is_stale
    }

    pub fn node_types(&self) -> &[NodeType] {
        &self.node_types
    }

    pub fn is_solid(&self, x: usize, y: usize) -> bool {
        self.node_types[self.index(x, y)] == NodeType::Solid
    }

    pub fn free_stream_velocity(&self) -> [Float; D] {
        self.free_stream_velocity
    }

    pub fn fluid_density(&self) -> Float {
        LATTICE_DENSITY
    }

    pub fn snapshot(&self) -> ShallowLattice {
        let mut shallow_lattice = ShallowLattice::new(self.nx, self.ny);
        shallow_lattice.update_shallow_lattice(self);
        shallow_lattice
    }

    pub fn compute_residuals(&self, old_lattice: &ShallowLattice) -> Residuals {
        let density = self
            .density
            .par_iter()
            .zip(old_lattice.density.par_iter())
            .map(|(new, old)| (new - old).powi(2))
            .sum::<Float>()
            .sqrt();
        let velocity_x = self
            .velocity
            .par_iter()
            .zip(old_lattice.velocity.par_iter())
            .map(|(new, old)| (new[0] - old[0]).powi(2))
            .sum::<Float>()
            .sqrt();
        let velocity_y = self
            .velocity
            .par_iter()
            .zip(old_lattice.velocity.par_iter())
            .map(|(new, old)| (new[1] - old[1]).powi(2))
            .sum::<Float>()
            .sqrt();
        Residuals {
            density,
            velocity: vec![velocity_x, velocity_y],
        }
    }
}

/// Owned copy of the macroscopic fields, taken between ticks.
#[derive(Clone, Debug)]
pub struct ShallowLattice {
    pub nx: usize,
    pub ny: usize,
    pub density: Vec<Float>,
    pub velocity: Vec<[Float; D]>,
    pub pressure: Vec<Float>,
}

impl ShallowLattice {
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            density: vec![0.0; nx * ny],
            velocity: vec![[0.0; D]; nx * ny],
            pressure: vec![0.0; nx * ny],
        }
    }

    pub fn update_shallow_lattice(&mut self, lattice: &Lattice) {
        self.density.copy_from_slice(&lattice.density);
        self.velocity.copy_from_slice(&lattice.velocity);
        self.pressure.copy_from_slice(&lattice.pressure);
    }
}

pub fn run(steps: usize) {
    let mut simulation = match Simulation::build_case_conditions() {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("Error while building the case: {e}.");
            process::exit(1);
        }
    };

    simulation.print_stability_warnings();

    if let Err(e) = simulation.write_post_processing(post::compute_solid_fraction, "solid_fraction.dat")
    {
        eprintln!("Error while writing the solid fraction file: {e}.");
        process::exit(1);
    };

    while simulation.time_step < steps {
        let old_lattice = simulation.lattice().snapshot();

        simulation.advance();

        let residuals = simulation.lattice().compute_residuals(&old_lattice);

        simulation.print_residuals(&residuals);
        if let Err(e) = simulation.write_residuals(&residuals) {
            eprintln!("Error while writing the residuals file: {e}.");
            process::exit(1);
        };

        if let Err(e) = simulation.write_post_processing_from_each_n_steps(
            10,
            post::compute_mean_density,
            "mean_density.dat",
        ) {
            eprintln!("Error while writing the mean density file: {e}.");
            process::exit(1);
        };

        if let Err(e) = simulation.write_post_processing_from_each_n_steps(
            10,
            post::compute_max_velocity,
            "max_velocity.dat",
        ) {
            eprintln!("Error while writing the max velocity file: {e}.");
            process::exit(1);
        };
    }

    simulation.refresh_curl();
    simulation.print_summary();
}

pub fn run_benchmark(steps: usize) {
    let bcc_time = Instant::now();
    let mut simulation = match Simulation::build_case_conditions() {
        Ok(simulation) => simulation,
        Err(e) => {
            eprintln!("Error while building the case: {e}.");
            process::exit(1);
        }
    };
    let bcc_duration = bcc_time.elapsed();

    while simulation.time_step < steps {
        let loop_time = Instant::now();
        let time_step = simulation.time_step;

        let gsl_time = Instant::now();
        let old_lattice = simulation.lattice().snapshot();
        let gsl_duration = gsl_time.elapsed();

        let Some(step_durations) = simulation.advance_with_timings() else {
            break;
        };

        let cr_time = Instant::now();
        let residuals = simulation.lattice().compute_residuals(&old_lattice);
        let cr_duration = cr_time.elapsed();

        let sl_time = Instant::now();
        if simulation.show_streamlines() {
            let _ = simulation.streamlines();
        }
        let sl_duration = sl_time.elapsed();

        let curl_time = Instant::now();
        simulation.refresh_curl();
        let curl_duration = curl_time.elapsed();

        simulation.print_residuals(&residuals);

        let loop_duration = loop_time.elapsed();

        let mut elapsed_times = vec![("bcc", bcc_duration), ("gsl", gsl_duration)];
        elapsed_times.extend(step_durations);
        elapsed_times.extend([
            ("cr", cr_duration),
            ("sl", sl_duration),
            ("curl", curl_duration),
            ("loop", loop_duration),
        ]);

        let _ = crate::io::write_inside_loop_elapsed_time(&elapsed_times, &time_step);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_lattice(nx: usize, ny: usize, tau: Float) -> Lattice {
        let viscosity = CS_2 * (tau - 0.5);
        Lattice::new(nx, ny, viscosity, [0.1, 0.0]).unwrap()
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum: Float = W.iter().sum();
        assert!((sum - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_opposite_involution() {
        for q in 0..Q {
            assert_eq!(Q_BAR[Q_BAR[q]], q);
            assert_eq!(C[Q_BAR[q]][0], -C[q][0]);
            assert_eq!(C[Q_BAR[q]][1], -C[q][1]);
        }
    }

    #[test]
    fn test_equilibrium_at_rest_equals_weights() {
        for q in 0..Q {
            assert!((equilibrium(W[q], 1.0, [0.0, 0.0], q) - W[q]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_equilibrium_recovers_moments() {
        let density = 1.2;
        let velocity = [0.05, -0.03];
        let f_eq = equilibrium_distribution(density, velocity);
        let rho: Float = f_eq.iter().sum();
        let jx: Float = (0..Q).map(|q| f_eq[q] * C[q][0] as Float).sum();
        let jy: Float = (0..Q).map(|q| f_eq[q] * C[q][1] as Float).sum();
        assert!((rho - density).abs() < 1e-12);
        assert!((jx / rho - velocity[0]).abs() < 1e-12);
        assert!((jy / rho - velocity[1]).abs() < 1e-12);
    }

    #[test]
    fn test_relaxation_time() {
        assert!((relaxation_time(0.1 / 3.0) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(matches!(
            Lattice::new(4, 10, 0.02, [0.1, 0.0]),
            Err(LbmError::InvalidDimensions { nx: 4, ny: 10 })
        ));
        assert!(Lattice::new(10, 10, 0.0, [0.1, 0.0]).is_err());
    }

    #[test]
    fn test_equilibrium_is_fixed_point_of_collision() {
        for &tau in &[0.55, 0.6, 0.9, 1.7] {
            let mut lattice = uniform_lattice(12, 9, tau);
            lattice.update_moments();
            lattice.collision_step();
            for (f, f_star) in lattice.f.iter().zip(lattice.f_star.iter()) {
                for q in 0..Q {
                    assert!((f[q] - f_star[q]).abs() < 1e-14);
                }
            }
        }
    }

    #[test]
    fn test_streaming_moves_populations_along_their_velocity() {
        let mut lattice = uniform_lattice(8, 8, 0.6);
        let marker = lattice.index(3, 4);
        for q in 1..Q {
            lattice.f_star.fill([0.0; Q]);
            lattice.f_star[marker][q] = 1.0;
            lattice.streaming_step();
            let [cx, cy] = C[q];
            let target = lattice.index((3 + cx) as usize, (4 + cy) as usize);
            assert_eq!(lattice.f[target][q], 1.0);
            let moved: Float = lattice.f.iter().map(|f| f[q]).sum();
            assert_eq!(moved, 1.0);
        }
    }

    #[test]
    fn test_mass_conserved_while_pulse_stays_interior() {
        let mut lattice = Lattice::new(60, 60, CS_2 * 0.3, [0.0, 0.0]).unwrap();
        let center = lattice.index(30, 30);
        lattice.f[center] = equilibrium_distribution(1.5, [0.0, 0.0]);
        let initial_mass = lattice.total_mass();
        assert!((initial_mass - 3600.5).abs() < 1e-9);
        for _ in 0..20 {
            lattice.step();
        }
        assert!((lattice.total_mass() - initial_mass).abs() < 1e-9);
        let spread = lattice.density[lattice.index(40, 30)];
        assert!((spread - LATTICE_DENSITY).abs() > 1e-12);
    }

    #[test]
    fn test_outer_ring_absorbs_pulse_once_reached() {
        let mut lattice = Lattice::new(60, 60, CS_2 * 0.3, [0.0, 0.0]).unwrap();
        let center = lattice.index(30, 30);
        lattice.f[center] = equilibrium_distribution(1.5, [0.0, 0.0]);
        let initial_mass = lattice.total_mass();
        for _ in 0..200 {
            lattice.step();
        }
        assert!(initial_mass - lattice.total_mass() > 0.1);
    }

    #[test]
    fn test_moments_guard_zero_density() {
        let mut lattice = uniform_lattice(6, 6, 0.6);
        lattice.f[0] = [0.0; Q];
        lattice.update_moments();
        assert_eq!(lattice.density[0], 0.0);
        assert_eq!(lattice.velocity[0], [0.0, 0.0]);
    }

    #[test]
    fn test_set_free_stream_velocity_reinitializes() {
        let mut lattice = uniform_lattice(10, 10, 0.6);
        for _ in 0..5 {
            lattice.step();
        }
        lattice.set_free_stream_velocity([0.05, 0.02]);
        let f_eq = equilibrium_distribution(LATTICE_DENSITY, [0.05, 0.02]);
        assert!(lattice.f.iter().all(|f| *f == f_eq));
        assert!(lattice.velocity.iter().all(|u| *u == [0.05, 0.02]));
        assert_eq!(lattice.free_stream_velocity(), [0.05, 0.02]);
    }

    #[test]
    fn test_residuals_vanish_for_steady_free_stream() {
        let mut lattice = uniform_lattice(10, 10, 0.6);
        lattice.step();
        let old_lattice = lattice.snapshot();
        lattice.step();
        let residuals = lattice.compute_residuals(&old_lattice);
        assert!(residuals.density < 1e-12);
        assert!(residuals.velocity.iter().all(|r| *r < 1e-12));
    }

    #[test]
    fn test_simulation_pause_resume() {
        let mut simulation = Simulation::new(12, 10, 0.02, [0.1, 0.0]).unwrap();
        assert!(simulation.advance());
        simulation.toggle_running();
        assert!(!simulation.is_running());
        assert!(!simulation.advance());
        assert_eq!(simulation.time_step, 1);
        simulation.set_running(true);
        assert!(simulation.advance());
        assert_eq!(simulation.time_step, 2);
    }

    #[test]
    fn test_simulation_from_conditions() {
        let conditions = crate::io::extract_parameters(
            "nx = 40\nny = 20\nviscosity = 0.05\nfree_stream_velocity = 0.08 0.0\ntracers = false\n",
        );
        let simulation = Simulation::from_conditions(&conditions).unwrap();
        assert_eq!(simulation.lattice().nx, 40);
        assert_eq!(simulation.lattice().ny, 20);
        assert_eq!(simulation.lattice().free_stream_velocity(), [0.08, 0.0]);
        assert!(!simulation.show_tracers());
        assert!(simulation.show_streamlines());
        assert_eq!(simulation.obstacle_origin(), [10, 10]);
    }

    #[test]
    fn test_hidden_streamlines_are_not_traced() {
        let mut simulation = Simulation::new(30, 16, 0.02, [0.1, 0.0]).unwrap();
        assert_eq!(simulation.streamlines().len(), 2);
        simulation.set_show_streamlines(false);
        assert!(simulation.streamlines().is_empty());
        assert_eq!(simulation.streamline_seeds().len(), 2);
        simulation.set_show_streamlines(true);
        assert_eq!(simulation.streamlines().len(), 2);
    }

    #[test]
    fn test_hidden_tracers_do_not_move() {
        let mut simulation = Simulation::new(20, 12, 0.02, [0.1, 0.0]).unwrap();
        simulation.set_show_tracers(false);
        let before = simulation.tracers().to_vec();
        simulation.advance();
        assert_eq!(simulation.tracers(), before.as_slice());
    }
}
