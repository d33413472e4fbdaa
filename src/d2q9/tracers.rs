use super::*;
use crate::global_variables::*;
use rayon::prelude::*;

/// Bilinear interpolation of the lattice velocity at a continuous position.
/// When a coordinate is an integer the upper sample is moved one node up so
/// the interpolation cell never collapses. The position must lie in
/// `[0, nx-2] x [0, ny-2]`.
pub fn sample_velocity(lattice: &Lattice, position: [Float; D]) -> [Float; D] {
    let [x, y] = position;
    debug_assert!(x >= 0.0 && x <= (lattice.nx - 2) as Float);
    debug_assert!(y >= 0.0 && y <= (lattice.ny - 2) as Float);
    let x0 = x.floor();
    let mut x1 = x.ceil();
    if x1 == x0 {
        x1 += 1.0;
    }
    let y0 = y.floor();
    let mut y1 = y.ceil();
    if y1 == y0 {
        y1 += 1.0;
    }
    let u00 = lattice.velocity_at(x0 as usize, y0 as usize);
    let u10 = lattice.velocity_at(x1 as usize, y0 as usize);
    let u01 = lattice.velocity_at(x0 as usize, y1 as usize);
    let u11 = lattice.velocity_at(x1 as usize, y1 as usize);
    let area = (x1 - x0) * (y1 - y0);
    std::array::from_fn(|k| {
        (u00[k] * (x1 - x) * (y1 - y)
            + u10[k] * (x - x0) * (y1 - y)
            + u01[k] * (x1 - x) * (y - y0)
            + u11[k] * (x - x0) * (y - y0))
            / area
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct Tracer {
    pub position: [Float; D],
    pub velocity: [Float; D],
    pub x_bounds: [Float; D],
    seed_y: Float,
}

impl Tracer {
    pub fn new(position: [Float; D], x_bounds: [Float; D]) -> Self {
        Self {
            position,
            velocity: [0.0; D],
            x_bounds,
            seed_y: position[1],
        }
    }

    /// One Euler step with the interpolated velocity. A tracer that leaves
    /// through the right bound or lands on a solid node starts again at the
    /// left bound; one that drifts out vertically returns to its seed row.
    pub fn advance(&mut self, lattice: &Lattice) {
        let [left, right] = self.x_bounds;
        if !self.position.iter().all(|p| p.is_finite()) {
            self.position = [left, self.seed_y];
            self.velocity = [0.0; D];
            return;
        }
        self.velocity = sample_velocity(lattice, self.position);
        let mut x = self.position[0] + self.velocity[0];
        let mut y = self.position[1] + self.velocity[1];
        if !(1.0..=(lattice.ny - 2) as Float).contains(&y) {
            y = self.seed_y;
        }
        if !(left..=right).contains(&x) {
            x = left;
        } else if lattice.is_solid(x.round() as usize, y.round() as usize) {
            x = left;
        }
        self.position = [x, y];
    }
}

/// Tracers on a regular grid of fluid nodes, recycled between `x = 1` and
/// `x = nx - 2`.
pub fn default_tracers(lattice: &Lattice) -> Vec<Tracer> {
    let x_bounds = [1.0, (lattice.nx - 2) as Float];
    let mut tracers = Vec::new();
    for j in (TRACER_SPACING_Y..lattice.ny - 1).step_by(TRACER_SPACING_Y) {
        for i in (1..lattice.nx - 2).step_by(TRACER_SPACING_X) {
            if lattice.is_solid(i, j) {
                continue;
            }
            tracers.push(Tracer::new([i as Float, j as Float], x_bounds));
        }
    }
    tracers
}

pub fn advance_tracers(tracers: &mut [Tracer], lattice: &Lattice) {
    tracers
        .par_iter_mut()
        .for_each(|tracer| tracer.advance(lattice));
}
