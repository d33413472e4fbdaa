use super::tracers::sample_velocity;
use super::*;
use crate::global_variables::*;
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamlineSeed {
    origin: [Float; D],
    max_steps: usize,
}

impl StreamlineSeed {
    pub fn new(origin: [Float; D], max_steps: usize) -> Self {
        Self { origin, max_steps }
    }

    pub fn origin(&self) -> [Float; D] {
        self.origin
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Forward Euler path through the current velocity field, starting at
    /// the seed and stopping once it would leave the interior.
    pub fn trace(&self, lattice: &Lattice) -> Vec<[Float; D]> {
        let mut points = Vec::with_capacity(self.max_steps + 1);
        let mut position = self.origin;
        if !inside_interior(lattice, position) {
            return points;
        }
        points.push(position);
        for _ in 0..self.max_steps {
            let velocity = sample_velocity(lattice, position);
            position = [
                position[0] + STREAMLINE_STEP_SCALE * velocity[0],
                position[1] + STREAMLINE_STEP_SCALE * velocity[1],
            ];
            if !inside_interior(lattice, position) {
                break;
            }
            points.push(position);
        }
        points
    }
}

fn inside_interior(lattice: &Lattice, [x, y]: [Float; D]) -> bool {
    x >= 1.0 && x <= (lattice.nx - 2) as Float && y >= 1.0 && y <= (lattice.ny - 2) as Float
}

/// One seed every `STREAMLINE_SPACING_Y` rows, just downstream of the inlet.
pub fn default_seeds(lattice: &Lattice) -> Vec<StreamlineSeed> {
    (STREAMLINE_SPACING_Y..lattice.ny - 1)
        .step_by(STREAMLINE_SPACING_Y)
        .map(|j| StreamlineSeed::new([STREAMLINE_SEED_X, j as Float], STREAMLINE_MAX_STEPS))
        .collect()
}

pub fn trace_all(seeds: &[StreamlineSeed], lattice: &Lattice) -> Vec<Vec<[Float; D]>> {
    seeds.par_iter().map(|seed| seed.trace(lattice)).collect()
}
