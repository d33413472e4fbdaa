pub const CASE_NAME: &'static str = "Wind Tunnel";

pub type Float = f64;

pub const DELTA_T: Float = 1.0;

pub const DELTA_X: Float = 1.0;

pub const LATTICE_DENSITY: Float = 1.0;

pub const CS_2: Float = 1.0 / 3.0 * DELTA_X * DELTA_X / DELTA_T / DELTA_T;

pub const CS_2_INV: Float = 3.0;

pub const CS_4_INV: Float = 9.0;

pub const DEFAULT_NX: usize = 200;

pub const DEFAULT_NY: usize = 80;

pub const DEFAULT_VISCOSITY: Float = 0.02;

pub const DEFAULT_FREE_STREAM_VELOCITY: [Float; 2] = [0.1, 0.0];

pub const MIN_DIMENSION: usize = 5;

/// Vertical distance, in cells, between two tracer rows.
pub const TRACER_SPACING_Y: usize = 4;

/// Horizontal distance, in cells, between two tracer columns.
pub const TRACER_SPACING_X: usize = 10;

pub const STREAMLINE_SPACING_Y: usize = 5;

pub const STREAMLINE_SEED_X: Float = 2.0;

pub const STREAMLINE_MAX_STEPS: usize = 400;

pub const STREAMLINE_STEP_SCALE: Float = 5.0;

pub const STABLE_VELOCITY_LIMIT: Float = 0.3;

pub const STABLE_TAU_LIMIT: Float = 0.51;
