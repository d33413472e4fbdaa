use super::*;
use crate::global_variables::*;
use crate::post::PostResult;
use crate::NodeType;
use rayon::prelude::*;

impl Lattice {
    /// Central differences of the pressure on interior nodes.
    pub fn update_pressure_gradient(&mut self) {
        let nx = self.nx;
        let ny = self.ny;
        let pressure = &self.pressure;
        self.pressure_gradient
            .par_chunks_mut(nx)
            .enumerate()
            .filter(|(j, _)| *j >= 1 && *j < ny - 1)
            .for_each(|(j, gradient_row)| {
                for i in 1..nx - 1 {
                    let index = j * nx + i;
                    gradient_row[i] = [
                        (pressure[index + 1] - pressure[index - 1]) / 2.0,
                        (pressure[index + nx] - pressure[index - nx]) / 2.0,
                    ];
                }
            });
    }

    /// Vorticity `d(uy)/dx - d(ux)/dy` on interior nodes. Only called on
    /// demand; `curl_is_stale` tells whether a step happened since.
    pub fn update_curl(&mut self) {
        let nx = self.nx;
        let ny = self.ny;
        let velocity = &self.velocity;
        self.curl
            .par_chunks_mut(nx)
            .enumerate()
            .filter(|(j, _)| *j >= 1 && *j < ny - 1)
            .for_each(|(j, curl_row)| {
                for i in 1..nx - 1 {
                    let index = j * nx + i;
                    let duy_dx = (velocity[index + 1][1] - velocity[index - 1][1]) / 2.0;
                    let dux_dy = (velocity[index + nx][0] - velocity[index - nx][0]) / 2.0;
                    curl_row[i] = duy_dx - dux_dy;
                }
            });
        self.curl_is_stale = false;
    }
}

pub fn compute_mean_density(lattice: &Lattice) -> Vec<PostResult> {
    let rho_sum = lattice
        .density()
        .par_iter()
        .zip(lattice.node_types().par_iter())
        .filter(|(_, node_type)| **node_type == NodeType::Fluid)
        .map(|(density, _)| *density)
        .sum::<Float>();
    let number_of_fluid_nodes =
        (lattice.number_of_nodes() - lattice.number_of_solid_nodes()) as Float;
    let rho_mean = rho_sum / number_of_fluid_nodes;
    let rho_result = PostResult::new(
        "mean_density".to_string(),
        "mean density".to_string(),
        rho_mean,
        None,
    );
    let total_result = PostResult::new(
        "total_density".to_string(),
        "total density".to_string(),
        lattice.total_density(),
        None,
    );
    vec![rho_result, total_result]
}

pub fn compute_max_velocity(lattice: &Lattice) -> Vec<PostResult> {
    let max_velocity = lattice
        .velocity()
        .par_iter()
        .map(|u| (u[0] * u[0] + u[1] * u[1]).sqrt())
        .reduce_with(|a, b| a.max(b))
        .unwrap_or(0.0);
    let max_velocity_result = PostResult::new(
        "max_velocity".to_string(),
        "maximum velocity".to_string(),
        max_velocity,
        None,
    );
    vec![max_velocity_result]
}

pub fn compute_solid_fraction(lattice: &Lattice) -> Vec<PostResult> {
    let number_of_solid_nodes = lattice.number_of_solid_nodes() as Float;
    let number_of_nodes = lattice.number_of_nodes() as Float;
    let number_of_solid_nodes_result = PostResult::new(
        "n_solid_nodes".to_string(),
        "number of solid nodes".to_string(),
        number_of_solid_nodes,
        None,
    );
    let solid_fraction_result = PostResult::new(
        "solid_fraction".to_string(),
        "solid fraction".to_string(),
        number_of_solid_nodes / number_of_nodes,
        None,
    );
    vec![number_of_solid_nodes_result, solid_fraction_result]
}

pub fn compute_max_curl(lattice: &Lattice) -> Vec<PostResult> {
    let max_curl = lattice
        .curl()
        .par_iter()
        .map(|curl| curl.abs())
        .reduce_with(|a, b| a.max(b))
        .unwrap_or(0.0);
    vec![PostResult::new(
        "max_curl".to_string(),
        "maximum |curl|".to_string(),
        max_curl,
        None,
    )]
}
