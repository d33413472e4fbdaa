use super::*;
use crate::global_variables::*;
use crate::{LbmError, NodeType};
use rayon::prelude::*;

/// Full bounce-back: every population is replaced by its opposite.
pub fn bounce(f: &[Float; Q]) -> [Float; Q] {
    std::array::from_fn(|q| f[Q_BAR[q]])
}

impl Lattice {
    /// No-slip walls on solid nodes. Like collision, the sweep leaves out the
    /// last two rows and columns, so obstacles must stay clear of them.
    pub fn bounce_back(&mut self) {
        let nx = self.nx;
        let ny = self.ny;
        self.f
            .par_chunks_mut(nx)
            .zip(self.velocity.par_chunks_mut(nx))
            .zip(self.node_types.par_chunks(nx))
            .enumerate()
            .filter(|(j, _)| *j < ny - 2)
            .for_each(|(_, ((f_row, velocity_row), node_type_row))| {
                for i in 0..nx - 2 {
                    if node_type_row[i] == NodeType::Solid {
                        f_row[i] = bounce(&f_row[i]);
                        velocity_row[i] = [0.0; D];
                    }
                }
            });
    }

    /// Rebuilds the solid mask from `origin + offset` cells, with offsets
    /// rounded to the nearest node. Nothing changes if a cell falls outside
    /// `1..nx-2 x 1..ny-2`.
    pub fn bind_obstacle(
        &mut self,
        origin: [usize; D],
        offsets: &[[Float; D]],
    ) -> Result<(), LbmError> {
        let solid_cells = offsets
            .iter()
            .map(|&[dx, dy]| {
                let x = origin[0] as i64 + dx.round() as i64;
                let y = origin[1] as i64 + dy.round() as i64;
                let inside_x = x >= 1 && x < self.nx as i64 - 2;
                let inside_y = y >= 1 && y < self.ny as i64 - 2;
                if inside_x && inside_y {
                    Ok(self.index(x as usize, y as usize))
                } else {
                    Err(LbmError::ObstacleOutOfBounds { x, y })
                }
            })
            .collect::<Result<Vec<usize>, LbmError>>()?;
        self.node_types.fill(NodeType::Fluid);
        for index in solid_cells {
            self.node_types[index] = NodeType::Solid;
        }
        Ok(())
    }

    pub fn number_of_solid_nodes(&self) -> usize {
        self.node_types
            .par_iter()
            .filter(|node_type| **node_type == NodeType::Solid)
            .count()
    }
}
