use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_sampling::SimpleSamplers;

/// Dimensions of the placement grid laid over the ground plane.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub x_cells: usize,
    pub y_cells: usize,
    pub cell_size_x: f64,
    pub cell_size_y: f64
}
impl Default for GridSpec {
    fn default() -> Self {
        Self {
            x_cells: 10,
            y_cells: 10,
            cell_size_x: 0.5,
            cell_size_y: 0.5
        }
    }
}

/// Partitions a ground plane centered on the world origin into `x_cells x y_cells` cells.
/// Cell `idx` sits at column `idx % x_cells` and row `idx / x_cells`.
#[derive(Clone, Debug)]
pub struct SceneGrid {
    spec: GridSpec,
    cell_idxs: Vec<usize>
}
impl SceneGrid {
    pub fn new(spec: GridSpec) -> Result<Self, SceneError> {
        if spec.x_cells == 0 || spec.y_cells == 0 {
            return Err(SceneError::new_invalid_arguments_error("Grid must have at least one cell along each axis.", file!(), line!()));
        }
        if !(spec.cell_size_x > 0.0) || !(spec.cell_size_y > 0.0) {
            return Err(SceneError::new_invalid_arguments_error(&format!("Grid cell size must be positive, got {} x {}.", spec.cell_size_x, spec.cell_size_y), file!(), line!()));
        }

        let num_cells = match spec.x_cells.checked_mul(spec.y_cells) {
            None => { return Err(SceneError::new_invalid_arguments_error(&format!("Grid of {} x {} cells is too large.", spec.x_cells, spec.y_cells), file!(), line!())); }
            Some(n) => { n }
        };
        let cell_idxs = (0..num_cells).collect();
        Ok(Self {
            spec,
            cell_idxs
        })
    }
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }
    pub fn num_cells(&self) -> usize {
        self.cell_idxs.len()
    }
    pub fn smallest_cell_side(&self) -> f64 {
        self.spec.cell_size_x.min(self.spec.cell_size_y)
    }
    pub fn check_capacity(&self, num_objects: usize) -> Result<(), SceneError> {
        if num_objects > self.num_cells() {
            return Err(SceneError::new_capacity_exceeded_error(num_objects, self.num_cells(), file!(), line!()));
        }
        Ok(())
    }
    /// Returns `(column, row)` of the cell.
    pub fn cell_coordinates(&self, cell_idx: usize) -> Result<(usize, usize), SceneError> {
        SceneError::new_check_for_idx_out_of_bound_error(cell_idx, self.num_cells(), file!(), line!())?;
        Ok((cell_idx % self.spec.x_cells, cell_idx / self.spec.x_cells))
    }
    /// World `(x, y)` of the center of the cell.
    pub fn cell_center(&self, cell_idx: usize) -> Result<(f64, f64), SceneError> {
        let (column, row) = self.cell_coordinates(cell_idx)?;
        let ((x_min, _), (y_min, _)) = self.world_bounds();
        Ok((
            x_min + (column as f64 + 0.5) * self.spec.cell_size_x,
            y_min + (row as f64 + 0.5) * self.spec.cell_size_y
        ))
    }
    /// `((x_min, x_max), (y_min, y_max))` of the whole grid.
    pub fn world_bounds(&self) -> ((f64, f64), (f64, f64)) {
        let half_x = self.spec.x_cells as f64 * self.spec.cell_size_x * 0.5;
        let half_y = self.spec.y_cells as f64 * self.spec.cell_size_y * 0.5;
        ((-half_x, half_x), (-half_y, half_y))
    }
    /// Draws `num_objects` distinct cells from a fresh random permutation of all cells.
    pub fn assign_cells<R: Rng + ?Sized>(&self, num_objects: usize, rng: &mut R) -> Result<Vec<usize>, SceneError> {
        self.check_capacity(num_objects)?;

        let order = SimpleSamplers::shuffled_indices(self.cell_idxs.len(), rng);
        Ok(order.iter().take(num_objects).map(|i| self.cell_idxs[*i]).collect())
    }
}
