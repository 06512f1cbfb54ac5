use std::collections::HashMap;
use std::f64::consts::PI;
use nalgebra::Vector3;
use rand::Rng;
use serde::{Serialize, Deserialize};
use crate::scene_layout::grid::SceneGrid;
use crate::scene_layout::primitive_object::{OrientationClass, PrimitiveDimensions, PrimitiveObject, PrimitiveType};
use crate::scene_layout::texture_catalog::TextureCatalog;
use crate::utils::utils_enums::EnumUtils;
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_sampling::SimpleSamplers;
use crate::utils::utils_se3::scene_pose::ScenePose;

/// Sampling bounds for object size, mass and orientation.  Sizes are fractions of the smallest
/// cell side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub min_size_fraction: f64,
    pub lying_length_fraction: (f64, f64),
    pub mass_bounds: (f64, f64),
    pub horizontal_probability: f64
}
impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            min_size_fraction: 0.1,
            lying_length_fraction: (0.5, 1.0),
            mass_bounds: (1.0, 5.0),
            horizontal_probability: 0.5
        }
    }
}
impl LayoutSettings {
    /// Every bound has to be finite with `min <= max`.  Sizes must be positive and masses
    /// non-negative.
    pub fn validate(&self) -> Result<(), SceneError> {
        if !self.min_size_fraction.is_finite() || !(self.min_size_fraction > 0.0) || self.min_size_fraction > 1.0 {
            return Err(SceneError::new_invalid_arguments_error(&format!("min_size_fraction must lie in (0, 1], got {}.", self.min_size_fraction), file!(), line!()));
        }
        Self::check_bounds("lying_length_fraction", self.lying_length_fraction, false)?;
        Self::check_bounds("mass_bounds", self.mass_bounds, true)?;
        if !(self.horizontal_probability >= 0.0 && self.horizontal_probability <= 1.0) {
            return Err(SceneError::new_invalid_arguments_error(&format!("horizontal_probability must lie in [0, 1], got {}.", self.horizontal_probability), file!(), line!()));
        }
        Ok(())
    }
    fn check_bounds(field: &str, bounds: (f64, f64), zero_allowed: bool) -> Result<(), SceneError> {
        let lower_ok = if zero_allowed { bounds.0 >= 0.0 } else { bounds.0 > 0.0 };
        if !bounds.0.is_finite() || !bounds.1.is_finite() || !lower_ok || bounds.0 > bounds.1 {
            return Err(SceneError::new_invalid_arguments_error(&format!("{} must be finite and ordered with a {} lower bound, got {:?}.", field, if zero_allowed { "non-negative" } else { "positive" }, bounds), file!(), line!()));
        }
        Ok(())
    }
}

/// Produces randomized primitive layouts, one object per distinct grid cell.
///
/// Name counters are kept per primitive type for the whole run so that names never repeat
/// between scenes.
pub struct PrimitiveLayoutGenerator {
    grid: SceneGrid,
    texture_catalog: TextureCatalog,
    settings: LayoutSettings,
    name_counters: HashMap<PrimitiveType, usize>
}
impl PrimitiveLayoutGenerator {
    pub fn new(grid: SceneGrid, texture_catalog: TextureCatalog, settings: LayoutSettings) -> Self {
        Self {
            grid,
            texture_catalog,
            settings,
            name_counters: HashMap::new()
        }
    }
    pub fn grid(&self) -> &SceneGrid {
        &self.grid
    }
    pub fn texture_catalog(&self) -> &TextureCatalog {
        &self.texture_catalog
    }
    /// Fails with `CapacityExceeded` before drawing anything if the objects cannot fit.
    pub fn generate_layout<R: Rng + ?Sized>(&mut self, num_objects: usize, rng: &mut R) -> Result<Vec<PrimitiveObject>, SceneError> {
        let cells = self.grid.assign_cells(num_objects, rng)?;

        let mut out_vec = vec![];
        for cell_idx in cells {
            out_vec.push(self.generate_object(cell_idx, rng)?);
        }
        Ok(out_vec)
    }
    pub fn generate_object<R: Rng + ?Sized>(&mut self, cell_idx: usize, rng: &mut R) -> Result<PrimitiveObject, SceneError> {
        let (x, y) = self.grid.cell_center(cell_idx)?;
        let primitive_type: PrimitiveType = EnumUtils::sample_variant_uniformly(rng)?;
        let orientation_class = if SimpleSamplers::coin_flip(self.settings.horizontal_probability, rng) {
            OrientationClass::Horizontal
        } else {
            OrientationClass::Vertical
        };

        let c = self.grid.smallest_cell_side();
        let size_bounds = (self.settings.min_size_fraction * c, c);
        let radius_bounds = (size_bounds.0 * 0.5, size_bounds.1 * 0.5);
        let lying_bounds = (self.settings.lying_length_fraction.0 * c, self.settings.lying_length_fraction.1 * c);
        let yaw = SimpleSamplers::uniform_sample((0.0, PI), rng);

        // Horizontal objects are pitched onto their side, which puts their local z axis in the
        // ground plane and their local x axis along the world vertical.
        let (dimensions, z) = match (primitive_type, orientation_class) {
            (PrimitiveType::Sphere, _) => {
                let radius = SimpleSamplers::uniform_sample(radius_bounds, rng);
                (PrimitiveDimensions::Sphere { radius }, radius)
            }
            (PrimitiveType::Cylinder, OrientationClass::Vertical) => {
                let radius = SimpleSamplers::uniform_sample(radius_bounds, rng);
                let length = SimpleSamplers::uniform_sample(size_bounds, rng);
                (PrimitiveDimensions::Cylinder { radius, length }, length * 0.5)
            }
            (PrimitiveType::Cylinder, OrientationClass::Horizontal) => {
                let radius = SimpleSamplers::uniform_sample(radius_bounds, rng);
                let length = SimpleSamplers::uniform_sample(lying_bounds, rng);
                (PrimitiveDimensions::Cylinder { radius, length }, radius)
            }
            (PrimitiveType::Box, OrientationClass::Vertical) => {
                let s = SimpleSamplers::uniform_samples(&vec![size_bounds, size_bounds, size_bounds], rng);
                (PrimitiveDimensions::Box { size: Vector3::new(s[0], s[1], s[2]) }, s[2] * 0.5)
            }
            (PrimitiveType::Box, OrientationClass::Horizontal) => {
                let s = SimpleSamplers::uniform_samples(&vec![size_bounds, size_bounds, lying_bounds], rng);
                (PrimitiveDimensions::Box { size: Vector3::new(s[0], s[1], s[2]) }, s[0] * 0.5)
            }
        };

        let pitch = match orientation_class {
            OrientationClass::Horizontal => { PI * 0.5 }
            OrientationClass::Vertical => { 0.0 }
        };
        let pose = ScenePose::new_from_euler_angles(0.0, pitch, yaw, x, y, z);
        let mass = SimpleSamplers::uniform_sample(self.settings.mass_bounds, rng);
        let texture = if self.texture_catalog.is_empty() {
            None
        } else {
            Some(self.texture_catalog.sample_texture_reference(rng)?)
        };

        let name = self.next_name(primitive_type);
        Ok(PrimitiveObject::new(&name, primitive_type, orientation_class, pose, dimensions, mass, texture, cell_idx))
    }
    fn next_name(&mut self, primitive_type: PrimitiveType) -> String {
        let counter = self.name_counters.entry(primitive_type).or_insert(0);
        let name = format!("{}{}", primitive_type.name_prefix(), counter);
        *counter += 1;
        name
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use crate::scene_layout::grid::GridSpec;
    use crate::utils::utils_sampling::new_scene_rng;
    use super::*;

    fn generator(x_cells: usize, y_cells: usize, cell_size: f64) -> PrimitiveLayoutGenerator {
        let grid = SceneGrid::new(GridSpec { x_cells, y_cells, cell_size_x: cell_size, cell_size_y: cell_size }).unwrap();
        let catalog = TextureCatalog::new(vec!["Checker_1".to_string(), "Gradient_2".to_string()]);
        PrimitiveLayoutGenerator::new(grid, catalog, LayoutSettings::default())
    }

    #[test]
    fn seven_objects_on_five_by_five_grid() {
        let mut g = generator(5, 5, 1.0);
        let mut rng = new_scene_rng(Some(42));
        let objects = g.generate_layout(7, &mut rng).unwrap();
        assert_eq!(objects.len(), 7);

        let cells: HashSet<usize> = objects.iter().map(|o| o.cell_idx()).collect();
        assert_eq!(cells.len(), 7);
        for o in &objects {
            assert!(o.cell_idx() <= 24);
            let t = o.pose().translation();
            assert!(t[0] >= -2.5 && t[0] <= 2.5);
            assert!(t[1] >= -2.5 && t[1] <= 2.5);
            assert!(o.texture().is_some());
        }
    }

    #[test]
    fn objects_rest_on_or_above_ground_for_many_seeds() {
        let mut g = generator(10, 10, 0.5);
        let mut seen = HashSet::new();
        for seed in 0..100 {
            let mut rng = new_scene_rng(Some(seed));
            for o in g.generate_layout(10, &mut rng).unwrap() {
                assert!(o.lowest_point_z() >= -1e-9, "{} sinks below the ground: {}", o.name(), o.lowest_point_z());
                assert!(o.lowest_point_z() <= 1e-9, "{} floats above the ground: {}", o.name(), o.lowest_point_z());
                assert!(o.mass() >= 1.0 && o.mass() <= 5.0);
                seen.insert((o.primitive_type(), o.orientation_class()));
            }
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn names_are_sequential_per_type_across_scenes() {
        let mut g = generator(4, 4, 1.0);
        let mut rng = new_scene_rng(Some(9));
        let mut names = HashSet::new();
        for _ in 0..5 {
            for o in g.generate_layout(16, &mut rng).unwrap() {
                assert!(o.name().starts_with(&o.primitive_type().name_prefix()));
                assert!(names.insert(o.name().to_string()), "duplicate name {}", o.name());
            }
        }
        assert_eq!(names.len(), 80);
    }

    #[test]
    fn layout_settings_reject_unusable_bounds() {
        LayoutSettings::default().validate().unwrap();
        let bad = vec![
            LayoutSettings { mass_bounds: (1.0, f64::INFINITY), ..Default::default() },
            LayoutSettings { mass_bounds: (-1.0, 5.0), ..Default::default() },
            LayoutSettings { mass_bounds: (5.0, 1.0), ..Default::default() },
            LayoutSettings { min_size_fraction: -0.1, ..Default::default() },
            LayoutSettings { min_size_fraction: f64::NAN, ..Default::default() },
            LayoutSettings { lying_length_fraction: (0.0, 1.0), ..Default::default() },
            LayoutSettings { horizontal_probability: 1.5, ..Default::default() }
        ];
        for settings in bad {
            match settings.validate() {
                Err(SceneError::InvalidArguments(_)) => { }
                r => { panic!("{:?} should be rejected, got {:?}", settings, r); }
            }
        }
    }

    #[test]
    fn too_many_objects_fails_before_sampling() {
        let mut g = generator(2, 3, 1.0);
        let mut rng = new_scene_rng(Some(1));
        match g.generate_layout(7, &mut rng) {
            Err(SceneError::CapacityExceeded(_)) => { }
            r => { panic!("expected capacity error, got {:?}", r.map(|v| v.len())); }
        }
        assert!(g.generate_object(0, &mut rng).unwrap().name().ends_with("_0"));
    }
}
