use std::f64::consts::PI;
use std::path::PathBuf;
use nalgebra::Vector3;
use serde::{Serialize, Deserialize};
use crate::annotations::annotation_serializer::AnnotationFormat;
use crate::coordinators::simulated_coordinator::SimulatorSettings;
use crate::scene_layout::grid::GridSpec;
use crate::scene_layout::primitive_layout_generator::LayoutSettings;
use crate::scene_sync::sync_barrier::BarrierWaitSettings;
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_se3::scene_pose::ScenePose;

/// A model placed once at the start of a run.  Table-valued in TOML, so it has to come after
/// the plain fields of any struct holding it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaticModelConfig {
    pub name: String,
    /// Inline model description file.  Without one the model is spawned by uri.
    pub sdf_path: Option<PathBuf>,
    pub textured: bool
}
impl StaticModelConfig {
    /// Reads the description file, if there is one.
    pub fn load_sdf(&self) -> Result<Option<String>, SceneError> {
        return match &self.sdf_path {
            None => { Ok(None) }
            Some(p) => { Ok(Some(FileUtils::read_file_contents_to_string(p)?)) }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub nominal_position: Vector3<f64>,
    /// Roll, pitch, yaw.
    pub nominal_rpy: Vector3<f64>,
    /// Standard deviation of the Gaussian jitter applied to the position on every move.
    pub position_jitter_std: f64,
    pub model: StaticModelConfig
}
impl CameraConfig {
    pub fn nominal_pose(&self) -> ScenePose {
        ScenePose::new_from_euler_angles(self.nominal_rpy[0], self.nominal_rpy[1], self.nominal_rpy[2],
                                         self.nominal_position[0], self.nominal_position[1], self.nominal_position[2])
    }
}
impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            nominal_position: Vector3::new(0.0, 0.0, 3.0),
            nominal_rpy: Vector3::new(0.0, PI * 0.5, 0.0),
            position_jitter_std: 0.05,
            model: StaticModelConfig { name: "camera".to_string(), sdf_path: None, textured: false }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierConfig {
    pub timeout_ms: u64,
    pub poll_interval_ms: u64
}
impl BarrierConfig {
    pub fn wait_settings(&self) -> BarrierWaitSettings {
        BarrierWaitSettings::new_from_millis(self.timeout_ms, self.poll_interval_ms)
    }
}
impl Default for BarrierConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            poll_interval_ms: 10
        }
    }
}

/// Every tunable of a scene generation run.  Missing fields in a config file fall back to the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneLoopConfig {
    pub media_dir: Option<PathBuf>,
    pub num_scenes: usize,
    pub first_scene_idx: usize,
    pub image_dir: PathBuf,
    pub dataset_dir: PathBuf,
    pub debug: bool,
    pub min_objects: usize,
    pub max_objects: usize,
    pub image_extension: String,
    pub annotation_format: AnnotationFormat,
    pub seed: Option<u64>,
    pub clear_previous: bool,
    /// Asks the visual coordinator for a new ground material at the start of every scene.
    pub randomize_ground_material: bool,
    pub grid: GridSpec,
    pub layout: LayoutSettings,
    pub barriers: BarrierConfig,
    pub ground: StaticModelConfig,
    pub camera: CameraConfig,
    pub simulator: SimulatorSettings
}
impl Default for SceneLoopConfig {
    fn default() -> Self {
        Self {
            media_dir: None,
            num_scenes: 10,
            first_scene_idx: 0,
            image_dir: PathBuf::from("imgs"),
            dataset_dir: PathBuf::from("dataset"),
            debug: false,
            min_objects: 5,
            max_objects: 10,
            image_extension: ".png".to_string(),
            annotation_format: AnnotationFormat::PascalVoc,
            seed: None,
            clear_previous: true,
            randomize_ground_material: false,
            grid: GridSpec::default(),
            layout: LayoutSettings::default(),
            barriers: BarrierConfig::default(),
            ground: StaticModelConfig { name: "ground".to_string(), sdf_path: None, textured: true },
            camera: CameraConfig::default(),
            simulator: SimulatorSettings::default()
        }
    }
}
impl SceneLoopConfig {
    /// Checks everything that can be checked before talking to any coordinator.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.grid.x_cells == 0 || self.grid.y_cells == 0 {
            return Err(SceneError::new_invalid_arguments_error(&format!("Grid of {} x {} cells has no room for objects.", self.grid.x_cells, self.grid.y_cells), file!(), line!()));
        }
        if !(self.grid.cell_size_x > 0.0) || !(self.grid.cell_size_y > 0.0) {
            return Err(SceneError::new_invalid_arguments_error("Grid cell sizes must be positive.", file!(), line!()));
        }
        if self.first_scene_idx.checked_add(self.num_scenes).is_none() {
            return Err(SceneError::new_invalid_arguments_error(&format!("Scene indices starting at {} do not fit {} scenes.", self.first_scene_idx, self.num_scenes), file!(), line!()));
        }
        if self.min_objects > self.max_objects {
            return Err(SceneError::new_invalid_arguments_error(&format!("min_objects ({}) is larger than max_objects ({}).", self.min_objects, self.max_objects), file!(), line!()));
        }
        let num_cells = match self.grid.x_cells.checked_mul(self.grid.y_cells) {
            None => { return Err(SceneError::new_invalid_arguments_error(&format!("Grid of {} x {} cells is too large.", self.grid.x_cells, self.grid.y_cells), file!(), line!())); }
            Some(n) => { n }
        };
        if self.max_objects > num_cells {
            return Err(SceneError::new_capacity_exceeded_error(self.max_objects, num_cells, file!(), line!()));
        }
        self.layout.validate()?;
        if self.barriers.timeout_ms == 0 {
            return Err(SceneError::new_invalid_arguments_error("Barrier timeout must be larger than zero.", file!(), line!()));
        }
        if self.ground.name == self.camera.model.name {
            return Err(SceneError::new_invalid_arguments_error("Ground and camera models need different names.", file!(), line!()));
        }
        Ok(())
    }
    /// Simulator settings with the camera model name taken from the camera config.
    pub fn simulator_settings(&self) -> SimulatorSettings {
        SimulatorSettings { camera_model_name: self.camera.model.name.clone(), ..self.simulator.clone() }
    }
    /// Name of the image written for a scene, e.g. `000042.png`.
    pub fn image_file_name(&self, scene_idx: usize) -> String {
        format!("{}{}", Self::scene_stem(scene_idx), self.image_extension)
    }
    pub fn scene_stem(scene_idx: usize) -> String {
        format!("{:06}", scene_idx)
    }
}

#[cfg(test)]
mod tests {
    use std::env;
    use crate::utils::utils_traits::{LoadableFromConfigFile, ToAndFromRonString, ToAndFromTomlString};
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let c = SceneLoopConfig::default();
        c.validate().unwrap();
        assert_eq!(c.image_file_name(42), "000042.png");
        assert_eq!(c.barriers.wait_settings(), BarrierWaitSettings::default());
    }

    #[test]
    fn oversized_object_range_is_a_capacity_error() {
        let mut c = SceneLoopConfig::default();
        c.grid = GridSpec { x_cells: 2, y_cells: 2, cell_size_x: 1.0, cell_size_y: 1.0 };
        match c.validate() {
            Err(SceneError::CapacityExceeded(_)) => { }
            r => { panic!("expected capacity error, got {:?}", r); }
        }
        c.max_objects = 4;
        c.min_objects = 3;
        c.validate().unwrap();
        c.min_objects = 5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn partial_config_files_fall_back_to_defaults() {
        let c = SceneLoopConfig::load_from_toml_string("num_scenes = 3\nseed = 7\n\n[grid]\nx_cells = 4\ny_cells = 4\ncell_size_x = 1.0\ncell_size_y = 1.0\n").unwrap();
        assert_eq!(c.num_scenes, 3);
        assert_eq!(c.seed, Some(7));
        assert_eq!(c.grid.x_cells, 4);
        assert_eq!(c.max_objects, 10);

        let mut path = env::temp_dir();
        path.push(format!("scene_utils_config_{}.ron", std::process::id()));
        let mut d = SceneLoopConfig::default();
        d.num_scenes = 2;
        FileUtils::write_string_to_file(&d.convert_to_ron_string().unwrap(), &path).unwrap();
        assert_eq!(SceneLoopConfig::load_from_config_file(&path).unwrap(), d);

        let mut path = env::temp_dir();
        path.push(format!("scene_utils_config_{}.toml", std::process::id()));
        let mut e = SceneLoopConfig::default();
        e.num_scenes = 4;
        e.seed = Some(11);
        e.camera.model.sdf_path = Some(PathBuf::from("models/camera.sdf"));
        FileUtils::write_string_to_file(&e.convert_to_toml_string().unwrap(), &path).unwrap();
        assert_eq!(SceneLoopConfig::load_from_config_file(&path).unwrap(), e);
    }

    #[test]
    fn scene_index_overflow_is_invalid() {
        let mut c = SceneLoopConfig::default();
        c.first_scene_idx = usize::MAX;
        c.num_scenes = 1;
        match c.validate() {
            Err(SceneError::InvalidArguments(_)) => { }
            r => { panic!("expected invalid arguments, got {:?}", r); }
        }
        c.num_scenes = 0;
        c.validate().unwrap();
    }

    #[test]
    fn oversized_grid_is_invalid() {
        let mut c = SceneLoopConfig::default();
        c.grid.x_cells = usize::MAX;
        c.grid.y_cells = 2;
        match c.validate() {
            Err(SceneError::InvalidArguments(_)) => { }
            r => { panic!("expected invalid arguments, got {:?}", r); }
        }
    }

    #[test]
    fn unusable_layout_bounds_are_invalid() {
        let mut c = SceneLoopConfig::default();
        c.layout.mass_bounds = (1.0, f64::INFINITY);
        assert!(matches!(c.validate(), Err(SceneError::InvalidArguments(_))));

        let mut c = SceneLoopConfig::default();
        c.layout.min_size_fraction = -0.1;
        assert!(matches!(c.validate(), Err(SceneError::InvalidArguments(_))));
    }
}
