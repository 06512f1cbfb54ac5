use std::path::PathBuf;
use std::sync::Arc;
use crate::annotations::annotation_record::SceneAnnotation;
use crate::annotations::annotation_serializer::AnnotationSerializer;
use crate::bounding_boxes::bounding_box_projector::BoundingBoxProjector;
use crate::coordinators::coordinator_responses::CameraInfo;
use crate::coordinators::simulated_coordinator::SimulatedCoordinator;
use crate::coordinators::{CameraCoordinator, VisualCoordinator, WorldCoordinator};
use crate::scene_layout::grid::SceneGrid;
use crate::scene_layout::primitive_layout_generator::PrimitiveLayoutGenerator;
use crate::scene_layout::primitive_object::{PrimitiveObject, PrimitiveType};
use crate::scene_layout::texture_catalog::TextureCatalog;
use crate::scene_loop::scene_loop_config::SceneLoopConfig;
use crate::scene_loop::scene_loop_state::SceneLoopState;
use crate::scene_requests::scene_request_builder::SceneRequestBuilder;
use crate::scene_sync::run_context::RunContext;
use crate::scene_sync::scene_sync_state::SceneSyncState;
use crate::utils::utils_console::{PrintColor, PrintMode, scene_debug_print, scene_print};
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_files::FileUtils;
use crate::utils::utils_sampling::{new_scene_rng, SceneRng, SimpleSamplers};
use crate::utils::utils_se3::scene_pose::ScenePose;

/// Prefix of models the world spawns without an explicit name.
pub const UNNAMED_MODEL_PREFIX: &str = "plugin_";

#[derive(Clone, Debug, Default)]
pub struct SceneLoopSummary {
    pub scenes_completed: usize,
    pub objects_per_scene: Vec<usize>,
    pub annotation_paths: Vec<PathBuf>,
    pub state_history: Vec<SceneLoopState>
}

/// Sequences layout generation, remote requests, barriers, projection and annotation output
/// for every scene of a run.  Scenes run strictly one after another and every stage of a scene
/// finishes before the next starts.
pub struct SceneLoopDriver<'a, W: WorldCoordinator + ?Sized, C: CameraCoordinator + ?Sized, V: VisualCoordinator + ?Sized> {
    config: &'a SceneLoopConfig,
    world: &'a W,
    camera: &'a C,
    visual: &'a V,
    sync: &'a SceneSyncState,
    ctx: RunContext,
    generator: PrimitiveLayoutGenerator,
    serializer: AnnotationSerializer,
    rng: SceneRng,
    state: SceneLoopState,
    state_history: Vec<SceneLoopState>,
    camera_info: Option<CameraInfo>,
    num_static_models: usize
}
impl<'a, W: WorldCoordinator + ?Sized, C: CameraCoordinator + ?Sized, V: VisualCoordinator + ?Sized> SceneLoopDriver<'a, W, C, V> {
    pub fn new(config: &'a SceneLoopConfig,
               texture_catalog: TextureCatalog,
               world: &'a W,
               camera: &'a C,
               visual: &'a V,
               sync: &'a SceneSyncState,
               ctx: RunContext) -> Result<Self, SceneError> {
        config.validate()?;
        let grid = SceneGrid::new(config.grid.clone())?;

        Ok(Self {
            config,
            world,
            camera,
            visual,
            sync,
            ctx,
            generator: PrimitiveLayoutGenerator::new(grid, texture_catalog, config.layout.clone()),
            serializer: AnnotationSerializer::new(&config.dataset_dir, config.annotation_format),
            rng: new_scene_rng(config.seed),
            state: SceneLoopState::Init,
            state_history: vec![SceneLoopState::Init],
            camera_info: None,
            num_static_models: 0
        })
    }
    pub fn state(&self) -> SceneLoopState {
        self.state
    }
    pub fn state_history(&self) -> &Vec<SceneLoopState> {
        &self.state_history
    }
    /// Runs every configured scene.  Any failure ends the run in `Terminal` and comes back as a
    /// `StageFailure` naming the stage and scene it happened in.
    pub fn run(&mut self) -> Result<SceneLoopSummary, SceneError> {
        let mut summary = SceneLoopSummary::default();

        if let Err(e) = self.run_setup() {
            return Err(self.fail(self.config.first_scene_idx, e));
        }

        let first = self.config.first_scene_idx;
        let end = match first.checked_add(self.config.num_scenes) {
            None => { return Err(self.fail(first, SceneError::new_invalid_arguments_error("Scene index range overflows.", file!(), line!()))); }
            Some(end) => { end }
        };
        for scene_idx in first..end {
            if let Err(e) = self.run_scene(scene_idx, &mut summary) {
                return Err(self.fail(scene_idx, e));
            }
            summary.scenes_completed += 1;
            scene_print(&format!("Scene {} done ({} of {}).", scene_idx, summary.scenes_completed, self.config.num_scenes), PrintMode::Println, PrintColor::Green, false);
        }

        self.transition(SceneLoopState::Terminal);
        summary.state_history = self.state_history.clone();
        Ok(summary)
    }
    fn run_setup(&mut self) -> Result<(), SceneError> {
        self.camera.send_camera_request(SceneRequestBuilder::set_output_dir(&self.config.image_dir))?;

        self.transition(SceneLoopState::SpawnStatics);
        let ground = &self.config.ground;
        let ground_texture = if ground.textured && !self.generator.texture_catalog().is_empty() {
            Some(self.generator.texture_catalog().sample_texture_reference(&mut self.rng)?)
        } else {
            None
        };
        self.world.send_world_request(SceneRequestBuilder::spawn_static_model(&ground.name, ground.load_sdf()?, None, ground_texture))?;
        let camera_model = &self.config.camera.model;
        self.world.send_world_request(SceneRequestBuilder::spawn_static_model(&camera_model.name, camera_model.load_sdf()?, Some(self.config.camera.nominal_pose()), None))?;
        self.num_static_models = 2;

        if self.config.clear_previous {
            self.transition(SceneLoopState::ClearPrevious);
            let mut patterns = PrimitiveType::all_name_prefixes();
            patterns.push(UNNAMED_MODEL_PREFIX.to_string());
            self.world.send_world_request(SceneRequestBuilder::remove_matching(patterns))?;
        }

        self.sync.invalidate_object_count();
        self.sync.wait_for_count(self.num_static_models, self.world, &self.ctx)?;

        self.camera.send_camera_request(SceneRequestBuilder::camera_info())?;
        let camera_info = self.sync.wait_for_camera_info(&self.ctx)?;
        scene_debug_print(&format!("[SceneLoop] camera is {} x {} x {}.", camera_info.width, camera_info.height, camera_info.depth));
        self.camera_info = Some(camera_info);
        Ok(())
    }
    fn run_scene(&mut self, scene_idx: usize, summary: &mut SceneLoopSummary) -> Result<(), SceneError> {
        self.ctx.check_cancelled("SceneLoop")?;
        self.sync.rearm_for_new_scene();

        self.transition(SceneLoopState::SpawnObjects);
        if self.config.randomize_ground_material {
            self.visual.send_visual_request(SceneRequestBuilder::randomize_materials(&[self.config.ground.name.as_str()]))?;
        }
        let num_objects = SimpleSamplers::uniform_usize_inclusive(self.config.min_objects, self.config.max_objects, &mut self.rng);
        let mut objects = self.generator.generate_layout(num_objects, &mut self.rng)?;
        scene_print(&format!("Scene {}: spawning {} objects.", scene_idx, num_objects), PrintMode::Println, PrintColor::Blue, false);
        self.world.send_world_request(SceneRequestBuilder::spawn_layout(&objects))?;

        self.transition(SceneLoopState::AwaitSpawnBarrier);
        self.sync.wait_for_count(num_objects + self.num_static_models, self.world, &self.ctx)?;

        self.transition(SceneLoopState::DisablePhysics);
        self.world.send_world_request(SceneRequestBuilder::set_physics(Some(false)))?;

        self.transition(SceneLoopState::Capture);
        let stem = SceneLoopConfig::scene_stem(scene_idx);
        self.camera.send_camera_request(SceneRequestBuilder::capture(&stem))?;

        self.transition(SceneLoopState::AwaitCaptureBarrier);
        self.sync.wait_for_capture(scene_idx, &stem, &self.ctx)?;

        self.transition(SceneLoopState::Query3DBoxes);
        self.world.send_world_request(SceneRequestBuilder::query_bounding_boxes(&objects))?;

        self.transition(SceneLoopState::AwaitBBoxBarrier);
        let boxes = self.sync.wait_for_bounding_boxes(num_objects, &self.ctx)?;
        for object in objects.iter_mut() {
            let bounding_box = match boxes.get(object.name()).and_then(|v| v.last()) {
                None => { return Err(SceneError::new_generic_error_str(&format!("No 3D bounding box was received for {:?}.", object.name()), file!(), line!())); }
                Some(b) => { b.clone() }
            };
            object.set_bounding_box_3d(bounding_box);
        }

        self.transition(SceneLoopState::Query2DProjections);
        for object in &objects {
            if let Some(bounding_box) = object.bounding_box_3d() {
                self.camera.send_camera_request(SceneRequestBuilder::project_corners(object.name(), bounding_box))?;
            }
        }

        self.transition(SceneLoopState::AwaitProjectionBarrier);
        let projections = self.sync.wait_for_projections(num_objects, &self.ctx)?;

        self.transition(SceneLoopState::ComputeRectangles);
        BoundingBoxProjector::project_objects(&mut objects, &projections)?;

        self.transition(SceneLoopState::WriteAnnotations);
        let path = self.write_annotation(scene_idx, &objects)?;
        scene_debug_print(&format!("[SceneLoop] wrote {:?}.", path));

        self.transition(SceneLoopState::ClearObjects);
        self.world.send_world_request(SceneRequestBuilder::remove_objects(&objects))?;
        self.sync.invalidate_object_count();

        self.transition(SceneLoopState::AwaitClearBarrier);
        self.sync.wait_for_count(self.num_static_models, self.world, &self.ctx)?;

        self.transition(SceneLoopState::MoveCamera);
        let camera_pose = self.sample_camera_pose()?;
        self.world.send_world_request(SceneRequestBuilder::move_object(&self.config.camera.model.name, &camera_pose))?;

        summary.objects_per_scene.push(num_objects);
        summary.annotation_paths.push(path);
        Ok(())
    }
    fn write_annotation(&self, scene_idx: usize, objects: &[PrimitiveObject]) -> Result<PathBuf, SceneError> {
        let camera_info = match &self.camera_info {
            None => { return Err(SceneError::new_generic_error_str("Camera info is required before writing annotations.", file!(), line!())); }
            Some(c) => { c }
        };
        let folder = self.config.image_dir.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let annotation = SceneAnnotation::new_from_scene(folder, &self.config.image_file_name(scene_idx), camera_info, objects)?;
        self.serializer.write_scene(&SceneLoopConfig::scene_stem(scene_idx), &annotation)
    }
    /// Nominal camera pose with Gaussian jitter on the position.
    fn sample_camera_pose(&mut self) -> Result<ScenePose, SceneError> {
        let nominal = self.config.camera.nominal_pose();
        let std = self.config.camera.position_jitter_std;
        let t = nominal.translation();
        let p = SimpleSamplers::normal_samples(&vec![(t[0], std), (t[1], std), (t[2], std)], &mut self.rng)?;
        Ok(ScenePose::new(nominal.rotation().clone(), nalgebra::Vector3::new(p[0], p[1], p[2])))
    }
    fn transition(&mut self, state: SceneLoopState) {
        scene_debug_print(&format!("[SceneLoop] {} -> {}", self.state, state));
        self.state = state;
        self.state_history.push(state);
    }
    fn fail(&mut self, scene_idx: usize, e: SceneError) -> SceneError {
        let stage = self.state.to_string();
        self.transition(SceneLoopState::Terminal);
        SceneError::new_stage_failure(&stage, scene_idx, e)
    }
}

/// Runs a whole configuration against the in-process simulator: creates the output
/// directories, discovers textures, wires the simulator to a fresh `SceneSyncState` and drives
/// every scene.
pub fn run_simulated_scene_loop(config: &SceneLoopConfig, ctx: RunContext) -> Result<SceneLoopSummary, SceneError> {
    config.validate()?;
    FileUtils::create_directory(&config.image_dir)?;
    FileUtils::create_directory(&config.dataset_dir)?;

    let texture_catalog = match &config.media_dir {
        None => { TextureCatalog::new(vec![]) }
        Some(media_dir) => { TextureCatalog::new_from_media_directory(media_dir)? }
    };
    scene_debug_print(&format!("[SceneLoop] {} textures available.", texture_catalog.len()));

    let sync = Arc::new(SceneSyncState::new(config.barriers.wait_settings()));
    let coordinator = SimulatedCoordinator::new(config.simulator_settings(), sync.clone());
    let mut driver = SceneLoopDriver::new(config, texture_catalog, &coordinator, &coordinator, &coordinator, &sync, ctx)?;
    driver.run()
}
