use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use nalgebra::{Vector2, Vector3};
use parking_lot::Mutex;
use serde::{Serialize, Deserialize};
use crate::bounding_boxes::bounding_box_3d::BoundingBox3D;
use crate::coordinators::coordinator_responses::{CameraInfo, CameraResponse, CoordinatorResponse, ObjectBoundingBox, WorldResponse};
use crate::coordinators::response_delivery::ResponseDelivery;
use crate::coordinators::{CameraCoordinator, ResponseHandler, VisualCoordinator, WorldCoordinator};
use crate::scene_layout::material_pattern_sampler::MaterialPatternSampler;
use crate::scene_requests::camera_request::CameraRequest;
use crate::scene_requests::visual_request::VisualRequest;
use crate::scene_requests::world_request::{RemoveTarget, SpawnObject, SpawnObjectKind, WorldRequest};
use crate::utils::utils_console::{scene_debug_print, scene_warning_print};
use crate::utils::utils_errors::SceneError;
use crate::utils::utils_sampling::{new_scene_rng, SceneRng};
use crate::utils::utils_se3::scene_pose::ScenePose;

/// Behaviour of the in-process stand-in for the simulator plugins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSettings {
    pub image_width: u32,
    pub image_height: u32,
    pub image_depth: u32,
    /// Horizontal field of view of the camera sensor, in radians.
    pub horizontal_fov: f64,
    /// Number of status queries a spawned model stays invisible for.
    pub spawn_settle_queries: usize,
    pub response_delay_ms: u64,
    pub fail_captures: bool,
    pub answer_status_queries: bool,
    pub camera_model_name: String,
    /// Material name patterns of the visual plugin.  Material randomization is off while empty.
    pub material_patterns: Vec<String>,
    pub material_variants: usize,
    pub material_seed: Option<u64>
}
impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            image_depth: 3,
            horizontal_fov: 1.047,
            spawn_settle_queries: 1,
            response_delay_ms: 0,
            fail_captures: false,
            answer_status_queries: true,
            camera_model_name: "camera".to_string(),
            material_patterns: vec![],
            material_variants: 0,
            material_seed: None
        }
    }
}
impl SimulatorSettings {
    pub fn camera_info(&self) -> CameraInfo {
        CameraInfo { width: self.image_width, height: self.image_height, depth: self.image_depth }
    }
    pub fn focal_length(&self) -> f64 {
        (self.image_width as f64 * 0.5) / (self.horizontal_fov * 0.5).tan()
    }
    pub fn material_sampler(&self) -> Option<MaterialPatternSampler> {
        if self.material_patterns.is_empty() { return None; }
        MaterialPatternSampler::new(self.material_patterns.clone(), self.material_variants).ok()
    }
}

enum SimulatorCommand {
    World(WorldRequest),
    Camera(CameraRequest),
    Visual(VisualRequest),
    Shutdown
}

/// Simulator stand-in serving the world, camera and visual coordinator interfaces.  Requests are processed in order on
/// a simulator thread; responses travel back through a `ResponseDelivery`.
pub struct SimulatedCoordinator {
    command_sender: Mutex<Sender<SimulatorCommand>>,
    handle: Option<JoinHandle<()>>
}
impl SimulatedCoordinator {
    pub fn new(settings: SimulatorSettings, handler: Arc<dyn ResponseHandler>) -> Self {
        let (command_sender, command_receiver) = channel::<SimulatorCommand>();
        let handle = thread::spawn(move || {
            let delivery = ResponseDelivery::new(handler);
            let mut world = SimulatedWorld::new(settings);
            world.run(command_receiver, &delivery);
        });

        Self {
            command_sender: Mutex::new(command_sender),
            handle: Some(handle)
        }
    }
    fn send_command(&self, command: SimulatorCommand, coordinator_name: &str) -> Result<(), SceneError> {
        return match self.command_sender.lock().send(command) {
            Ok(_) => { Ok(()) }
            Err(_) => { Err(SceneError::new_transport_error(coordinator_name, "simulator thread is no longer running.", file!(), line!())) }
        }
    }
}
impl WorldCoordinator for SimulatedCoordinator {
    fn send_world_request(&self, request: WorldRequest) -> Result<(), SceneError> {
        self.send_command(SimulatorCommand::World(request), "SimulatedWorld")
    }
}
impl CameraCoordinator for SimulatedCoordinator {
    fn send_camera_request(&self, request: CameraRequest) -> Result<(), SceneError> {
        self.send_command(SimulatorCommand::Camera(request), "SimulatedCamera")
    }
}
impl VisualCoordinator for SimulatedCoordinator {
    fn send_visual_request(&self, request: VisualRequest) -> Result<(), SceneError> {
        self.send_command(SimulatorCommand::Visual(request), "SimulatedVisual")
    }
}
impl Drop for SimulatedCoordinator {
    fn drop(&mut self) {
        let _ = self.command_sender.lock().send(SimulatorCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Gazebo style pinhole camera: the camera looks along its local +x axis, with +y to the left of
/// the image and +z up.  Returns pixel coordinates with the origin in the top left corner.
pub fn project_point(camera_pose: &ScenePose, point: &Vector3<f64>, settings: &SimulatorSettings) -> Vector2<f64> {
    let p = camera_pose.inverse_multiply_by_point(point);
    let depth = p[0].max(1e-6);
    let f = settings.focal_length();
    let u = settings.image_width as f64 * 0.5 - f * p[1] / depth;
    let v = settings.image_height as f64 * 0.5 - f * p[2] / depth;
    Vector2::new(u.round(), v.round())
}

#[derive(Clone, Debug)]
struct SimulatedModel {
    name: String,
    kind: SpawnObjectKind,
    pose: ScenePose,
    material: Option<String>
}
impl SimulatedModel {
    fn bounding_box(&self) -> Option<BoundingBox3D> {
        return match &self.kind {
            SpawnObjectKind::Sphere { radius } => { Some(BoundingBox3D::new_sphere(self.pose.translation(), *radius)) }
            SpawnObjectKind::Cylinder { radius, length } => { Some(BoundingBox3D::new_oriented_cylinder(&self.pose, *radius, *length)) }
            SpawnObjectKind::Box { size } => { Some(BoundingBox3D::new_oriented_box(&self.pose, size)) }
            _ => { None }
        }
    }
}

struct SimulatedWorld {
    settings: SimulatorSettings,
    live_models: Vec<SimulatedModel>,
    pending_models: Vec<(SimulatedModel, usize)>,
    unnamed_counters: HashMap<&'static str, usize>,
    physics_enabled: bool,
    paused: bool,
    output_dir: PathBuf,
    capture_counter: usize,
    material_sampler: Option<MaterialPatternSampler>,
    rng: SceneRng
}
impl SimulatedWorld {
    fn new(settings: SimulatorSettings) -> Self {
        let material_sampler = settings.material_sampler();
        let rng = new_scene_rng(settings.material_seed);
        Self {
            settings,
            live_models: vec![],
            pending_models: vec![],
            unnamed_counters: HashMap::new(),
            physics_enabled: true,
            paused: false,
            output_dir: PathBuf::from("/tmp/camera_utils_output/"),
            capture_counter: 0,
            material_sampler,
            rng
        }
    }
    fn run(&mut self, receiver: Receiver<SimulatorCommand>, delivery: &ResponseDelivery) {
        for command in receiver.iter() {
            let responses = match command {
                SimulatorCommand::World(request) => { self.handle_world_request(request) }
                SimulatorCommand::Camera(request) => { self.handle_camera_request(request) }
                SimulatorCommand::Visual(request) => { self.handle_visual_request(request) }
                SimulatorCommand::Shutdown => { break; }
            };
            for response in responses {
                if self.settings.response_delay_ms > 0 {
                    thread::sleep(Duration::from_millis(self.settings.response_delay_ms));
                }
                if let Err(e) = delivery.deliver(response) {
                    scene_warning_print(&format!("[SimulatedWorld] {}", e));
                }
            }
        }
    }
    fn handle_world_request(&mut self, request: WorldRequest) -> Vec<CoordinatorResponse> {
        scene_debug_print(&format!("[SimulatedWorld] received {} request.", request.kind_str()));
        return match request {
            WorldRequest::Spawn { objects } => {
                for object in objects { self.spawn(object); }
                vec![]
            }
            WorldRequest::Move { objects } => {
                for object in &objects {
                    match self.model_mut(&object.name) {
                        None => { scene_warning_print(&format!("[SimulatedWorld] cannot move unknown model {:?}.", object.name)); }
                        Some(model) => { model.pose = object.pose.clone(); }
                    }
                }
                vec![CoordinatorResponse::World(WorldResponse::MoveAck)]
            }
            WorldRequest::Remove { target } => {
                self.remove(&target);
                vec![]
            }
            WorldRequest::Physics { enabled } => {
                self.physics_enabled = enabled.unwrap_or(!self.physics_enabled);
                scene_debug_print(&format!("[SimulatedWorld] physics enabled: {}", self.physics_enabled));
                vec![]
            }
            WorldRequest::Pause { paused } => {
                self.paused = paused.unwrap_or(!self.paused);
                scene_debug_print(&format!("[SimulatedWorld] paused: {}", self.paused));
                vec![]
            }
            WorldRequest::Status => {
                self.settle_pending_models();
                if !self.settings.answer_status_queries { return vec![]; }
                vec![CoordinatorResponse::World(WorldResponse::Info { object_count: self.live_models.len() })]
            }
            WorldRequest::BoundingBoxes { names } => {
                let mut out_vec = vec![];
                for name in &names {
                    let model = match self.live_models.iter().find(|m| &m.name == name) {
                        None => {
                            scene_warning_print(&format!("[SimulatedWorld] no live model named {:?}.", name));
                            continue;
                        }
                        Some(m) => { m }
                    };
                    if let Some(bounding_box) = model.bounding_box() {
                        let boxes = vec![ObjectBoundingBox { name: name.clone(), bounding_box }];
                        out_vec.push(CoordinatorResponse::World(WorldResponse::Properties { boxes }));
                    }
                }
                out_vec
            }
        }
    }
    fn handle_camera_request(&mut self, request: CameraRequest) -> Vec<CoordinatorResponse> {
        scene_debug_print(&format!("[SimulatedCamera] received {} request.", request.kind_str()));
        return match request {
            CameraRequest::Capture { file_name } => {
                let file_name = file_name.unwrap_or(format!("{:06}", self.capture_counter));
                self.capture_counter += 1;
                let success = !self.settings.fail_captures;
                scene_debug_print(&format!("[SimulatedCamera] capture of {:?} into {:?}, success: {}", file_name, self.output_dir, success));
                vec![CoordinatorResponse::Camera(CameraResponse::Capture { success })]
            }
            CameraRequest::CameraInfo => {
                vec![CoordinatorResponse::Camera(CameraResponse::CameraInfo(self.settings.camera_info()))]
            }
            CameraRequest::Project { name, points } => {
                let camera_pose = self.camera_pose();
                points.iter()
                    .map(|p| CoordinatorResponse::Camera(CameraResponse::Projection { name: name.clone(), point: project_point(&camera_pose, p, &self.settings) }))
                    .collect()
            }
            CameraRequest::SetOutputDir { path } => {
                self.output_dir = path.clone();
                vec![CoordinatorResponse::Camera(CameraResponse::OutputDirSet { path })]
            }
        }
    }
    fn handle_visual_request(&mut self, request: VisualRequest) -> Vec<CoordinatorResponse> {
        scene_debug_print(&format!("[SimulatedVisual] received {} request.", request.kind_str()));
        match request {
            VisualRequest::RandomizeMaterial { visuals } => {
                let sampler = match &self.material_sampler {
                    None => {
                        scene_warning_print("[SimulatedVisual] no material patterns configured, ignoring request.");
                        return vec![];
                    }
                    Some(s) => { s.clone() }
                };
                for name in &visuals {
                    let material = match sampler.sample_material_name(&mut self.rng) {
                        Ok(m) => { m }
                        Err(e) => { scene_warning_print(&format!("[SimulatedVisual] {}", e)); continue; }
                    };
                    match self.model_mut(name) {
                        None => { scene_warning_print(&format!("[SimulatedVisual] no model named {:?}.", name)); }
                        Some(model) => {
                            scene_debug_print(&format!("[SimulatedVisual] {:?} now uses {}.", name, material));
                            model.material = Some(material);
                        }
                    }
                }
            }
        }
        vec![]
    }
    fn spawn(&mut self, object: SpawnObject) {
        let name = match object.name {
            Some(name) => { name }
            None => { self.next_unnamed_name(&object.kind) }
        };
        if self.model_exists(&name) {
            scene_warning_print(&format!("[SimulatedWorld] model {:?} already exists, ignoring spawn.", name));
            return;
        }

        let model = SimulatedModel {
            name,
            kind: object.kind,
            pose: object.pose.unwrap_or_default(),
            material: object.texture.as_ref().map(|t| t.material_name().to_string())
        };
        let material = match &object.texture {
            Some(t) => { t.to_sdf_script_string() }
            None => { "untextured".to_string() }
        };
        scene_debug_print(&format!("[SimulatedWorld] spawning {:?} at <pose>{}</pose> with {}.", model.name, model.pose.to_sdf_pose_string(), material));
        if self.settings.spawn_settle_queries == 0 {
            self.live_models.push(model);
        } else {
            self.pending_models.push((model, self.settings.spawn_settle_queries));
        }
    }
    fn remove(&mut self, target: &RemoveTarget) {
        self.live_models.retain(|m| !target.matches(&m.name));
        self.pending_models.retain(|(m, _)| !target.matches(&m.name));
    }
    fn settle_pending_models(&mut self) {
        for (_, remaining) in self.pending_models.iter_mut() {
            *remaining -= 1;
        }
        let (settled, pending): (Vec<_>, Vec<_>) = self.pending_models.drain(..).partition(|(_, remaining)| *remaining == 0);
        self.pending_models = pending;
        self.live_models.extend(settled.into_iter().map(|(m, _)| m));
    }
    fn model_exists(&self, name: &str) -> bool {
        self.live_models.iter().any(|m| m.name == name) || self.pending_models.iter().any(|(m, _)| m.name == name)
    }
    fn model_mut(&mut self, name: &str) -> Option<&mut SimulatedModel> {
        return match self.live_models.iter().position(|m| m.name == name) {
            Some(idx) => { Some(&mut self.live_models[idx]) }
            None => { self.pending_models.iter_mut().map(|(m, _)| m).find(|m| m.name == name) }
        }
    }
    fn camera_pose(&self) -> ScenePose {
        return match self.live_models.iter().find(|m| m.name == self.settings.camera_model_name) {
            Some(m) => { m.pose.clone() }
            None => {
                scene_warning_print("[SimulatedCamera] camera model is not in the world, projecting from the origin.");
                ScenePose::default()
            }
        }
    }
    fn next_unnamed_name(&mut self, kind: &SpawnObjectKind) -> String {
        let kind_str = match kind {
            SpawnObjectKind::Sphere { .. } => { "sphere" }
            SpawnObjectKind::Cylinder { .. } => { "cylinder" }
            SpawnObjectKind::Box { .. } => { "box" }
            SpawnObjectKind::Custom { .. } => { "custom" }
            SpawnObjectKind::CustomLight { .. } => { "light" }
            SpawnObjectKind::Model { .. } => { "model" }
        };
        let counter = self.unnamed_counters.entry(kind_str).or_insert(0);
        let name = format!("plugin_{}_{}", kind_str, counter);
        *counter += 1;
        name
    }
}
