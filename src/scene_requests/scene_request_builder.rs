use std::path::Path;
use crate::bounding_boxes::bounding_box_3d::BoundingBox3D;
use crate::scene_layout::primitive_object::{PrimitiveDimensions, PrimitiveObject};
use crate::scene_layout::texture_catalog::TextureReference;
use crate::scene_requests::camera_request::CameraRequest;
use crate::scene_requests::visual_request::VisualRequest;
use crate::scene_requests::world_request::{MoveObject, RemoveTarget, SpawnObject, SpawnObjectKind, WorldRequest};
use crate::utils::utils_se3::scene_pose::ScenePose;

/// Pure translation of layouts and driver intents into coordinator requests.
pub struct SceneRequestBuilder;
impl SceneRequestBuilder {
    pub fn spawn_object_from_primitive(object: &PrimitiveObject) -> SpawnObject {
        let kind = match object.dimensions() {
            PrimitiveDimensions::Sphere { radius } => { SpawnObjectKind::Sphere { radius: *radius } }
            PrimitiveDimensions::Cylinder { radius, length } => { SpawnObjectKind::Cylinder { radius: *radius, length: *length } }
            PrimitiveDimensions::Box { size } => { SpawnObjectKind::Box { size: size.clone() } }
        };
        SpawnObject {
            kind,
            name: Some(object.name().to_string()),
            pose: Some(object.pose().clone()),
            mass: Some(object.mass()),
            texture: object.texture().clone()
        }
    }
    /// One batched spawn request for the whole layout.
    pub fn spawn_layout(objects: &[PrimitiveObject]) -> WorldRequest {
        WorldRequest::Spawn { objects: objects.iter().map(|o| Self::spawn_object_from_primitive(o)).collect() }
    }
    /// A static model is spawned from its inline description when one is given, otherwise by
    /// `model://<name>` uri.
    pub fn spawn_static_model(name: &str, sdf: Option<String>, pose: Option<ScenePose>, texture: Option<TextureReference>) -> WorldRequest {
        let kind = match sdf {
            Some(sdf) => { SpawnObjectKind::Custom { sdf } }
            None => { SpawnObjectKind::Model { uri: format!("model://{}", name) } }
        };
        WorldRequest::Spawn {
            objects: vec![SpawnObject {
                kind,
                name: Some(name.to_string()),
                pose,
                mass: None,
                texture
            }]
        }
    }
    pub fn move_object(name: &str, pose: &ScenePose) -> WorldRequest {
        WorldRequest::Move { objects: vec![MoveObject { name: name.to_string(), pose: pose.clone(), is_light: false }] }
    }
    pub fn remove_all() -> WorldRequest {
        WorldRequest::Remove { target: RemoveTarget::All }
    }
    pub fn remove_named(names: Vec<String>) -> WorldRequest {
        WorldRequest::Remove { target: RemoveTarget::Named(names) }
    }
    pub fn remove_objects(objects: &[PrimitiveObject]) -> WorldRequest {
        Self::remove_named(Self::object_names(objects))
    }
    pub fn remove_matching(patterns: Vec<String>) -> WorldRequest {
        WorldRequest::Remove { target: RemoveTarget::Matching(patterns) }
    }
    pub fn set_physics(enabled: Option<bool>) -> WorldRequest {
        WorldRequest::Physics { enabled }
    }
    pub fn set_paused(paused: Option<bool>) -> WorldRequest {
        WorldRequest::Pause { paused }
    }
    pub fn status() -> WorldRequest {
        WorldRequest::Status
    }
    pub fn query_bounding_boxes(objects: &[PrimitiveObject]) -> WorldRequest {
        WorldRequest::BoundingBoxes { names: Self::object_names(objects) }
    }
    pub fn capture(file_name: &str) -> CameraRequest {
        CameraRequest::Capture { file_name: Some(file_name.to_string()) }
    }
    pub fn camera_info() -> CameraRequest {
        CameraRequest::CameraInfo
    }
    /// Projection request for the eight corners of `bounding_box`.
    pub fn project_corners(name: &str, bounding_box: &BoundingBox3D) -> CameraRequest {
        CameraRequest::Project { name: name.to_string(), points: bounding_box.corners() }
    }
    pub fn set_output_dir(path: &Path) -> CameraRequest {
        CameraRequest::SetOutputDir { path: path.to_path_buf() }
    }
    pub fn randomize_materials(visuals: &[&str]) -> VisualRequest {
        VisualRequest::RandomizeMaterial { visuals: visuals.iter().map(|v| v.to_string()).collect() }
    }
    fn object_names(objects: &[PrimitiveObject]) -> Vec<String> {
        objects.iter().map(|o| o.name().to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector3;
    use crate::bounding_boxes::bounding_box_3d::CORNERS_PER_BOX;
    use crate::scene_layout::primitive_object::{OrientationClass, PrimitiveType};
    use super::*;

    fn cylinder() -> PrimitiveObject {
        PrimitiveObject::new("cylinder_2",
                             PrimitiveType::Cylinder,
                             OrientationClass::Vertical,
                             ScenePose::new_from_translation(0.25, 0.75, 0.2),
                             PrimitiveDimensions::Cylinder { radius: 0.1, length: 0.4 },
                             3.0,
                             Some(TextureReference::new("Checker_1")),
                             7)
    }

    #[test]
    fn layout_becomes_one_batched_spawn() {
        let objects = vec![cylinder()];
        match SceneRequestBuilder::spawn_layout(&objects) {
            WorldRequest::Spawn { objects } => {
                assert_eq!(objects.len(), 1);
                assert_eq!(objects[0].name.as_deref(), Some("cylinder_2"));
                assert_eq!(objects[0].kind, SpawnObjectKind::Cylinder { radius: 0.1, length: 0.4 });
                assert_eq!(objects[0].mass, Some(3.0));
                assert_eq!(objects[0].texture.as_ref().map(|t| t.material_name()), Some("Plugin/Checker_1"));
            }
            r => { panic!("unexpected request {:?}", r); }
        }
    }

    #[test]
    fn static_model_prefers_inline_description() {
        match SceneRequestBuilder::spawn_static_model("ground", Some("<sdf/>".to_string()), None, None) {
            WorldRequest::Spawn { objects } => { assert_eq!(objects[0].kind, SpawnObjectKind::Custom { sdf: "<sdf/>".to_string() }); }
            r => { panic!("unexpected request {:?}", r); }
        }
        match SceneRequestBuilder::spawn_static_model("camera", None, None, None) {
            WorldRequest::Spawn { objects } => { assert_eq!(objects[0].kind, SpawnObjectKind::Model { uri: "model://camera".to_string() }); }
            r => { panic!("unexpected request {:?}", r); }
        }
    }

    #[test]
    fn projection_request_carries_eight_corners() {
        let b = BoundingBox3D::new(Vector3::zeros(), Vector3::new(1.0, 1.0, 1.0));
        match SceneRequestBuilder::project_corners("box_0", &b) {
            CameraRequest::Project { name, points } => {
                assert_eq!(name, "box_0");
                assert_eq!(points.len(), CORNERS_PER_BOX);
            }
            r => { panic!("unexpected request {:?}", r); }
        }
    }
}
