use nalgebra::Vector3;
use serde::{Serialize, Deserialize};
use crate::scene_layout::texture_catalog::TextureReference;
use crate::utils::utils_se3::scene_pose::ScenePose;

/// Requests accepted by the world coordinator.  Each variant is one message kind; the transport
/// decodes them once at its boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WorldRequest {
    Spawn { objects: Vec<SpawnObject> },
    Move { objects: Vec<MoveObject> },
    Remove { target: RemoveTarget },
    /// `None` toggles the current setting.
    Physics { enabled: Option<bool> },
    /// `None` toggles the current setting.
    Pause { paused: Option<bool> },
    Status,
    BoundingBoxes { names: Vec<String> }
}
impl WorldRequest {
    pub fn kind_str(&self) -> &'static str {
        return match self {
            WorldRequest::Spawn { .. } => { "Spawn" }
            WorldRequest::Move { .. } => { "Move" }
            WorldRequest::Remove { .. } => { "Remove" }
            WorldRequest::Physics { .. } => { "Physics" }
            WorldRequest::Pause { .. } => { "Pause" }
            WorldRequest::Status => { "Status" }
            WorldRequest::BoundingBoxes { .. } => { "BoundingBoxes" }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpawnObjectKind {
    Sphere { radius: f64 },
    Cylinder { radius: f64, length: f64 },
    Box { size: Vector3<f64> },
    /// Full model description supplied inline.
    Custom { sdf: String },
    CustomLight { sdf: String },
    /// Model resolved by the simulator from its model path, e.g. `model://ground_plane`.
    Model { uri: String }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnObject {
    pub kind: SpawnObjectKind,
    pub name: Option<String>,
    pub pose: Option<ScenePose>,
    pub mass: Option<f64>,
    pub texture: Option<TextureReference>
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveObject {
    pub name: String,
    pub pose: ScenePose,
    pub is_light: bool
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RemoveTarget {
    All,
    /// Exact model names.
    Named(Vec<String>),
    /// Every model whose name contains one of the given substrings.
    Matching(Vec<String>)
}
impl RemoveTarget {
    pub fn matches(&self, model_name: &str) -> bool {
        return match self {
            RemoveTarget::All => { true }
            RemoveTarget::Named(names) => { names.iter().any(|n| n == model_name) }
            RemoveTarget::Matching(patterns) => { patterns.iter().any(|p| model_name.contains(p.as_str())) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_target_matching() {
        let t = RemoveTarget::Matching(vec!["box_".to_string(), "plugin_".to_string()]);
        assert!(t.matches("box_3"));
        assert!(t.matches("plugin_sphere_0"));
        assert!(!t.matches("ground"));
        assert!(RemoveTarget::Named(vec!["box_3".to_string()]).matches("box_3"));
        assert!(!RemoveTarget::Named(vec!["box_3".to_string()]).matches("box_30"));
        assert!(RemoveTarget::All.matches("camera"));
    }
}
