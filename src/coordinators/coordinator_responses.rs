use std::path::PathBuf;
use nalgebra::Vector2;
use serde::{Serialize, Deserialize};
use crate::bounding_boxes::bounding_box_3d::BoundingBox3D;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectBoundingBox {
    pub name: String,
    pub bounding_box: BoundingBox3D
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WorldResponse {
    /// Answer to a status query: number of models currently live in the world.
    Info { object_count: usize },
    Properties { boxes: Vec<ObjectBoundingBox> },
    MoveAck
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInfo {
    pub width: u32,
    pub height: u32,
    pub depth: u32
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CameraResponse {
    Capture { success: bool },
    CameraInfo(CameraInfo),
    /// One projected point of the named object, in pixels.
    Projection { name: String, point: Vector2<f64> },
    OutputDirSet { path: PathBuf }
}

/// Everything a coordinator can send back over the response bus.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CoordinatorResponse {
    World(WorldResponse),
    Camera(CameraResponse)
}
