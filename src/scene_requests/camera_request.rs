use std::path::PathBuf;
use nalgebra::Vector3;
use serde::{Serialize, Deserialize};

/// Requests accepted by the camera coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CameraRequest {
    /// Saves the next frame. Without a file name the coordinator picks a sequential one.
    Capture { file_name: Option<String> },
    CameraInfo,
    /// Projects world points of the named object; one response arrives per point.
    Project { name: String, points: Vec<Vector3<f64>> },
    SetOutputDir { path: PathBuf }
}
impl CameraRequest {
    pub fn kind_str(&self) -> &'static str {
        return match self {
            CameraRequest::Capture { .. } => { "Capture" }
            CameraRequest::CameraInfo => { "CameraInfo" }
            CameraRequest::Project { .. } => { "Project" }
            CameraRequest::SetOutputDir { .. } => { "SetOutputDir" }
        }
    }
}
