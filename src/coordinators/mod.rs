use crate::coordinators::coordinator_responses::{CameraResponse, WorldResponse};
use crate::scene_requests::camera_request::CameraRequest;
use crate::scene_requests::visual_request::VisualRequest;
use crate::scene_requests::world_request::WorldRequest;
use crate::utils::utils_errors::SceneError;

pub mod coordinator_responses;
pub mod response_delivery;
pub mod simulated_coordinator;

/// Remote side that owns object lifecycle in the simulated world.  Sending only hands the
/// request to the transport; any answer arrives later through a `ResponseHandler`.
pub trait WorldCoordinator {
    fn send_world_request(&self, request: WorldRequest) -> Result<(), SceneError>;
}

/// Remote side that owns the camera sensor.
pub trait CameraCoordinator {
    fn send_camera_request(&self, request: CameraRequest) -> Result<(), SceneError>;
}

/// Remote side that changes how spawned models look.  Requests are fire and forget.
pub trait VisualCoordinator {
    fn send_visual_request(&self, request: VisualRequest) -> Result<(), SceneError>;
}

/// Receives responses on the delivery thread, concurrently with the driver.
pub trait ResponseHandler: Send + Sync {
    fn on_world_response(&self, response: WorldResponse);
    fn on_camera_response(&self, response: CameraResponse);
}
