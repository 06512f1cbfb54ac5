pub mod camera_request;
pub mod scene_request_builder;
pub mod visual_request;
pub mod world_request;
