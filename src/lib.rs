//! Scene utils generates labeled synthetic training scenes with a robotics simulator.
//! A driver places randomized primitives on a grid, waits for the simulator to confirm the world
//! state, captures an image, projects the 3D bounding boxes of the objects into the image and
//! writes one annotation file per scene.
//! The simulator side is reached through coordinator traits; an in-process simulated coordinator
//! is provided for running the whole protocol without a simulator.

pub mod annotations;
pub mod bounding_boxes;
pub mod coordinators;
pub mod scene_layout;
pub mod scene_loop;
pub mod scene_requests;
pub mod scene_sync;
pub mod utils;
