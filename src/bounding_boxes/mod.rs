pub mod bounding_box_3d;
pub mod bounding_box_projector;
