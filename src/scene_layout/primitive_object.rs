use nalgebra::Vector3;
use serde::{Serialize, Deserialize};
use strum_macros::{Display, EnumIter};
use crate::bounding_boxes::bounding_box_3d::BoundingBox3D;
use crate::bounding_boxes::bounding_box_projector::BoundingRect2D;
use crate::scene_layout::texture_catalog::TextureReference;
use crate::utils::utils_se3::scene_pose::ScenePose;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, Display)]
pub enum PrimitiveType {
    Box,
    Cylinder,
    Sphere
}
impl PrimitiveType {
    /// Human readable label written into annotation files.
    pub fn class_label(&self) -> &'static str {
        return match self {
            PrimitiveType::Box => { "box" }
            PrimitiveType::Cylinder => { "cylinder" }
            PrimitiveType::Sphere => { "sphere" }
        }
    }
    /// Prefix of the sequential model names, e.g. `cylinder_` for `cylinder_4`.
    pub fn name_prefix(&self) -> String {
        format!("{}_", self.class_label())
    }
    pub fn all_name_prefixes() -> Vec<String> {
        vec![PrimitiveType::Box.name_prefix(), PrimitiveType::Cylinder.name_prefix(), PrimitiveType::Sphere.name_prefix()]
    }
}

/// Whether the object stands on a flat face or lies on its side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum OrientationClass {
    Horizontal,
    Vertical
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PrimitiveDimensions {
    Sphere { radius: f64 },
    /// The cylinder axis is the local z axis.
    Cylinder { radius: f64, length: f64 },
    Box { size: Vector3<f64> }
}

/// One procedurally placed primitive, enriched with its 3D and 2D boxes as the scene progresses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveObject {
    name: String,
    primitive_type: PrimitiveType,
    orientation_class: OrientationClass,
    pose: ScenePose,
    dimensions: PrimitiveDimensions,
    mass: f64,
    texture: Option<TextureReference>,
    cell_idx: usize,
    bounding_box_3d: Option<BoundingBox3D>,
    bounding_box_2d: Option<BoundingRect2D>
}
impl PrimitiveObject {
    pub fn new(name: &str,
               primitive_type: PrimitiveType,
               orientation_class: OrientationClass,
               pose: ScenePose,
               dimensions: PrimitiveDimensions,
               mass: f64,
               texture: Option<TextureReference>,
               cell_idx: usize) -> Self {
        Self {
            name: name.to_string(),
            primitive_type,
            orientation_class,
            pose,
            dimensions,
            mass,
            texture,
            cell_idx,
            bounding_box_3d: None,
            bounding_box_2d: None
        }
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }
    pub fn orientation_class(&self) -> OrientationClass {
        self.orientation_class
    }
    pub fn pose(&self) -> &ScenePose {
        &self.pose
    }
    pub fn dimensions(&self) -> &PrimitiveDimensions {
        &self.dimensions
    }
    pub fn mass(&self) -> f64 {
        self.mass
    }
    pub fn texture(&self) -> &Option<TextureReference> {
        &self.texture
    }
    pub fn cell_idx(&self) -> usize {
        self.cell_idx
    }
    pub fn bounding_box_3d(&self) -> &Option<BoundingBox3D> {
        &self.bounding_box_3d
    }
    pub fn bounding_box_2d(&self) -> &Option<BoundingRect2D> {
        &self.bounding_box_2d
    }
    pub fn set_bounding_box_3d(&mut self, bounding_box_3d: BoundingBox3D) {
        self.bounding_box_3d = Some(bounding_box_3d);
    }
    pub fn set_bounding_box_2d(&mut self, bounding_box_2d: BoundingRect2D) {
        self.bounding_box_2d = Some(bounding_box_2d);
    }
    /// World-space axis-aligned box of the object computed from its own pose and dimensions.
    pub fn world_aabb(&self) -> BoundingBox3D {
        return match &self.dimensions {
            PrimitiveDimensions::Sphere { radius } => { BoundingBox3D::new_sphere(self.pose.translation(), *radius) }
            PrimitiveDimensions::Cylinder { radius, length } => { BoundingBox3D::new_oriented_cylinder(&self.pose, *radius, *length) }
            PrimitiveDimensions::Box { size } => { BoundingBox3D::new_oriented_box(&self.pose, size) }
        }
    }
    /// Height of the lowest point of the object above the ground plane.
    pub fn lowest_point_z(&self) -> f64 {
        self.world_aabb().min_corner()[2]
    }
}
