use itertools::iproduct;
use nalgebra::Vector3;
use serde::{Serialize, Deserialize};
use crate::utils::utils_se3::scene_pose::ScenePose;

/// Number of corners of a 3D box, and therefore number of projected points per object.
pub const CORNERS_PER_BOX: usize = 8;

/// Axis-aligned, world-space box described by its center and full size along each axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox3D {
    center: Vector3<f64>,
    size: Vector3<f64>
}
impl BoundingBox3D {
    pub fn new(center: Vector3<f64>, size: Vector3<f64>) -> Self {
        Self {
            center,
            size: size.abs()
        }
    }
    pub fn new_sphere(center: &Vector3<f64>, radius: f64) -> Self {
        Self::new(center.clone(), Vector3::repeat(2.0 * radius))
    }
    /// World AABB of a box of the given full `size` placed at `pose`.
    pub fn new_oriented_box(pose: &ScenePose, size: &Vector3<f64>) -> Self {
        let r = pose.rotation_matrix();
        let m = r.matrix();
        let half = size * 0.5;
        let half_extents = Vector3::from_fn(|i, _| {
            (0..3).map(|j| m[(i, j)].abs() * half[j]).sum::<f64>()
        });
        Self::new(pose.translation().clone(), half_extents * 2.0)
    }
    /// World AABB of a cylinder whose axis is the local z axis of `pose`.
    pub fn new_oriented_cylinder(pose: &ScenePose, radius: f64, length: f64) -> Self {
        let r = pose.rotation_matrix();
        let m = r.matrix();
        let half_extents = Vector3::from_fn(|i, _| {
            let axis_component = m[(i, 2)];
            axis_component.abs() * length * 0.5 + radius * (1.0 - axis_component * axis_component).max(0.0).sqrt()
        });
        Self::new(pose.translation().clone(), half_extents * 2.0)
    }
    pub fn center(&self) -> &Vector3<f64> {
        &self.center
    }
    pub fn size(&self) -> &Vector3<f64> {
        &self.size
    }
    pub fn min_corner(&self) -> Vector3<f64> {
        self.center - self.size * 0.5
    }
    pub fn max_corner(&self) -> Vector3<f64> {
        self.center + self.size * 0.5
    }
    /// The eight corners `center ± size/2`, one per sign combination.
    pub fn corners(&self) -> Vec<Vector3<f64>> {
        let half = self.size * 0.5;
        iproduct!([-1.0, 1.0], [-1.0, 1.0], [-1.0, 1.0])
            .map(|(sx, sy, sz)| self.center + Vector3::new(sx * half[0], sy * half[1], sz * half[2]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use super::*;

    #[test]
    fn corners_cover_every_sign_combination() {
        let b = BoundingBox3D::new(Vector3::new(1.0, 2.0, 3.0), Vector3::new(2.0, 4.0, 6.0));
        let corners = b.corners();
        assert_eq!(corners.len(), CORNERS_PER_BOX);
        for c in &corners {
            assert!(c[0] == 0.0 || c[0] == 2.0);
            assert!(c[1] == 0.0 || c[1] == 4.0);
            assert!(c[2] == 0.0 || c[2] == 6.0);
        }
        for i in 0..corners.len() {
            for j in (i + 1)..corners.len() {
                assert_ne!(corners[i], corners[j]);
            }
        }
    }

    #[test]
    fn yawed_box_grows_its_footprint() {
        let pose = ScenePose::new_from_euler_angles(0.0, 0.0, PI / 4.0, 0.0, 0.0, 0.0);
        let b = BoundingBox3D::new_oriented_box(&pose, &Vector3::new(1.0, 1.0, 1.0));
        let expected = 2.0_f64.sqrt();
        assert!((b.size()[0] - expected).abs() < 1e-9);
        assert!((b.size()[1] - expected).abs() < 1e-9);
        assert!((b.size()[2] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn lying_cylinder_is_long_along_x() {
        let pose = ScenePose::new_from_euler_angles(0.0, PI * 0.5, 0.0, 0.0, 0.0, 0.25);
        let b = BoundingBox3D::new_oriented_cylinder(&pose, 0.25, 2.0);
        assert!((b.size()[0] - 2.0).abs() < 1e-9);
        assert!((b.size()[1] - 0.5).abs() < 1e-9);
        assert!((b.size()[2] - 0.5).abs() < 1e-9);
        assert!(b.min_corner()[2].abs() < 1e-9);
        assert!((b.max_corner()[2] - 0.5).abs() < 1e-9);
    }
}
