use nalgebra::{Rotation3, UnitQuaternion, Vector3};
use serde::{Serialize, Deserialize};

/// A representation for an SE(3) pose composed of a unit quaternion rotation and a translation,
/// which is the form in which poses travel between the driver and the simulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenePose {
    rotation: UnitQuaternion<f64>,
    translation: Vector3<f64>
}
impl ScenePose {
    pub fn new(rotation: UnitQuaternion<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation
        }
    }
    pub fn new_identity() -> Self {
        Self::new(UnitQuaternion::identity(), Vector3::zeros())
    }
    /// Roll (rx), pitch (ry), yaw (rz) followed by the translation.
    pub fn new_from_euler_angles(rx: f64, ry: f64, rz: f64, x: f64, y: f64, z: f64) -> Self {
        Self::new(UnitQuaternion::from_euler_angles(rx, ry, rz), Vector3::new(x, y, z))
    }
    pub fn new_from_translation(x: f64, y: f64, z: f64) -> Self {
        Self::new(UnitQuaternion::identity(), Vector3::new(x, y, z))
    }
    /// Returns the rotation component of the object.
    pub fn rotation(&self) -> &UnitQuaternion<f64> {
        &self.rotation
    }
    /// Returns the translation component of the object.
    pub fn translation(&self) -> &Vector3<f64> {
        &self.translation
    }
    pub fn euler_angles(&self) -> (f64, f64, f64) {
        self.rotation.euler_angles()
    }
    pub fn rotation_matrix(&self) -> Rotation3<f64> {
        self.rotation.to_rotation_matrix()
    }
    /// Multiplication by a point.
    pub fn multiply_by_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        return self.rotation * point + self.translation;
    }
    /// Places the given world point in the pose's local coordinate system.
    pub fn inverse_multiply_by_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        return self.rotation.inverse() * (point - self.translation);
    }
    /// The `x y z roll pitch yaw` string used inside `<pose>` tags of model descriptions.
    pub fn to_sdf_pose_string(&self) -> String {
        let (r, p, y) = self.euler_angles();
        format!("{} {} {} {} {} {}", self.translation[0], self.translation[1], self.translation[2], r, p, y)
    }
}
impl Default for ScenePose {
    fn default() -> Self { Self::new_identity() }
}
