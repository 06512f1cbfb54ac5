use std::collections::HashMap;
use nalgebra::Vector2;
use serde::{Serialize, Deserialize};
use crate::bounding_boxes::bounding_box_3d::CORNERS_PER_BOX;
use crate::scene_layout::primitive_object::PrimitiveObject;
use crate::utils::utils_errors::SceneError;

/// Axis-aligned rectangle in pixel space: top-left corner plus width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingRect2D {
    x: i64,
    y: i64,
    width: i64,
    height: i64
}
impl BoundingRect2D {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }
    pub fn x(&self) -> i64 { self.x }
    pub fn y(&self) -> i64 { self.y }
    pub fn width(&self) -> i64 { self.width }
    pub fn height(&self) -> i64 { self.height }
    pub fn x_max(&self) -> i64 { self.x + self.width }
    pub fn y_max(&self) -> i64 { self.y + self.height }
    /// True when part of the rectangle lies outside a `width x height` image.
    pub fn exceeds_image(&self, image_width: u32, image_height: u32) -> bool {
        self.x < 0 || self.y < 0 || self.x_max() > image_width as i64 || self.y_max() > image_height as i64
    }
}

/// Turns the projected corners of each object's 3D box into the smallest enclosing pixel
/// rectangle.  This over-approximates the true silhouette.
pub struct BoundingBoxProjector;
impl BoundingBoxProjector {
    /// Min/max over any non-empty set of projected points.
    pub fn enclosing_rect(points: &[Vector2<f64>]) -> Result<BoundingRect2D, SceneError> {
        if points.is_empty() {
            return Err(SceneError::new_generic_error_str("Cannot compute a rectangle from zero projected points.", file!(), line!()));
        }

        let mut x_min = f64::INFINITY;
        let mut y_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for p in points {
            x_min = x_min.min(p[0]);
            y_min = y_min.min(p[1]);
            x_max = x_max.max(p[0]);
            y_max = y_max.max(p[1]);
        }

        let x = x_min.floor() as i64;
        let y = y_min.floor() as i64;
        return Ok(BoundingRect2D::new(x, y, x_max.ceil() as i64 - x, y_max.ceil() as i64 - y));
    }
    /// Same as `enclosing_rect`, but insists on exactly one projected point per box corner.
    pub fn rect_from_projected_corners(name: &str, points: &[Vector2<f64>]) -> Result<BoundingRect2D, SceneError> {
        if points.len() != CORNERS_PER_BOX {
            return Err(SceneError::new_generic_error_str(&format!("Object {:?} has {} projected corners, expected {}.", name, points.len(), CORNERS_PER_BOX), file!(), line!()));
        }
        return Self::enclosing_rect(points);
    }
    /// Fills in `bounding_box_2d` of every object from the accumulated corner projections.
    pub fn project_objects(objects: &mut [PrimitiveObject], projections: &HashMap<String, Vec<Vector2<f64>>>) -> Result<(), SceneError> {
        for object in objects.iter_mut() {
            let points = match projections.get(object.name()) {
                None => {
                    return Err(SceneError::new_generic_error_str(&format!("No projected corners were received for object {:?}.", object.name()), file!(), line!()));
                }
                Some(points) => { points }
            };
            let rect = Self::rect_from_projected_corners(object.name(), points)?;
            object.set_bounding_box_2d(rect);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_square_with_interior_duplicates() {
        let points = vec![
            Vector2::new(0.0, 0.0), Vector2::new(0.0, 10.0), Vector2::new(10.0, 0.0), Vector2::new(10.0, 10.0),
            Vector2::new(2.0, 3.0), Vector2::new(5.0, 5.0), Vector2::new(7.0, 1.0), Vector2::new(9.0, 9.0),
        ];
        let rect = BoundingBoxProjector::rect_from_projected_corners("box_0", &points).unwrap();
        assert_eq!(rect, BoundingRect2D::new(0, 0, 10, 10));
        assert_eq!(rect.x_max(), 10);
        assert_eq!(rect.y_max(), 10);
    }

    #[test]
    fn wrong_corner_count_is_rejected() {
        let points = vec![Vector2::new(0.0, 0.0); 7];
        assert!(BoundingBoxProjector::rect_from_projected_corners("box_0", &points).is_err());
        assert!(BoundingBoxProjector::enclosing_rect(&[]).is_err());
    }

    #[test]
    fn fractional_points_are_enclosed() {
        let rect = BoundingBoxProjector::enclosing_rect(&[Vector2::new(1.2, 2.7), Vector2::new(3.4, 5.1)]).unwrap();
        assert_eq!(rect, BoundingRect2D::new(1, 2, 3, 4));
    }

    #[test]
    fn truncation_against_image_bounds() {
        assert!(!BoundingRect2D::new(0, 0, 640, 480).exceeds_image(640, 480));
        assert!(BoundingRect2D::new(-1, 0, 10, 10).exceeds_image(640, 480));
        assert!(BoundingRect2D::new(600, 0, 50, 10).exceeds_image(640, 480));
    }
}
