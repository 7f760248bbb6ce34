//! Projection frame: a right-handed 2D basis perpendicular to the
//! reference normal, plus the extent of the scene along that normal.

use nalgebra::{Point3, Vector3};
use u_cutlist_core::{Error, Path2, Point2, Result};

use crate::scene::{Bounds3, Face};

/// Faces whose normal makes a cosine below this with the reference normal
/// are treated as perpendicular or back-facing.
pub const FACING_EPSILON: f64 = 1e-9;

/// Maps 3D points to 2D coordinates and depths.
///
/// `u × v = normal`, so loops that wind counter-clockwise when viewed from
/// the normal's side keep a positive signed area after projection.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionFrame {
    normal: Vector3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    top: f64,
    bottom: f64,
}

impl ProjectionFrame {
    /// Builds the frame for a reference normal and scene bounds.
    pub fn new(reference_normal: &Vector3<f64>, bounds: &Bounds3) -> Result<Self> {
        let normal = reference_normal
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| Error::InvalidInput("reference normal is degenerate".to_string()))?;

        let helper = if normal.y.abs() < 0.9 {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = helper.cross(&normal).normalize();
        let v = normal.cross(&u);

        let heights = bounds.corners().map(|c| c.coords.dot(&normal));
        let top = heights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let bottom = heights.iter().copied().fold(f64::INFINITY, f64::min);

        Ok(Self {
            normal,
            u,
            v,
            top,
            bottom,
        })
    }

    /// Unit reference normal.
    pub fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    /// Height of a point along the reference normal.
    pub fn height(&self, point: &Point3<f64>) -> f64 {
        point.coords.dot(&self.normal)
    }

    /// Distance from the top bound plane (depth 0) down to the point.
    pub fn depth_of(&self, point: &Point3<f64>) -> f64 {
        self.top - self.height(point)
    }

    /// Total extent of the scene along the reference normal.
    pub fn max_depth(&self) -> f64 {
        self.top - self.bottom
    }

    /// Projects a point onto the 2D frame.
    pub fn project_point(&self, point: &Point3<f64>) -> Point2 {
        (point.coords.dot(&self.u), point.coords.dot(&self.v))
    }

    /// Projects an ordered point sequence.
    pub fn project_points(&self, points: &[Point3<f64>]) -> Path2 {
        points.iter().map(|p| self.project_point(p)).collect()
    }

    /// Cosine of the angle between a face normal and the reference normal.
    pub fn facing(&self, face: &Face) -> f64 {
        face.normal.normalize().dot(&self.normal)
    }

    /// Returns true if the face is visible from the reference direction:
    /// neither perpendicular to it nor turned away from it.
    pub fn is_exposed(&self, face: &Face) -> bool {
        self.facing(face) > FACING_EPSILON
    }

    /// Depth of the face's shallowest point.
    pub fn face_depth(&self, face: &Face) -> f64 {
        let highest = face
            .points()
            .map(|p| self.height(p))
            .fold(f64::NEG_INFINITY, f64::max);
        self.top - highest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use u_cutlist_core::geometry::signed_area;

    fn unit_bounds(h: f64) -> Bounds3 {
        Bounds3::new(Point3::origin(), Point3::new(10.0, 10.0, h))
    }

    #[test]
    fn test_z_frame_is_identity_in_plane() {
        let frame = ProjectionFrame::new(&Vector3::z(), &unit_bounds(5.0)).unwrap();
        assert_eq!(frame.project_point(&Point3::new(3.0, 4.0, 1.0)), (3.0, 4.0));
        assert_relative_eq!(frame.max_depth(), 5.0);
        assert_relative_eq!(frame.depth_of(&Point3::new(0.0, 0.0, 5.0)), 0.0);
        assert_relative_eq!(frame.depth_of(&Point3::new(0.0, 0.0, 1.0)), 4.0);
    }

    #[test]
    fn test_frame_preserves_winding() {
        for normal in [Vector3::x(), Vector3::y(), -Vector3::z(), Vector3::new(1.0, 1.0, 1.0)] {
            let frame = ProjectionFrame::new(&normal, &unit_bounds(1.0)).unwrap();
            let n = normal.normalize();
            let a = n.cross(&Vector3::new(0.3, 0.7, 0.1)).normalize();
            let b = n.cross(&a);
            let square: Vec<Point3<f64>> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
                .iter()
                .map(|&(s, t)| Point3::from(a * s + b * t))
                .collect();
            let projected = frame.project_points(&square);
            assert!(signed_area(&projected) > 0.0, "normal {:?}", normal);
        }
    }

    #[test]
    fn test_facing_filter() {
        let frame = ProjectionFrame::new(&Vector3::z(), &unit_bounds(1.0)).unwrap();
        let up = Face::new(Vector3::new(0.0, 0.0, 2.0));
        let side = Face::new(Vector3::x());
        let down = Face::new(-Vector3::z());
        let tilted = Face::new(Vector3::new(1.0, 0.0, 1.0));
        assert!(frame.is_exposed(&up));
        assert!(!frame.is_exposed(&side));
        assert!(!frame.is_exposed(&down));
        assert!(frame.is_exposed(&tilted));
    }

    #[test]
    fn test_degenerate_normal() {
        assert!(ProjectionFrame::new(&Vector3::zeros(), &unit_bounds(1.0)).is_err());
    }
}
