//! 2D path types and winding helpers.
//!
//! Closed loops are stored without repeating the first vertex. The winding
//! convention used throughout the workspace is:
//!
//! - outer boundaries are counter-clockwise (positive signed area)
//! - holes are clockwise (negative signed area)

use geo::{Area, Contains, Coord, InteriorPoint, LineString, Point, Polygon};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 2D point.
pub type Point2 = (f64, f64);

/// A closed loop or open polyline of 2D points.
pub type Path2 = Vec<Point2>;

/// Minimal absolute loop area kept after boolean operations.
pub const MINIMAL_PATH_AREA: f64 = 1e-6;

/// Converts a loop to a geo polygon without holes.
pub fn to_geo_polygon(path: &[Point2]) -> Polygon<f64> {
    let ring = LineString::from(
        path.iter()
            .map(|&(x, y)| Coord { x, y })
            .collect::<Vec<_>>(),
    );
    Polygon::new(ring, vec![])
}

/// Signed area of a closed loop (positive for counter-clockwise).
pub fn signed_area(path: &[Point2]) -> f64 {
    if path.len() < 3 {
        return 0.0;
    }
    to_geo_polygon(path).signed_area()
}

/// Returns true if the loop winds counter-clockwise.
pub fn is_ccw(path: &[Point2]) -> bool {
    signed_area(path) > 0.0
}

/// Returns the loop with counter-clockwise winding.
pub fn as_outer(path: Path2) -> Path2 {
    if signed_area(&path) < 0.0 {
        reversed(path)
    } else {
        path
    }
}

/// Returns the loop with clockwise winding.
pub fn as_hole(path: Path2) -> Path2 {
    if signed_area(&path) > 0.0 {
        reversed(path)
    } else {
        path
    }
}

/// Reverses the vertex order of a loop.
pub fn reversed(mut path: Path2) -> Path2 {
    path.reverse();
    path
}

/// Removes a trailing vertex that duplicates the first one.
pub fn open_ring(mut path: Path2) -> Path2 {
    if path.len() > 1 && path.first() == path.last() {
        path.pop();
    }
    path
}

/// Returns true if every coordinate is finite.
pub fn is_finite(path: &[Point2]) -> bool {
    path.iter().all(|&(x, y)| x.is_finite() && y.is_finite())
}

/// Sum of signed areas, i.e. the net filled area of a normalized path set.
pub fn net_area(paths: &[Path2]) -> f64 {
    paths.iter().map(|p| signed_area(p)).sum()
}

/// Sum of absolute loop areas.
pub fn total_abs_area(paths: &[Path2]) -> f64 {
    paths.iter().map(|p| signed_area(p).abs()).sum()
}

/// Returns true if the point lies strictly inside the loop.
pub fn ring_contains(path: &[Point2], point: Point2) -> bool {
    to_geo_polygon(path).contains(&Point::new(point.0, point.1))
}

/// Returns a point inside the filled region of an outer loop, clear of its
/// holes. None when the outer loop has no area.
pub fn interior_point(outer: &[Point2], holes: &[Path2]) -> Option<Point2> {
    if signed_area(outer).abs() <= f64::EPSILON {
        return None;
    }
    let interiors = holes
        .iter()
        .map(|hole| to_geo_polygon(hole).exterior().clone())
        .collect();
    let polygon = Polygon::new(to_geo_polygon(outer).exterior().clone(), interiors);
    polygon.interior_point().map(|p| (p.x(), p.y()))
}

/// Axis-aligned bounding box of a 2D path.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds2 {
    /// Minimum corner.
    pub min: Point2,
    /// Maximum corner.
    pub max: Point2,
}

impl Bounds2 {
    /// Computes the bounds of a set of paths. Returns None when empty.
    pub fn of_paths(paths: &[Path2]) -> Option<Self> {
        let mut points = paths.iter().flatten();
        let first = *points.next()?;
        let mut bounds = Self {
            min: first,
            max: first,
        };
        for &(x, y) in points {
            bounds.min.0 = bounds.min.0.min(x);
            bounds.min.1 = bounds.min.1.min(y);
            bounds.max.0 = bounds.max.0.max(x);
            bounds.max.1 = bounds.max.1.max(y);
        }
        Some(bounds)
    }

    /// Width along x.
    pub fn width(&self) -> f64 {
        self.max.0 - self.min.0
    }

    /// Height along y.
    pub fn height(&self) -> f64 {
        self.max.1 - self.min.1
    }
}

/// Creates a counter-clockwise axis-aligned rectangle.
pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Path2 {
    vec![
        (x, y),
        (x + width, y),
        (x + width, y + height),
        (x, y + height),
    ]
}
