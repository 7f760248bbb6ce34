//! Scene geometry consumed by the projection engine.
//!
//! The scene is a flat description handed over by the geometry kernel:
//! faces with their loops and normals, standalone edges and curves, the
//! overall bounding box and the reference normal to project along.
//! Faces lying on a shared support surface carry the same [`GroupId`].

use nalgebra::{Point3, Vector3};
use u_cutlist_core::{Error, Result};

use crate::frame::ProjectionFrame;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a coplanar face group.
pub type GroupId = u32;

/// A planar face made of an outer loop followed by hole loops.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Face {
    /// Loops of the face. The first loop is the outer boundary.
    pub loops: Vec<Vec<Point3<f64>>>,

    /// Plane normal, pointing out of the solid.
    pub normal: Vector3<f64>,

    /// Coplanar group this face belongs to.
    pub group: Option<GroupId>,
}

impl Face {
    /// Creates a face with the given normal and no loops.
    pub fn new(normal: Vector3<f64>) -> Self {
        Self {
            loops: Vec::new(),
            normal,
            group: None,
        }
    }

    /// Sets the outer loop.
    pub fn with_outer(mut self, points: Vec<Point3<f64>>) -> Self {
        if self.loops.is_empty() {
            self.loops.push(points);
        } else {
            self.loops[0] = points;
        }
        self
    }

    /// Adds a hole loop.
    pub fn with_hole(mut self, points: Vec<Point3<f64>>) -> Self {
        self.loops.push(points);
        self
    }

    /// Assigns the face to a coplanar group.
    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    /// Iterates over every vertex of every loop.
    pub fn points(&self) -> impl Iterator<Item = &Point3<f64>> {
        self.loops.iter().flatten()
    }

    /// Depth of this face below the top of `frame`.
    pub fn depth_in(&self, frame: &ProjectionFrame) -> f64 {
        frame.face_depth(self)
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.loops.is_empty() {
            return Err(Error::InvalidInput(format!("face {} has no loops", index)));
        }
        if let Some(short) = self.loops.iter().position(|l| l.len() < 3) {
            return Err(Error::InvalidInput(format!(
                "face {} loop {} has fewer than 3 points",
                index, short
            )));
        }
        if !self.points().all(is_finite_point) {
            return Err(Error::InvalidInput(format!(
                "face {} has non-finite coordinates",
                index
            )));
        }
        if !is_usable_vector(&self.normal) {
            return Err(Error::InvalidInput(format!(
                "face {} has a degenerate normal",
                index
            )));
        }
        Ok(())
    }
}

/// A standalone edge that does not bound any face.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge {
    /// Ordered edge vertices.
    pub points: Vec<Point3<f64>>,
}

impl Edge {
    /// Creates an edge from its vertices.
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }
}

/// A standalone curve, open or closed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Curve {
    /// Ordered curve vertices.
    pub points: Vec<Point3<f64>>,
    /// Whether the curve forms a closed loop.
    pub closed: bool,
}

impl Curve {
    /// Creates an open curve.
    pub fn open(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    /// Creates a closed curve.
    pub fn closed(points: Vec<Point3<f64>>) -> Self {
        Self {
            points,
            closed: true,
        }
    }
}

/// Axis-aligned 3D bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds3 {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Bounds3 {
    /// Creates bounds from two corners.
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points. Returns None for an empty iterator.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |b, p| Self {
            min: b.min.inf(p),
            max: b.max.sup(p),
        }))
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    fn validate(&self) -> Result<()> {
        if !is_finite_point(&self.min) || !is_finite_point(&self.max) {
            return Err(Error::InvalidInput("bounds are not finite".to_string()));
        }
        if self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z {
            return Err(Error::InvalidInput(format!(
                "bounds are inverted: min {:?} max {:?}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

/// Complete input of one projection run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scene {
    /// Faces of the model.
    pub faces: Vec<Face>,
    /// Standalone edges.
    pub edges: Vec<Edge>,
    /// Standalone curves.
    pub curves: Vec<Curve>,
    /// Overall bounding box.
    pub bounds: Bounds3,
    /// Direction the model is viewed from.
    pub reference_normal: Vector3<f64>,
}

impl Scene {
    /// Creates an empty scene viewed along +Z.
    pub fn new(bounds: Bounds3) -> Self {
        Self {
            faces: Vec::new(),
            edges: Vec::new(),
            curves: Vec::new(),
            bounds,
            reference_normal: Vector3::z(),
        }
    }

    /// Creates a scene whose bounds enclose the given faces.
    pub fn from_faces(faces: Vec<Face>) -> Result<Self> {
        let bounds = Bounds3::from_points(faces.iter().flat_map(|f| f.points()))
            .ok_or_else(|| Error::InvalidInput("scene has no geometry".to_string()))?;
        Ok(Self::new(bounds).with_faces(faces))
    }

    /// Adds a face.
    pub fn with_face(mut self, face: Face) -> Self {
        self.faces.push(face);
        self
    }

    /// Adds several faces.
    pub fn with_faces(mut self, faces: impl IntoIterator<Item = Face>) -> Self {
        self.faces.extend(faces);
        self
    }

    /// Adds a standalone edge.
    pub fn with_edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Adds a standalone curve.
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curves.push(curve);
        self
    }

    /// Sets the reference normal.
    pub fn with_reference_normal(mut self, normal: Vector3<f64>) -> Self {
        self.reference_normal = normal;
        self
    }

    /// Returns true if the scene holds no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.edges.is_empty() && self.curves.is_empty()
    }

    /// Validates the scene and returns an error if it is empty or malformed.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::InvalidInput(
                "scene has no faces, edges or curves".to_string(),
            ));
        }
        if !is_usable_vector(&self.reference_normal) {
            return Err(Error::InvalidInput(
                "reference normal is degenerate".to_string(),
            ));
        }
        self.bounds.validate()?;

        for (i, face) in self.faces.iter().enumerate() {
            face.validate(i)?;
        }
        for (i, edge) in self.edges.iter().enumerate() {
            if edge.points.len() < 2 || !edge.points.iter().all(is_finite_point) {
                return Err(Error::InvalidInput(format!("edge {} is malformed", i)));
            }
        }
        for (i, curve) in self.curves.iter().enumerate() {
            if curve.points.len() < 2 || !curve.points.iter().all(is_finite_point) {
                return Err(Error::InvalidInput(format!("curve {} is malformed", i)));
            }
        }
        Ok(())
    }
}

fn is_finite_point(p: &Point3<f64>) -> bool {
    p.iter().all(|c| c.is_finite())
}

fn is_usable_vector(v: &Vector3<f64>) -> bool {
    v.iter().all(|c| c.is_finite()) && v.norm() > f64::EPSILON
}
