//! Depth layers and projection result types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use u_cutlist_core::geometry::{is_ccw, net_area, signed_area};
use u_cutlist_core::Path2;

/// Role of a depth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LayerType {
    /// Shallowest layer while the projection stages are running.
    Upper,
    /// Combined outer silhouette (hole-merge mode).
    Outer,
    /// Ordinary layer at some depth.
    Default,
    /// Through-holes at maximum depth (hole-merge mode).
    Holes,
    /// Standalone edges and curves.
    Path,
}

/// A set of closed loops at one quantized depth.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DepthLayer {
    /// Integer depth key (depth divided by the quantum).
    pub key: i64,
    /// Depth from the reference plane.
    pub depth: f64,
    /// Layer role.
    pub layer_type: LayerType,
    /// Loops, winding-encoded (outer counter-clockwise, holes clockwise).
    pub paths: Vec<Path2>,
}

impl DepthLayer {
    /// Creates a layer at the given quantized key.
    pub fn new(key: i64, quantum: f64, layer_type: LayerType, paths: Vec<Path2>) -> Self {
        Self {
            key,
            depth: key as f64 * quantum,
            layer_type,
            paths,
        }
    }

    /// Returns a copy of this layer with other paths.
    pub fn with_paths(&self, paths: Vec<Path2>) -> Self {
        Self {
            paths,
            ..self.clone()
        }
    }

    /// Returns a copy of this layer with another type.
    pub fn with_type(&self, layer_type: LayerType) -> Self {
        Self {
            layer_type,
            ..self.clone()
        }
    }

    /// Net filled area of the layer.
    pub fn area(&self) -> f64 {
        net_area(&self.paths)
    }

    /// Returns true if the layer holds no loops.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// An output polygon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectedPolygon {
    /// Loop vertices in the projection frame.
    pub points: Path2,
    /// True for outer boundaries, false for holes.
    pub is_outer: bool,
}

impl ProjectedPolygon {
    /// Creates a polygon, classifying it by winding.
    pub fn from_path(points: Path2) -> Self {
        let is_outer = is_ccw(&points);
        Self { points, is_outer }
    }

    /// Signed area of the loop.
    pub fn area(&self) -> f64 {
        signed_area(&self.points)
    }
}

/// An output layer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectedLayer {
    /// Depth from the reference plane.
    pub depth: f64,
    /// Layer role.
    pub layer_type: LayerType,
    /// Polygons of the layer.
    pub polygons: Vec<ProjectedPolygon>,
}

impl ProjectedLayer {
    /// Net filled area of the layer.
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(|p| p.area()).sum()
    }

    /// Loops of the layer as plain paths.
    pub fn paths(&self) -> Vec<Path2> {
        self.polygons.iter().map(|p| p.points.clone()).collect()
    }
}

/// A standalone edge or curve carried through untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PassThroughPath {
    /// Always 0.
    pub depth: f64,
    /// Always [`LayerType::Path`].
    pub layer_type: LayerType,
    /// Vertices in input order.
    pub points: Path2,
    /// Closed polygon or open polyline.
    pub closed: bool,
}

impl PassThroughPath {
    /// Creates an entry at depth 0.
    pub fn new(points: Path2, closed: bool) -> Self {
        Self {
            depth: 0.0,
            layer_type: LayerType::Path,
            points,
            closed,
        }
    }
}

/// Output of a projection run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectionResult {
    /// Layers, strictly ascending by depth.
    pub layers: Vec<ProjectedLayer>,
    /// Standalone edges and curves.
    pub paths: Vec<PassThroughPath>,
    /// Extent of the scene along the reference normal.
    pub max_depth: f64,
}

impl ProjectionResult {
    /// Returns true if there is neither a layer nor a pass-through path.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.paths.is_empty()
    }

    /// Depths of all layers, in output order.
    pub fn depths(&self) -> Vec<f64> {
        self.layers.iter().map(|l| l.depth).collect()
    }

    /// Layers of a given type.
    pub fn layers_of_type(&self, layer_type: LayerType) -> impl Iterator<Item = &ProjectedLayer> {
        self.layers
            .iter()
            .filter(move |l| l.layer_type == layer_type)
    }

    /// Layer at a depth, within the given tolerance.
    pub fn layer_at(&self, depth: f64, tolerance: f64) -> Option<&ProjectedLayer> {
        self.layers
            .iter()
            .find(|l| (l.depth - depth).abs() <= tolerance)
    }

    /// Returns true if depths are strictly ascending.
    pub fn is_depth_ordered(&self) -> bool {
        self.layers.windows(2).all(|w| w[0].depth < w[1].depth)
    }
}
