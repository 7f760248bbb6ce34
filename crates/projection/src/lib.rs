//! # U-Cutlist Projection
//!
//! Converts a 3D face collection into an ordered list of 2D polygon layers
//! keyed by depth below a reference plane, ready to be used as cut paths.
//!
//! ## Pipeline
//!
//! 1. **Face filtering**: faces perpendicular to or turned away from the
//!    reference normal are ignored
//! 2. **Depth bucketing**: exposed faces are grouped by quantized depth;
//!    coplanar groups share the depth of their shallowest member
//! 3. **Per-bucket union**: loops at the same depth are merged
//! 4. **Occlusion**: every layer is subtracted from all deeper layers
//! 5. **Hole merge** (optional): through-holes go to a dedicated layer and
//!    stepped pockets are folded upwards
//! 6. **Pass-through**: standalone edges and curves are emitted untouched
//! 7. **Cleanup**: loops below the minimal area are dropped
//!
//! Each stage is a pure function over `&[DepthLayer]` and can be run alone.
//!
//! ## Quick Start
//!
//! ```rust
//! use nalgebra::{Point3, Vector3};
//! use u_cutlist_projection::{Face, LayerType, ProjectionConfig, Projector, Scene};
//!
//! let top = Face::new(Vector3::z()).with_outer(vec![
//!     Point3::new(0.0, 0.0, 10.0),
//!     Point3::new(50.0, 0.0, 10.0),
//!     Point3::new(50.0, 30.0, 10.0),
//!     Point3::new(0.0, 30.0, 10.0),
//! ]);
//! let scene = Scene::from_faces(vec![top]).unwrap();
//!
//! let result = Projector::new(ProjectionConfig::default())
//!     .project(&scene)
//!     .unwrap();
//!
//! assert_eq!(result.layers.len(), 1);
//! assert_eq!(result.layers[0].layer_type, LayerType::Default);
//! ```

pub mod bucket;
pub mod config;
pub mod frame;
pub mod holes;
pub mod layer;
pub mod occlusion;
pub mod projector;
pub mod scene;

// Re-exports
pub use config::ProjectionConfig;
pub use frame::ProjectionFrame;
pub use layer::{
    DepthLayer, LayerType, PassThroughPath, ProjectedLayer, ProjectedPolygon, ProjectionResult,
};
pub use projector::{project, Projector};
pub use scene::{Bounds3, Curve, Edge, Face, GroupId, Scene};
pub use u_cutlist_core::{BooleanOps, Error, OverlayBoolean, Result};
