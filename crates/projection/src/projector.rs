//! Depth projection engine.

use nalgebra::Vector3;
use u_cutlist_core::geometry::{open_ring, signed_area};
use u_cutlist_core::{BooleanOps, OverlayBoolean, Result};

use crate::bucket::{bucket_faces, depth_key};
use crate::config::ProjectionConfig;
use crate::frame::ProjectionFrame;
use crate::holes::merge_holes;
use crate::layer::{
    DepthLayer, LayerType, PassThroughPath, ProjectedLayer, ProjectedPolygon, ProjectionResult,
};
use crate::occlusion::{occlude, union_buckets};
use crate::scene::{Bounds3, Curve, Edge, Face, Scene};

/// Projects 3D scenes into depth-layered 2D polygon sets.
///
/// The projector holds no state between runs; one instance can serve any
/// number of scenes.
#[derive(Debug, Clone)]
pub struct Projector<B = OverlayBoolean> {
    config: ProjectionConfig,
    ops: B,
}

impl Projector<OverlayBoolean> {
    /// Creates a projector using the `i_overlay` boolean engine.
    pub fn new(config: ProjectionConfig) -> Self {
        Self::with_boolean(config, OverlayBoolean::new())
    }

    /// Creates a projector with default configuration.
    pub fn default_config() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

impl<B: BooleanOps> Projector<B> {
    /// Creates a projector with a custom boolean engine.
    pub fn with_boolean(config: ProjectionConfig, ops: B) -> Self {
        Self { config, ops }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Runs the full pipeline on a scene.
    pub fn project(&self, scene: &Scene) -> Result<ProjectionResult> {
        self.config.validate()?;
        scene.validate()?;

        let quantum = self.config.depth_quantum;
        let frame = ProjectionFrame::new(&scene.reference_normal, &scene.bounds)?;

        let layers = self.stage_layers(scene, &frame)?;
        let layers = if self.config.merge_holes {
            merge_holes(
                &layers,
                depth_key(frame.max_depth(), quantum),
                quantum,
                self.config.min_area,
                &self.ops,
            )?
        } else {
            layers
        };

        let result = ProjectionResult {
            layers: self.finalize(&layers),
            paths: pass_through(scene, &frame),
            max_depth: frame.max_depth(),
        };

        log::info!(
            "Projected {} faces into {} layers and {} paths (max depth {:.6})",
            scene.faces.len(),
            result.layers.len(),
            result.paths.len(),
            result.max_depth
        );
        Ok(result)
    }

    /// Bucketing, per-bucket union and occlusion, without hole merging.
    pub fn stage_layers(&self, scene: &Scene, frame: &ProjectionFrame) -> Result<Vec<DepthLayer>> {
        let bucketed = bucket_faces(scene, frame, self.config.depth_quantum)?;
        let merged = union_buckets(&bucketed, &self.ops)?;
        let occluded = occlude(&merged, &self.ops)?;
        log::debug!(
            "Occlusion done: {} layers, {} loops",
            occluded.len(),
            occluded.iter().map(|l| l.paths.len()).sum::<usize>()
        );
        Ok(occluded)
    }

    /// Drops artifact loops and empty layers, and resolves the upper layer type.
    fn finalize(&self, layers: &[DepthLayer]) -> Vec<ProjectedLayer> {
        layers
            .iter()
            .filter_map(|layer| {
                let polygons: Vec<ProjectedPolygon> = layer
                    .paths
                    .iter()
                    .filter(|p| signed_area(p).abs() >= self.config.min_area)
                    .cloned()
                    .map(ProjectedPolygon::from_path)
                    .collect();
                if polygons.is_empty() {
                    return None;
                }
                let layer_type = match layer.layer_type {
                    LayerType::Upper => LayerType::Default,
                    other => other,
                };
                Some(ProjectedLayer {
                    depth: layer.depth,
                    layer_type,
                    polygons,
                })
            })
            .collect()
    }
}

/// Projects standalone edges and curves as-is at depth 0.
fn pass_through(scene: &Scene, frame: &ProjectionFrame) -> Vec<PassThroughPath> {
    let edges = scene
        .edges
        .iter()
        .map(|e| PassThroughPath::new(frame.project_points(&e.points), false));
    let curves = scene.curves.iter().map(|c| {
        let points = frame.project_points(&c.points);
        if c.closed {
            PassThroughPath::new(open_ring(points), true)
        } else {
            PassThroughPath::new(points, false)
        }
    });
    edges.chain(curves).collect()
}

/// Projects faces, edges and curves along `reference_normal`.
///
/// Convenience wrapper around [`Projector::project`] with default tolerances.
pub fn project(
    faces: Vec<Face>,
    edges: Vec<Edge>,
    curves: Vec<Curve>,
    bounds: Bounds3,
    reference_normal: Vector3<f64>,
    merge_holes: bool,
) -> Result<ProjectionResult> {
    let scene = Scene {
        faces,
        edges,
        curves,
        bounds,
        reference_normal,
    };
    Projector::new(ProjectionConfig::new().with_merge_holes(merge_holes)).project(&scene)
}
