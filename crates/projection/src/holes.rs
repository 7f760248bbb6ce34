//! Hole-merge pass.
//!
//! Runs after occlusion. The combined silhouette of all layers is split into
//! outer boundaries and the holes nothing covers (through-holes). Through-holes
//! move to a [`LayerType::Holes`] layer at maximum depth, the upper layer
//! becomes the [`LayerType::Outer`] silhouette, and inside every recessed
//! region the footprint of a deeper layer is folded into the next shallower
//! layer it touches, so each layer describes the full pocket to cut at its
//! depth.

use u_cutlist_core::geometry::{as_outer, total_abs_area};
use u_cutlist_core::{BooleanOps, Error, Path2, Result};

use crate::layer::{DepthLayer, LayerType};

/// Applies hole merging to occluded layers.
///
/// `layers[0]` must be the upper layer at depth 0 and the remaining layers
/// must be sorted by ascending depth, all no deeper than `max_key`.
pub fn merge_holes<B: BooleanOps>(
    layers: &[DepthLayer],
    max_key: i64,
    quantum: f64,
    min_area: f64,
    ops: &B,
) -> Result<Vec<DepthLayer>> {
    let Some(upper) = layers.first() else {
        return Err(Error::Internal("hole merge needs an upper layer".to_string()));
    };
    // A flat scene has no depth to cut through-holes at.
    if max_key <= upper.key {
        return Ok(vec![upper.with_type(LayerType::Outer)]);
    }
    let upper_paths = upper.paths.clone();

    let all_paths: Vec<Path2> = layers.iter().flat_map(|l| l.paths.iter().cloned()).collect();
    let silhouette = ops.polytree(&all_paths)?;
    let outer_paths = silhouette.outer_paths();
    let hole_regions: Vec<Path2> = silhouette
        .hole_paths()
        .into_iter()
        .map(as_outer)
        .collect();
    // Islands standing inside a hole are not cut through.
    let mut through_paths = ops.difference(&hole_regions, &all_paths)?;

    // A face layer already sitting at maximum depth is cut through as well.
    let mut inner: Vec<DepthLayer> = layers[1..].to_vec();
    if inner.last().is_some_and(|l| l.key >= max_key) {
        if let Some(bottom) = inner.pop() {
            through_paths.extend(bottom.paths);
            through_paths = ops.union(&through_paths)?;
        }
    }

    let mask = ops.difference(&outer_paths, &upper_paths)?;
    let mask_tree = ops.polytree(&mask)?;

    for shape in &mask_tree.shapes {
        let mask_paths = shape.paths();
        let mut lower: Vec<Path2> = Vec::new();
        for layer in inner.iter_mut().rev() {
            if layer.is_empty() {
                continue;
            }
            let overlap = ops.intersection(&layer.paths, &mask_paths)?;
            if total_abs_area(&overlap) < min_area {
                continue;
            }
            if !lower.is_empty() {
                let combined: Vec<Path2> = lower.iter().chain(&layer.paths).cloned().collect();
                layer.paths = ops.union(&combined)?;
                lower = ops.intersection(&layer.paths, &mask_paths)?;
            } else {
                lower = overlap;
            }
        }
    }

    log::debug!(
        "Hole merge: {} outer loops, {} through-holes, {} recessed regions",
        outer_paths.len(),
        through_paths.len(),
        mask_tree.shapes.len()
    );

    let mut out = Vec::with_capacity(inner.len() + 2);
    out.push(upper.with_type(LayerType::Outer).with_paths(outer_paths));
    out.extend(inner);
    out.push(DepthLayer::new(
        max_key,
        quantum,
        LayerType::Holes,
        through_paths,
    ));
    Ok(out)
}
