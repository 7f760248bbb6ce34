//! Per-bucket union and top-down occlusion.

use u_cutlist_core::{BooleanOps, Result};

use crate::layer::DepthLayer;

/// Merges overlapping and adjacent loops inside each layer.
///
/// Layers with zero or one loop are returned unchanged.
pub fn union_buckets<B: BooleanOps>(layers: &[DepthLayer], ops: &B) -> Result<Vec<DepthLayer>> {
    layers
        .iter()
        .map(|layer| {
            if layer.paths.len() > 1 {
                Ok(layer.with_paths(ops.union(&layer.paths)?))
            } else {
                Ok(layer.clone())
            }
        })
        .collect()
}

/// Removes from every layer whatever a shallower layer already covers.
///
/// Layers must be sorted by ascending depth. After this pass a point of
/// the plane belongs to at most one layer, the shallowest one covering it.
pub fn occlude<B: BooleanOps>(layers: &[DepthLayer], ops: &B) -> Result<Vec<DepthLayer>> {
    let mut out: Vec<DepthLayer> = layers.to_vec();
    for i in 0..out.len() {
        if out[i].is_empty() {
            continue;
        }
        let (above, below) = out.split_at_mut(i + 1);
        let clip = &above[i].paths;
        for lower in below.iter_mut().filter(|l| !l.is_empty()) {
            lower.paths = ops.difference(&lower.paths, clip)?;
        }
    }
    Ok(out)
}
