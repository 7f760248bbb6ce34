//! Face filtering and depth bucketing.
//!
//! Exposed faces are projected onto the frame and grouped by quantized
//! depth. A seed [`LayerType::Upper`] layer always exists at depth 0 so the
//! later stages can rely on `layers[0]` being the shallowest one.

use std::collections::{BTreeMap, HashMap};

use u_cutlist_core::geometry::{as_hole, as_outer, open_ring};
use u_cutlist_core::{Error, Path2, Result};

use crate::frame::ProjectionFrame;
use crate::layer::{DepthLayer, LayerType};
use crate::scene::{Face, GroupId, Scene};

/// Quantizes a depth into an integer bucket key.
pub fn depth_key(depth: f64, quantum: f64) -> i64 {
    (depth / quantum).round() as i64
}

/// Shallowest depth of each coplanar group, over all of its faces.
pub fn group_depths(faces: &[Face], frame: &ProjectionFrame) -> HashMap<GroupId, f64> {
    let mut depths: HashMap<GroupId, f64> = HashMap::new();
    for face in faces {
        if let Some(group) = face.group {
            let depth = frame.face_depth(face);
            depths
                .entry(group)
                .and_modify(|d| *d = d.min(depth))
                .or_insert(depth);
        }
    }
    depths
}

/// Projects a face's loops: outer counter-clockwise, holes clockwise.
pub fn face_paths(face: &Face, frame: &ProjectionFrame) -> Vec<Path2> {
    face.loops
        .iter()
        .enumerate()
        .map(|(i, points)| {
            let path = open_ring(frame.project_points(points));
            if i == 0 {
                as_outer(path)
            } else {
                as_hole(path)
            }
        })
        .collect()
}

/// Groups exposed faces into layers keyed by quantized depth.
///
/// Returns layers in ascending depth order; the first one is the `Upper`
/// seed at depth 0, possibly empty.
pub fn bucket_faces(
    scene: &Scene,
    frame: &ProjectionFrame,
    quantum: f64,
) -> Result<Vec<DepthLayer>> {
    let max_key = depth_key(frame.max_depth(), quantum);
    let groups = group_depths(&scene.faces, frame);

    let mut buckets: BTreeMap<i64, DepthLayer> = BTreeMap::new();
    buckets.insert(0, DepthLayer::new(0, quantum, LayerType::Upper, Vec::new()));

    let mut exposed = 0usize;
    for (index, face) in scene.faces.iter().enumerate() {
        if !frame.is_exposed(face) {
            continue;
        }
        exposed += 1;

        let depth = face
            .group
            .and_then(|g| groups.get(&g).copied())
            .unwrap_or_else(|| frame.face_depth(face));
        let key = depth_key(depth, quantum);
        if key < 0 || key > max_key {
            return Err(Error::InvalidInput(format!(
                "face {} lies outside the scene bounds (depth {})",
                index, depth
            )));
        }

        let paths = face_paths(face, frame);
        buckets
            .entry(key)
            .or_insert_with(|| DepthLayer::new(key, quantum, LayerType::Default, Vec::new()))
            .paths
            .extend(paths);
    }

    log::debug!(
        "Bucketed {} of {} faces into {} depth layers",
        exposed,
        scene.faces.len(),
        buckets.len()
    );

    Ok(buckets.into_values().collect())
}
