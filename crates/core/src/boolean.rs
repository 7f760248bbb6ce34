//! Polygon boolean operations.
//!
//! The engines only talk to the [`BooleanOps`] trait. [`OverlayBoolean`] is
//! the production implementation backed by `i_overlay`.
//!
//! All inputs must follow the workspace winding convention (outer loops
//! counter-clockwise, holes clockwise) and are evaluated with the non-zero
//! fill rule. Outputs follow the same convention.

use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;

use crate::geometry::{
    as_hole, as_outer, interior_point, is_finite, net_area, ring_contains, signed_area, Path2,
};
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An outer boundary together with the holes it directly contains.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolyShape {
    /// Counter-clockwise outer loop.
    pub outer: Path2,
    /// Clockwise hole loops.
    pub holes: Vec<Path2>,
}

impl PolyShape {
    /// Returns the outer loop followed by its holes.
    pub fn paths(&self) -> Vec<Path2> {
        let mut paths = Vec::with_capacity(self.holes.len() + 1);
        paths.push(self.outer.clone());
        paths.extend(self.holes.iter().cloned());
        paths
    }
}

/// Nested decomposition of a path set.
///
/// Every shape records the index of the shape whose outer loop encloses it,
/// so an island sitting inside another shape's hole has a parent.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolyTree {
    /// All shapes, in boolean output order.
    pub shapes: Vec<PolyShape>,
    /// Parent shape index for each shape.
    pub parents: Vec<Option<usize>>,
}

impl PolyTree {
    /// Builds the tree from flat shapes by containment.
    pub fn from_shapes(shapes: Vec<PolyShape>) -> Self {
        let parents = (0..shapes.len())
            .map(|i| enclosing_shape(&shapes, i))
            .collect();
        Self { shapes, parents }
    }

    /// Shapes that are not nested inside any other shape.
    pub fn roots(&self) -> impl Iterator<Item = &PolyShape> {
        self.shapes
            .iter()
            .zip(&self.parents)
            .filter(|(_, parent)| parent.is_none())
            .map(|(shape, _)| shape)
    }

    /// Outer loops of the root shapes.
    pub fn outer_paths(&self) -> Vec<Path2> {
        self.roots().map(|s| s.outer.clone()).collect()
    }

    /// Every hole loop in the tree.
    pub fn hole_paths(&self) -> Vec<Path2> {
        self.shapes
            .iter()
            .flat_map(|s| s.holes.iter().cloned())
            .collect()
    }

    /// Returns true if the tree has no shapes.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Finds the smallest shape whose outer loop strictly contains shape `index`.
///
/// The containment test uses a point of the shape's filled region, and a
/// parent must be strictly larger, so a shape never nests inside an island
/// sitting in one of its own holes.
fn enclosing_shape(shapes: &[PolyShape], index: usize) -> Option<usize> {
    let shape = &shapes[index];
    let point = interior_point(&shape.outer, &shape.holes)?;
    let own_area = signed_area(&shape.outer).abs();
    shapes
        .iter()
        .enumerate()
        .filter(|(j, other)| {
            *j != index
                && signed_area(&other.outer).abs() > own_area
                && ring_contains(&other.outer, point)
        })
        .min_by(|(_, a), (_, b)| {
            signed_area(&a.outer)
                .abs()
                .total_cmp(&signed_area(&b.outer).abs())
        })
        .map(|(j, _)| j)
}

/// Polygon set operations consumed by the projection engine.
pub trait BooleanOps {
    /// Union of all paths in the set.
    fn union(&self, paths: &[Path2]) -> Result<Vec<Path2>>;

    /// Subject minus clip.
    fn difference(&self, subject: &[Path2], clip: &[Path2]) -> Result<Vec<Path2>>;

    /// Subject intersected with clip.
    fn intersection(&self, subject: &[Path2], clip: &[Path2]) -> Result<Vec<Path2>>;

    /// Union of the set, decomposed into nested shapes.
    fn polytree(&self, paths: &[Path2]) -> Result<PolyTree>;
}

/// [`BooleanOps`] backed by `i_overlay`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayBoolean;

impl OverlayBoolean {
    /// Creates a new overlay engine.
    pub fn new() -> Self {
        Self
    }

    fn shapes(
        &self,
        subject: &[Path2],
        clip: &[Path2],
        rule: OverlayRule,
    ) -> Result<Vec<PolyShape>> {
        let subject = to_contours(subject);
        let clip = to_contours(clip);

        let raw = subject.overlay(&clip, rule, FillRule::NonZero);

        let mut shapes = Vec::with_capacity(raw.len());
        for shape in raw {
            let mut contours = shape
                .into_iter()
                .filter(|contour| contour.len() >= 3)
                .map(|contour| contour.into_iter().map(|[x, y]| (x, y)).collect::<Path2>());

            let Some(outer) = contours.next() else {
                continue;
            };
            if !is_finite(&outer) {
                log::warn!("Overlay produced a non-finite outer loop");
                return Err(Error::Internal(
                    "polygon overlay produced non-finite coordinates".to_string(),
                ));
            }
            let holes = contours.map(as_hole).collect::<Vec<_>>();
            if holes.iter().any(|h| !is_finite(h)) {
                return Err(Error::Internal(
                    "polygon overlay produced non-finite coordinates".to_string(),
                ));
            }
            shapes.push(PolyShape {
                outer: as_outer(outer),
                holes,
            });
        }
        Ok(shapes)
    }
}

fn to_contours(paths: &[Path2]) -> Vec<Vec<[f64; 2]>> {
    paths
        .iter()
        .filter(|p| p.len() >= 3)
        .map(|p| p.iter().map(|&(x, y)| [x, y]).collect())
        .collect()
}

fn flatten(shapes: Vec<PolyShape>) -> Vec<Path2> {
    shapes
        .into_iter()
        .flat_map(|s| std::iter::once(s.outer).chain(s.holes))
        .collect()
}

fn check_inputs(paths: &[Path2]) -> Result<()> {
    if paths.iter().any(|p| !is_finite(p)) {
        return Err(Error::Internal(
            "polygon boolean input contains non-finite coordinates".to_string(),
        ));
    }
    Ok(())
}

impl BooleanOps for OverlayBoolean {
    fn union(&self, paths: &[Path2]) -> Result<Vec<Path2>> {
        check_inputs(paths)?;
        let result = flatten(self.shapes(paths, &[], OverlayRule::Union)?);
        if result.is_empty() && net_area(paths) > crate::geometry::MINIMAL_PATH_AREA {
            log::warn!(
                "Union dropped {} input paths with net area {:.6}",
                paths.len(),
                net_area(paths)
            );
            return Err(Error::Internal(format!(
                "union of {} paths with positive area produced nothing",
                paths.len()
            )));
        }
        Ok(result)
    }

    fn difference(&self, subject: &[Path2], clip: &[Path2]) -> Result<Vec<Path2>> {
        check_inputs(subject)?;
        check_inputs(clip)?;
        if subject.is_empty() {
            return Ok(Vec::new());
        }
        if clip.is_empty() {
            return Ok(subject.to_vec());
        }
        Ok(flatten(self.shapes(
            subject,
            clip,
            OverlayRule::Difference,
        )?))
    }

    fn intersection(&self, subject: &[Path2], clip: &[Path2]) -> Result<Vec<Path2>> {
        check_inputs(subject)?;
        check_inputs(clip)?;
        if subject.is_empty() || clip.is_empty() {
            return Ok(Vec::new());
        }
        Ok(flatten(self.shapes(
            subject,
            clip,
            OverlayRule::Intersect,
        )?))
    }

    fn polytree(&self, paths: &[Path2]) -> Result<PolyTree> {
        check_inputs(paths)?;
        let shapes = self.shapes(paths, &[], OverlayRule::Union)?;
        let tree = PolyTree::from_shapes(shapes);
        log::debug!(
            "Polytree: {} shapes, {} roots, {} holes",
            tree.shapes.len(),
            tree.roots().count(),
            tree.hole_paths().len()
        );
        Ok(tree)
    }
}
