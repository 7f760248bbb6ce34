//! Part requests and their expansion into unit boxes.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a requested part.
pub type PartId = String;

/// A request for `count` pieces of `length`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartRequest {
    /// Part identifier, carried through to placements.
    pub id: PartId,
    /// Nominal length of one piece.
    pub length: f64,
    /// Number of pieces.
    pub count: usize,
}

impl PartRequest {
    /// Creates a new part request.
    pub fn new(id: impl Into<PartId>, length: f64, count: usize) -> Self {
        Self {
            id: id.into(),
            length,
            count,
        }
    }
}

/// One physical piece to cut.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PartBox {
    /// Index of the originating request.
    pub request: usize,
    pub id: PartId,
    /// Cutting length, nominal length plus any configured increase.
    pub length: f64,
}

/// Expands requests into boxes sorted by decreasing length.
///
/// The sort is stable: boxes of equal length keep request order.
pub(crate) fn expand(parts: &[PartRequest], length_increase: f64) -> Vec<PartBox> {
    let mut boxes: Vec<PartBox> = parts
        .iter()
        .enumerate()
        .flat_map(|(request, part)| {
            (0..part.count).map(move |_| PartBox {
                request,
                id: part.id.clone(),
                length: part.length + length_increase,
            })
        })
        .collect();
    boxes.sort_by(|a, b| b.length.total_cmp(&a.length));
    boxes
}
