//! Packing result representation.

use crate::bin::{BinKind, StockBin};
use crate::grouping::{group_bins, BinGroup};
use crate::part::PartId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of a packing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PackingStatus {
    /// Every part was placed.
    Success,
    /// Some parts could not be placed on any bar.
    Partial,
    /// The time budget ran out and the remaining parts were placed greedily.
    TimeExceeded,
}

impl std::fmt::Display for PackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackingStatus::Success => write!(f, "Success"),
            PackingStatus::Partial => write!(f, "Partial"),
            PackingStatus::TimeExceeded => write!(f, "TimeExceeded"),
        }
    }
}

/// Pieces of one part that found no bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UnplacedPart {
    pub id: PartId,
    pub count: usize,
}

/// Non-fatal conditions reported alongside a result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PackingWarning {
    /// Some pieces were left unplaced.
    UnplacedParts { count: usize },
    /// Every part was packed at its length plus `increase`.
    CuttingLengthIncreased { increase: f64 },
}

impl std::fmt::Display for PackingWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackingWarning::UnplacedParts { count } => {
                write!(f, "{} parts could not be placed", count)
            }
            PackingWarning::CuttingLengthIncreased { increase } => {
                write!(f, "cutting length increased by {}", increase)
            }
        }
    }
}

/// Result of a packing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingResult {
    /// Bars used, scrap bars first.
    pub bins: Vec<StockBin>,

    /// Parts that could not be placed, in request order.
    pub unplaced: Vec<UnplacedPart>,

    /// Overall outcome.
    pub status: PackingStatus,

    /// Non-fatal conditions.
    pub warnings: Vec<PackingWarning>,

    /// Kerf the layout was computed with.
    pub kerf: f64,

    /// Trim the layout was computed with.
    pub trim: f64,

    /// Computation time in milliseconds.
    pub computation_time_ms: u64,
}

impl PackingResult {
    /// Creates an empty successful result.
    pub fn new(kerf: f64, trim: f64) -> Self {
        Self {
            bins: Vec::new(),
            unplaced: Vec::new(),
            status: PackingStatus::Success,
            warnings: Vec::new(),
            kerf,
            trim,
            computation_time_ms: 0,
        }
    }

    /// Returns true if all parts were placed.
    pub fn all_placed(&self) -> bool {
        self.unplaced.is_empty()
    }

    /// Number of placed pieces.
    pub fn placed_count(&self) -> usize {
        self.bins.iter().map(StockBin::part_count).sum()
    }

    /// Number of unplaced pieces.
    pub fn unplaced_count(&self) -> usize {
        self.unplaced.iter().map(|u| u.count).sum()
    }

    /// Number of bars of the given kind.
    pub fn bins_of_kind(&self, kind: BinKind) -> usize {
        self.bins.iter().filter(|b| b.kind == kind).count()
    }

    /// Sum of all leftovers.
    pub fn total_leftover(&self) -> f64 {
        self.bins.iter().map(|b| b.leftover).sum()
    }

    /// Share of all used bars turned into parts.
    pub fn efficiency(&self) -> f64 {
        let total: f64 = self.bins.iter().map(|b| b.length).sum();
        if total > 0.0 {
            self.bins.iter().map(StockBin::used_length).sum::<f64>() / total
        } else {
            0.0
        }
    }

    /// Identical bars folded into groups.
    pub fn groups(&self) -> Vec<BinGroup> {
        group_bins(&self.bins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bin::Placement;
    use approx::assert_relative_eq;

    fn bin(kind: BinKind, parts: &[f64]) -> StockBin {
        StockBin {
            length: 1000.0,
            kind,
            placements: parts
                .iter()
                .map(|&length| Placement {
                    part_id: "P".to_string(),
                    offset: 0.0,
                    length,
                })
                .collect(),
            cuts: Vec::new(),
            leftover: 1000.0 - parts.iter().sum::<f64>(),
        }
    }

    #[test]
    fn test_counts_and_efficiency() {
        let mut result = PackingResult::new(0.0, 0.0);
        result.bins = vec![
            bin(BinKind::Scrap, &[400.0]),
            bin(BinKind::New, &[500.0, 300.0]),
        ];
        result.unplaced.push(UnplacedPart {
            id: "Q".to_string(),
            count: 2,
        });
        assert_eq!(result.placed_count(), 3);
        assert_eq!(result.unplaced_count(), 2);
        assert!(!result.all_placed());
        assert_eq!(result.bins_of_kind(BinKind::New), 1);
        assert_relative_eq!(result.efficiency(), 0.6);
        assert_relative_eq!(result.total_leftover(), 800.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(PackingStatus::TimeExceeded.to_string(), "TimeExceeded");
        assert_eq!(
            PackingWarning::UnplacedParts { count: 3 }.to_string(),
            "3 parts could not be placed"
        );
    }

    #[test]
    fn test_empty_result() {
        let result = PackingResult::new(3.0, 10.0);
        assert!(result.all_placed());
        assert_eq!(result.efficiency(), 0.0);
        assert_eq!(result.status, PackingStatus::Success);
    }
}
