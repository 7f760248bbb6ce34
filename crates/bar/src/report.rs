//! Presentation of a packing result.

use crate::config::PackingConfig;
use crate::grouping::{group_bins, ungrouped, BinGroup};
use crate::result::{PackingResult, PackingWarning, UnplacedPart};
use crate::slices::{slice_bin, SlicedBin};
use crate::summary::{summarize, BarSummary};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A packing result arranged for display.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingReport {
    /// Bars, folded when `bar_folding` is on.
    pub groups: Vec<BinGroup>,
    /// Row slicing of each group's bar, empty without a break length.
    pub slices: Vec<SlicedBin>,
    pub summary: Vec<BarSummary>,
    pub unplaced: Vec<UnplacedPart>,
    pub warnings: Vec<PackingWarning>,
}

impl PackingReport {
    /// Builds a report using the presentation settings of `config`.
    pub fn build(result: &PackingResult, config: &PackingConfig) -> Self {
        let groups = if config.bar_folding {
            group_bins(&result.bins)
        } else {
            ungrouped(&result.bins)
        };
        let slices = match config.break_length {
            Some(break_length) => groups
                .iter()
                .map(|g| slice_bin(&g.bin, break_length))
                .collect(),
            None => Vec::new(),
        };
        Self {
            summary: summarize(&result.bins),
            groups,
            slices,
            unplaced: result.unplaced.clone(),
            warnings: result.warnings.clone(),
        }
    }

    /// Total number of bars behind the groups.
    pub fn bar_count(&self) -> usize {
        self.groups.iter().map(|g| g.count).sum()
    }
}
