//! Stock usage summary.

use crate::bin::{BinKind, StockBin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Usage of one bar type, identified by length and kind.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BarSummary {
    pub kind: BinKind,
    pub length: f64,
    /// Number of bars of this type used.
    pub count: usize,
    /// `count * length`.
    pub total_length: f64,
}

/// Counts bars per type, in order of first use.
pub fn summarize(bins: &[StockBin]) -> Vec<BarSummary> {
    let mut summary: Vec<BarSummary> = Vec::new();
    for bin in bins {
        match summary
            .iter_mut()
            .find(|s| s.kind == bin.kind && s.length.to_bits() == bin.length.to_bits())
        {
            Some(entry) => {
                entry.count += 1;
                entry.total_length += bin.length;
            }
            None => summary.push(BarSummary {
                kind: bin.kind,
                length: bin.length,
                count: 1,
                total_length: bin.length,
            }),
        }
    }
    summary
}
