//! Folding of identical bars for reporting.
//!
//! Two bars are identical when they have the same length, the same kind and
//! the same ordered sequence of parts. A fingerprint hash narrows the
//! candidates and the sequences are then compared exactly.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::bin::StockBin;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A bar layout and how many times it occurs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BinGroup {
    pub bin: StockBin,
    pub count: usize,
    pub fingerprint: u64,
}

/// Ordered hash of a bar's part ids and lengths.
pub fn fingerprint(bin: &StockBin) -> u64 {
    let mut hasher = DefaultHasher::new();
    bin.placements.len().hash(&mut hasher);
    for placement in &bin.placements {
        placement.part_id.hash(&mut hasher);
        placement.length.to_bits().hash(&mut hasher);
    }
    hasher.finish()
}

fn same_layout(a: &StockBin, b: &StockBin) -> bool {
    a.placements.len() == b.placements.len()
        && a.placements
            .iter()
            .zip(&b.placements)
            .all(|(x, y)| x.part_id == y.part_id && x.length.to_bits() == y.length.to_bits())
}

/// Folds identical bars together.
///
/// Groups come out scrap first, then by decreasing count, then by
/// decreasing efficiency. Equal groups keep first-occurrence order.
pub fn group_bins(bins: &[StockBin]) -> Vec<BinGroup> {
    let mut groups: Vec<BinGroup> = Vec::new();
    for bin in bins {
        let print = fingerprint(bin);
        let existing = groups.iter_mut().find(|g| {
            g.fingerprint == print
                && g.bin.kind == bin.kind
                && g.bin.length.to_bits() == bin.length.to_bits()
                && same_layout(&g.bin, bin)
        });
        match existing {
            Some(group) => group.count += 1,
            None => groups.push(BinGroup {
                bin: bin.clone(),
                count: 1,
                fingerprint: print,
            }),
        }
    }

    groups.sort_by(|a, b| {
        a.bin
            .kind
            .cmp(&b.bin.kind)
            .then(b.count.cmp(&a.count))
            .then(b.bin.efficiency().total_cmp(&a.bin.efficiency()))
    });
    groups
}

/// Every bar as its own group, in packing order.
pub fn ungrouped(bins: &[StockBin]) -> Vec<BinGroup> {
    bins.iter()
        .map(|bin| BinGroup {
            bin: bin.clone(),
            count: 1,
            fingerprint: fingerprint(bin),
        })
        .collect()
}
