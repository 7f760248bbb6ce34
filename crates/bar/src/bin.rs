//! Stock bins and the placements cut from them.

use crate::part::{PartBox, PartId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Absolute slack allowed when checking whether parts fit a bar.
pub const LENGTH_TOLERANCE: f64 = 1e-9;

/// Origin of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BinKind {
    /// A leftover piece from earlier jobs.
    Scrap,
    /// A fresh bar from stock.
    New,
}

impl std::fmt::Display for BinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinKind::Scrap => write!(f, "Scrap"),
            BinKind::New => write!(f, "New"),
        }
    }
}

/// One part cut from a bar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Placement {
    /// Identifier of the placed part.
    pub part_id: PartId,
    /// Distance from the bar start to the part start.
    pub offset: f64,
    /// Cutting length of the part.
    pub length: f64,
}

impl Placement {
    /// Position right after the part.
    pub fn end(&self) -> f64 {
        self.offset + self.length
    }
}

/// A bar with its parts laid out from the start.
///
/// Parts sit end to end after the start trim, separated by one kerf each,
/// so `used_length() + kerf * cuts.len() + 2 * trim + leftover == length`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StockBin {
    /// Total bar length, trims included.
    pub length: f64,
    /// New or scrap.
    pub kind: BinKind,
    /// Parts, longest first.
    pub placements: Vec<Placement>,
    /// Positions of the cuts between consecutive parts.
    pub cuts: Vec<f64>,
    /// Usable length left after the last part.
    pub leftover: f64,
}

impl StockBin {
    /// Lays out boxes on a bar of `length`.
    ///
    /// The caller guarantees the boxes fit.
    pub(crate) fn layout(
        length: f64,
        kind: BinKind,
        mut boxes: Vec<PartBox>,
        kerf: f64,
        trim: f64,
    ) -> Self {
        boxes.sort_by(|a, b| b.length.total_cmp(&a.length));

        let mut placements = Vec::with_capacity(boxes.len());
        let mut cuts = Vec::with_capacity(boxes.len().saturating_sub(1));
        let mut offset = trim;
        for (i, part) in boxes.into_iter().enumerate() {
            if i > 0 {
                cuts.push(offset);
                offset += kerf;
            }
            placements.push(Placement {
                part_id: part.id,
                offset,
                length: part.length,
            });
            offset += part.length;
        }

        let used: f64 = placements.iter().map(|p| p.length).sum();
        let leftover = (length - 2.0 * trim - used - kerf * cuts.len() as f64).max(0.0);

        Self {
            length,
            kind,
            placements,
            cuts,
            leftover,
        }
    }

    /// Sum of the placed part lengths.
    pub fn used_length(&self) -> f64 {
        self.placements.iter().map(|p| p.length).sum()
    }

    /// Share of the bar turned into parts, in `[0, 1]`.
    pub fn efficiency(&self) -> f64 {
        if self.length > 0.0 {
            self.used_length() / self.length
        } else {
            0.0
        }
    }

    /// Number of parts on the bar.
    pub fn part_count(&self) -> usize {
        self.placements.len()
    }

    /// Deviation from the length balance for the given kerf and trim.
    pub fn balance_error(&self, kerf: f64, trim: f64) -> f64 {
        let accounted =
            self.used_length() + kerf * self.cuts.len() as f64 + 2.0 * trim + self.leftover;
        (accounted - self.length).abs()
    }
}

/// Returns true if boxes with the given total length fit a bar.
///
/// `total` and `count` describe the boxes already chosen.
pub(crate) fn fits(total: f64, count: usize, usable: f64, kerf: f64) -> bool {
    let needed = total + kerf * count.saturating_sub(1) as f64;
    needed <= usable + LENGTH_TOLERANCE * usable.abs().max(1.0)
}
