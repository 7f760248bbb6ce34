//! Slicing of long bars into display rows.
//!
//! A bar longer than the break length is drawn as several rows stacked
//! under each other. Every element of the bar (parts, leftover, cuts) is
//! split at row boundaries into pieces positioned relative to their row.

use crate::bin::StockBin;
use crate::part::PartId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Part of an element falling on one row.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlicePiece {
    /// Row index.
    pub index: usize,
    /// Position inside the row.
    pub x: f64,
    pub length: f64,
}

/// A placed part split into rows.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlicedPart {
    pub part_id: PartId,
    pub pieces: Vec<SlicePiece>,
}

/// A bar split into rows of at most `break_length`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SlicedBin {
    /// Length of each row.
    pub rows: Vec<f64>,
    pub parts: Vec<SlicedPart>,
    pub leftover: Vec<SlicePiece>,
    /// One zero-length piece per cut.
    pub cuts: Vec<SlicePiece>,
}

/// Splits `[x, x + length]` at multiples of `break_length`.
///
/// Zero-length elements yield a single piece on the row containing `x`.
/// A non-positive or non-finite break length keeps everything on row 0.
pub fn to_slices(x: f64, length: f64, break_length: f64) -> Vec<SlicePiece> {
    if !(break_length.is_finite() && break_length > 0.0) {
        return vec![SlicePiece {
            index: 0,
            x,
            length,
        }];
    }

    let mut index = (x / break_length).floor().max(0.0) as usize;
    if length <= 0.0 {
        return vec![SlicePiece {
            index,
            x: x - index as f64 * break_length,
            length: 0.0,
        }];
    }

    let mut pieces = Vec::new();
    let mut current = x;
    let mut remaining = length;
    while remaining > 0.0 {
        let local = current - index as f64 * break_length;
        let piece = (break_length - local).min(remaining);
        if piece > 0.0 {
            pieces.push(SlicePiece {
                index,
                x: local,
                length: piece,
            });
            current += piece;
            remaining -= piece;
        }
        index += 1;
    }
    pieces
}

/// Row lengths of a bar.
pub fn row_lengths(bar_length: f64, break_length: f64) -> Vec<f64> {
    if !(break_length.is_finite() && break_length > 0.0) || bar_length <= break_length {
        return vec![bar_length];
    }
    let rows = (bar_length / break_length).ceil() as usize;
    (0..rows)
        .map(|i| break_length.min(bar_length - i as f64 * break_length))
        .collect()
}

/// Slices every element of a bar for display.
pub fn slice_bin(bin: &StockBin, break_length: f64) -> SlicedBin {
    let parts = bin
        .placements
        .iter()
        .map(|p| SlicedPart {
            part_id: p.part_id.clone(),
            pieces: to_slices(p.offset, p.length, break_length),
        })
        .collect();

    // An empty bar's leftover sits between its two trims.
    let leftover_start = bin
        .placements
        .last()
        .map(|p| p.end())
        .unwrap_or((bin.length - bin.leftover) / 2.0);
    let leftover = if bin.leftover > 0.0 {
        to_slices(leftover_start, bin.leftover, break_length)
    } else {
        Vec::new()
    };

    let cuts = bin
        .cuts
        .iter()
        .flat_map(|&c| to_slices(c, 0.0, break_length))
        .collect();

    SlicedBin {
        rows: row_lengths(bin.length, break_length),
        parts,
        leftover,
        cuts,
    }
}
