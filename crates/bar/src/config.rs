//! Configuration types for bar packing.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default wall-clock budget for one packing run.
pub const DEFAULT_TIME_LIMIT_MS: u64 = 5_000;

/// Default number of search nodes spent filling a single bar.
pub const DEFAULT_NODE_LIMIT: usize = 20_000;

/// Available raw material.
///
/// `bar_length` is the length of freshly cut stock, unlimited in supply.
/// A `bar_length` of zero means no new stock, only the listed scraps.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StockConfig {
    /// Length of a new bar. Zero disables new stock.
    pub bar_length: f64,

    /// Lengths of leftover pieces on hand, one entry per piece.
    pub scrap_lengths: Vec<f64>,
}

impl StockConfig {
    /// Stock made of new bars only.
    pub fn new(bar_length: f64) -> Self {
        Self {
            bar_length,
            scrap_lengths: Vec::new(),
        }
    }

    /// Stock made of scrap pieces only.
    pub fn scraps_only(scrap_lengths: Vec<f64>) -> Self {
        Self {
            bar_length: 0.0,
            scrap_lengths,
        }
    }

    /// Adds scrap pieces.
    pub fn with_scraps(mut self, lengths: impl IntoIterator<Item = f64>) -> Self {
        self.scrap_lengths.extend(lengths);
        self
    }

    /// Returns true if new bars can be opened.
    pub fn has_new_stock(&self) -> bool {
        self.bar_length > 0.0
    }

    /// Longest bar on hand, new or scrap.
    pub fn largest(&self) -> f64 {
        self.scrap_lengths
            .iter()
            .copied()
            .fold(self.bar_length, f64::max)
    }
}

/// Configuration for a bar packing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackingConfig {
    /// Stock to cut from.
    pub stock: StockConfig,

    /// Width of material lost at each cut between two parts.
    pub kerf: f64,

    /// Unusable length removed at each end of every bar.
    pub trim: f64,

    /// Wall-clock budget in milliseconds. With zero the search stops at once
    /// and every box is placed first-fit.
    pub time_limit_ms: u64,

    /// Search nodes allowed per bar before settling for the best fill found.
    pub node_limit: usize,

    /// Extra length added to every part before packing.
    pub length_increase: f64,

    /// Fold identical bars into one reported group.
    /// Presentation only, the packing is unaffected.
    pub bar_folding: bool,

    /// Row length used when slicing bars for display. Presentation only.
    pub break_length: Option<f64>,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            stock: StockConfig::default(),
            kerf: 0.0,
            trim: 0.0,
            time_limit_ms: DEFAULT_TIME_LIMIT_MS,
            node_limit: DEFAULT_NODE_LIMIT,
            length_increase: 0.0,
            bar_folding: true,
            break_length: None,
        }
    }
}

impl PackingConfig {
    /// Creates a configuration cutting new bars of `bar_length`.
    pub fn new(bar_length: f64) -> Self {
        Self {
            stock: StockConfig::new(bar_length),
            ..Default::default()
        }
    }

    /// Sets the whole stock description.
    pub fn with_stock(mut self, stock: StockConfig) -> Self {
        self.stock = stock;
        self
    }

    /// Adds scrap pieces to the stock.
    pub fn with_scraps(mut self, lengths: impl IntoIterator<Item = f64>) -> Self {
        self.stock = self.stock.with_scraps(lengths);
        self
    }

    /// Sets the kerf width.
    pub fn with_kerf(mut self, kerf: f64) -> Self {
        self.kerf = kerf;
        self
    }

    /// Sets the end trim.
    pub fn with_trim(mut self, trim: f64) -> Self {
        self.trim = trim;
        self
    }

    /// Sets the time limit in milliseconds.
    pub fn with_time_limit(mut self, ms: u64) -> Self {
        self.time_limit_ms = ms;
        self
    }

    /// Sets the per-bar node limit.
    pub fn with_node_limit(mut self, nodes: usize) -> Self {
        self.node_limit = nodes;
        self
    }

    /// Sets the length added to every part.
    pub fn with_length_increase(mut self, increase: f64) -> Self {
        self.length_increase = increase;
        self
    }

    /// Enables or disables folding of identical bars in reports.
    pub fn with_bar_folding(mut self, enabled: bool) -> Self {
        self.bar_folding = enabled;
        self
    }

    /// Sets the display row length.
    pub fn with_break_length(mut self, length: f64) -> Self {
        self.break_length = Some(length);
        self
    }

    /// Usable length of a bar once both ends are trimmed.
    pub fn usable(&self, bar_length: f64) -> f64 {
        bar_length - 2.0 * self.trim
    }
}
