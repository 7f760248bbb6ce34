//! # U-Cutlist Bar
//!
//! 1D cutting stock packing: lays requested part lengths out on new bars
//! and leftover scraps, accounting for the kerf lost at every cut and the
//! trim removed at both bar ends.
//!
//! ## Features
//!
//! - **Scrap first**: leftover pieces are filled before any new bar is opened
//! - **Bounded search**: each bar is filled by a branch-and-bound search with
//!   a node budget, under an overall time limit
//! - **Deterministic**: identical input gives identical layouts
//! - **Reporting**: identical bars fold into groups, bars can be sliced into
//!   display rows and stock usage is summarised
//!
//! ## Quick Start
//!
//! ```rust
//! use u_cutlist_bar::{pack, PackingStatus, PartRequest, StockConfig};
//!
//! let parts = vec![PartRequest::new("A", 800.0, 2), PartRequest::new("B", 700.0, 1)];
//! let result = pack(&StockConfig::new(2400.0), 3.0, 10.0, &parts).unwrap();
//!
//! assert_eq!(result.status, PackingStatus::Success);
//! assert_eq!(result.bins.len(), 1);
//! assert!((result.bins[0].leftover - 74.0).abs() < 1e-9);
//! ```

pub mod bin;
pub mod config;
pub mod fill;
pub mod grouping;
pub mod packer;
pub mod part;
pub mod report;
pub mod result;
pub mod slices;
pub mod summary;

// Re-exports
pub use bin::{BinKind, Placement, StockBin};
pub use config::{PackingConfig, StockConfig};
pub use grouping::{fingerprint, group_bins, BinGroup};
pub use packer::{pack, BarPacker};
pub use part::{PartId, PartRequest};
pub use report::PackingReport;
pub use result::{PackingResult, PackingStatus, PackingWarning, UnplacedPart};
pub use slices::{slice_bin, SlicePiece, SlicedBin};
pub use summary::{summarize, BarSummary};
pub use u_cutlist_core::{Error, Result};
