//! # U-Cutlist
//!
//! Layout engines behind a woodworking cut list.
//!
//! This crate provides:
//! - **Depth projection**: turns the faces of a 3D part into 2D polygon
//!   layers ordered by depth, ready to be exported as cut paths
//! - **1D bar packing**: lays part lengths out on bars and scraps with kerf
//!   and trim allowances
//!
//! ## Quick Start
//!
//! ```rust
//! use u_cutlist::bar::{pack, PartRequest, StockConfig};
//!
//! let parts = vec![PartRequest::new("rail", 800.0, 2)];
//! let result = pack(&StockConfig::new(2400.0), 3.0, 10.0, &parts)?;
//! assert_eq!(result.bins.len(), 1);
//! # Ok::<(), u_cutlist::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `projection` (default): depth projection engine
//! - `bar` (default): 1D bar packing engine
//! - `serde`: Serialization support

/// Shared errors, path types and the polygon boolean seam.
pub use u_cutlist_core as core;

/// Depth projection engine.
#[cfg(feature = "projection")]
pub use u_cutlist_projection as projection;

/// 1D bar packing engine.
#[cfg(feature = "bar")]
pub use u_cutlist_bar as bar;

// Re-export commonly used types at root level
pub use u_cutlist_core::{Error, Path2, Point2, Result};
