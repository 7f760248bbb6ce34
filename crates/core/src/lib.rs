//! # U-Cutlist Core
//!
//! Shared building blocks for the U-Cutlist layout engines.
//!
//! ## Core Components
//!
//! - **Errors**: [`Error`], [`Result`] - the failure taxonomy shared by both engines
//! - **Paths**: [`Point2`], [`Path2`] and winding helpers in [`geometry`]
//! - **Booleans**: [`BooleanOps`] seam with the `i_overlay`-backed [`OverlayBoolean`]
//!
//! ## Winding Convention
//!
//! Outer loops wind counter-clockwise and holes clockwise, so the sign of a
//! loop's area tells which one it is:
//!
//! ```rust
//! use u_cutlist_core::geometry::{as_hole, rectangle, signed_area};
//!
//! let outer = rectangle(0.0, 0.0, 10.0, 10.0);
//! let hole = as_hole(rectangle(2.0, 2.0, 3.0, 3.0));
//!
//! assert!(signed_area(&outer) > 0.0);
//! assert!(signed_area(&hole) < 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod boolean;
pub mod error;
pub mod geometry;

// Re-exports
pub use boolean::{BooleanOps, OverlayBoolean, PolyShape, PolyTree};
pub use error::{Error, Result};
pub use geometry::{Bounds2, Path2, Point2, MINIMAL_PATH_AREA};
