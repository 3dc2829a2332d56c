//! # Render Tree
//!
//! Turns pipeline markup into a [`ContentNode`](crate::models::ContentNode) tree:
//!
//! - **`cursor`**: byte cursor shared by the scanner
//! - **`markup`**: `scan_markup()` reads tags, `class` attributes and text
//! - **`tags`**: the allow-list and math-class dispatch table
//! - **`math`**: `MathTypesetter` seam and the mitex-backed default
//! - **`builder`**: `TreeBuilder` maps scanned nodes to content nodes
//!
//! Building never fails. Unknown tags are flattened to their children and
//! math the typesetter rejects is shown as code.

pub mod builder;
pub mod cursor;
pub mod markup;
pub mod math;
pub mod tags;

pub use builder::{TreeBuilder, build_tree};
pub use markup::{MAX_DEPTH, MarkupNode, scan_markup};
pub use math::{MathError, MathMode, MathTypesetter, MitexTypesetter};
