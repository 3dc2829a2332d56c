//! # Test Support
//!
//! Helpers shared by unit and integration tests:
//!
//! - **`invariants`**: panicking checks for render trees and resolved citation
//!   lists (allow-listed tags only, display order without gaps, part numbers
//!   counted per filepath)
//! - **`outline`**: renders a tree as an indented outline for `insta` snapshots

pub mod invariants;
pub mod outline;

pub use invariants::{check_answer, check_citations, check_tree};
pub use outline::outline;
