//! # Citations
//!
//! - **`marker`**: `CitationMarker` owns the `[docN]` grammar and the display token
//! - **`resolve`**: `resolve_citations()` maps markers to citations and renumbers them
//! - **`enumerate`**: `enumerate_citations()` computes per-filepath part numbers

pub mod enumerate;
pub mod marker;
pub mod resolve;

pub use enumerate::enumerate_citations;
pub use marker::CitationMarker;
pub use resolve::resolve_citations;
