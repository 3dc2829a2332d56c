pub mod feedback;
pub mod labels;
pub mod models;
pub mod pipeline;
pub mod render;
pub mod sanitize;
pub mod testing;

// Re-export key types for easier usage
pub use feedback::*;
pub use labels::*;
pub use models::{answer::*, citation::*, content::*};
pub use pipeline::{parse_answer, prepare_answer};
pub use render::{MathMode, MathTypesetter, MitexTypesetter, TreeBuilder, build_tree};
pub use sanitize::{EscapeSanitizer, Sanitizer};
