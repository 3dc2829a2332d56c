pub mod answer;
pub mod citation;
pub mod content;

pub use answer::*;
pub use citation::*;
pub use content::*;
