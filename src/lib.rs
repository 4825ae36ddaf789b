//! Three-coloring of planar graphs by recursive planar separators.
//!
//! Small graphs are colored by exhaustive search. Larger graphs are split along a separator whose
//! colorings are enumerated one after another; both sides are then colored recursively under
//! the colors their separator neighbors already use.

pub mod coloring;
pub mod embedding;
pub mod error;
pub mod graph;
pub mod planarity;
pub mod separator;

pub use coloring::{color_three, Color, Coloring, ColoringConfig, Strategy};
pub use error::{ColoringError, ColoringResult};
pub use separator::{Separator, SeparatorKind};
