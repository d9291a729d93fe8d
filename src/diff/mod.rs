//! Unified diff parsing and the structural diff model.

pub mod model;
pub mod parser;

pub use model::{ChangeType, FileDiff, Hunk, Line, LineKind, ParsedDiff};
pub use parser::parse;
