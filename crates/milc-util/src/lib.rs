//! milc-util - shared position and error-rendering primitives.
//!
//! Every other crate in the workspace depends on this one for the `Pos`
//! type and the `file:line:column` diagnostic formatter. Nothing here is
//! specific to any compilation phase.

mod pos;
mod source_map;

pub use pos::{Pos, Position};
pub use source_map::SourceFile;
