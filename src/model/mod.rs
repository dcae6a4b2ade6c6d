//! Value models for the font audit.
//!
//! Parse functions build these structures from part bytes; the walker and the
//! report builder consume them. Everything here is constructed once per audit
//! and never mutated afterward.

mod fonts;
mod report;
mod slide;

pub use fonts::*;
pub use report::*;
pub use slide::*;
