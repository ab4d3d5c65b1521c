//! Data types shared by the worksheet model, layout engine and exporters.

mod cell;
mod geometry;
mod selection;
mod style;

pub use cell::*;
pub use geometry::*;
pub use selection::*;
pub use style::*;
