//! Whole-tensor rescaling primitives.

pub mod normalize;
pub mod rescale;

pub use normalize::{normalize, Normalize};
pub use rescale::{rescale, Rescale};
