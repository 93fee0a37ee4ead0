//! Reduction primitives.

pub mod mean;

pub use mean::{mean, Mean};
