//! Training-data feed for the GradNet engine: datasets of
//! (input, label) pairs and the samplers that order them.
//!
//! The engine core performs no I/O; whatever parsed the pairs (file,
//! network, form) hands them over through these types.

pub mod dataset;
pub mod sampler;

pub use dataset::{Dataset, VecDataset};
pub use sampler::{RandomSampler, Sampler, SequentialSampler};
