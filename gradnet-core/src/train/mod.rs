//! The training-loop driver and its metrics.

pub mod metric;
pub mod trainer;

pub use metric::{Accuracy, Metric};
pub use trainer::{DoneHook, LoopHook, LossFactory, Trainer};
