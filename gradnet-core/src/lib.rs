//! GradNet core: a minimal reverse-mode automatic-differentiation engine
//! and the neural-network training stack built on top of it.
//!
//! The building blocks, leaves first: nested numeric [`value::Value`]s,
//! [`tensor::Tensor`]s with per-tensor gradient nodes, the
//! [`ops::TensorOperation`] protocol and its operation library, layers
//! and the [`model::Sequential`] composition, gradient-descent
//! optimizers, and the [`train::Trainer`] driving one epoch.

pub mod autograd;
pub mod error;
pub mod model;
pub mod nn;
pub mod ops;
pub mod optim;
pub mod tensor;
pub mod train;
pub mod value;

pub use autograd::GradMode;
pub use error::GradNetError;
pub use tensor::Tensor;
pub use value::Value;
