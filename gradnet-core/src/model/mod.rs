//! Model composition: the [`Model`] contract and the [`Sequential`]
//! container.

pub mod sequential;

use std::fmt::Debug;

use crate::error::GradNetError;
use crate::nn::layer::ParameterList;
use crate::tensor::Tensor;

pub use sequential::{LayerSpec, Sequential};

/// A trainable composition of layers.
pub trait Model: Debug {
    /// Runs the whole model on `input`.
    fn forward(&self, input: &Tensor) -> Result<Tensor, GradNetError>;

    /// One ordered parameter list per layer, in layer order: the
    /// contract the optimizer consumes.
    fn parameters(&self) -> Vec<ParameterList>;
}
