use std::fmt::Debug;

use crate::error::GradNetError;
use crate::tensor::Tensor;

/// A layer's named parameters, in registration order.
///
/// The explicit (name, tensor) pair list is iterated deterministically
/// for both optimizer updates and export; the tensors are graph leaves,
/// mutated in place by the optimizer between training steps.
pub type ParameterList = Vec<(String, Tensor)>;

/// A named-parameter-holding unit composing operation calls.
pub trait Layer: Debug {
    /// Runs the layer on `input`, recording the operations on the graph.
    fn forward(&self, input: &Tensor) -> Result<Tensor, GradNetError>;

    /// The layer's parameters in registration order.
    fn parameters(&self) -> &[(String, Tensor)];
}
