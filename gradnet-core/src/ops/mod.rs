//! The operation protocol and the library of differentiable primitives.
//!
//! Every primitive implements [`TensorOperation`] and is run through
//! [`invoke`], which wires the resulting tensor into the gradient graph.

use std::fmt::Debug;

use crate::error::GradNetError;
use crate::tensor::Tensor;
use crate::value::Value;

pub mod activation;
pub mod arithmetic;
pub mod linalg;
pub mod loss;
pub mod reduction;
pub mod sanitize;
pub mod scaling;

pub use activation::{leaky_relu, max, min, relu, sigmoid, softmax};
pub use arithmetic::{add, mul, sub};
pub use linalg::{matmul, transpose};
pub use loss::cross_entropy;
pub use reduction::mean;
pub use sanitize::nan_to_num;
pub use scaling::{normalize, rescale};

/// The contract every differentiable primitive implements.
///
/// An operation instance is transient: it is created fresh per
/// invocation, caches whatever forward-time state its backward formula
/// needs, and is owned by the output tensor's gradient node for exactly
/// one forward/backward cycle.
pub trait TensorOperation: Debug {
    /// Validates arity/shape preconditions (fatal on violation) and
    /// caches shape-level state needed later by `backward`.
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError>;

    /// Pure numeric computation on raw nested values. May cache operand
    /// values the backward formula needs.
    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError>;

    /// Chain-rule formula: maps the outgoing gradient value to one
    /// gradient value per input, each exactly matching that input's
    /// shape, in input order.
    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError>;
}

/// Options controlling how [`invoke`] wires the output into the graph.
#[derive(Clone, Copy, Debug, Default)]
pub struct InvokeOptions {
    /// When set, the inputs are not registered as the output's children
    /// and the operation instance is discarded after the forward pass.
    pub detached: bool,
}

/// Runs an operation: setup, forward (wrapping the result as a new
/// tensor) and, unless suppressed via `options`, registration of the
/// inputs as the output's children and of the operation instance as its
/// producer.
pub fn invoke(
    mut operation: Box<dyn TensorOperation>,
    inputs: &[Tensor],
    options: InvokeOptions,
) -> Result<Tensor, GradNetError> {
    operation.setup(inputs)?;
    let values: Vec<Value> = inputs.iter().map(Tensor::value).collect();
    let output = Tensor::new(operation.forward(&values)?)?;
    if !options.detached {
        output.attach(operation, inputs);
    }
    Ok(output)
}

/// Self-check for an operation's backward formula.
///
/// Calls the operation, feeds the forward output back through `backward`
/// and asserts that the gradient count equals the input count and that
/// every gradient's shape equals its corresponding input's shape. A
/// mismatch is fatal and names the offending input index.
pub fn verify(
    mut operation: Box<dyn TensorOperation>,
    inputs: &[Tensor],
) -> Result<Tensor, GradNetError> {
    operation.setup(inputs)?;
    let values: Vec<Value> = inputs.iter().map(Tensor::value).collect();
    let out_value = operation.forward(&values)?;
    let gradients = operation.backward(&out_value)?;
    if gradients.len() != inputs.len() {
        return Err(GradNetError::GradientCount {
            expected: inputs.len(),
            returned: gradients.len(),
        });
    }
    for (index, (input, gradient)) in inputs.iter().zip(&gradients).enumerate() {
        let required = input.shape();
        let actual = gradient.shape();
        if required != actual {
            return Err(GradNetError::GradientShapeMismatch {
                index,
                required,
                actual,
            });
        }
    }
    log::debug!("shapes verified for operation {:?}", operation);
    let output = Tensor::new(out_value)?;
    output.attach(operation, inputs);
    Ok(output)
}
