//! Creation helpers for common tensor fills.

use crate::tensor::Tensor;
use crate::value::Value;

/// A tensor of the given shape with every element set to `fill`.
pub fn filled(shape: &[usize], fill: f64) -> Tensor {
    Tensor::from_value(Value::filled(shape, fill))
}

/// A tensor of the given shape with all elements set to 0.
pub fn zeros(shape: &[usize]) -> Tensor {
    filled(shape, 0.0)
}

/// A tensor of the given shape with all elements set to 1.
pub fn ones(shape: &[usize]) -> Tensor {
    filled(shape, 1.0)
}
