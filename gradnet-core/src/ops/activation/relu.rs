use crate::error::GradNetError;
use crate::ops::activation::max::max;
use crate::tensor::create::filled;
use crate::tensor::Tensor;

/// Clamp-at-zero activation: `Max` against a fixed `[1]` limit of 0.
pub fn relu(input: &Tensor) -> Result<Tensor, GradNetError> {
    max(input, &filled(&[1], 0.0))
}

/// The engine's leaky variant: a clamp at `-0.01` rather than a scaled
/// negative slope.
pub fn leaky_relu(input: &Tensor) -> Result<Tensor, GradNetError> {
    max(input, &filled(&[1], -0.01))
}
