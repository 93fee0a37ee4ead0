use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Raw elementwise difference of two equally shaped values.
///
/// Shared with `Tensor::apply_gradient`, which subtracts the resolved
/// gradient from a parameter's value outside any recorded graph.
pub(crate) fn difference(a: &Value, b: &Value) -> Result<Value, GradNetError> {
    a.zip_map(b, "Subtract", |x, y| x - y)
}

/// Elementwise binary subtraction `a - b`.
#[derive(Debug, Default)]
pub struct Subtract;

impl TensorOperation for Subtract {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 2 {
            return Err(GradNetError::Arity {
                operation: "Subtract".to_string(),
                expected: 2,
                actual: inputs.len(),
            });
        }
        let (a, b) = (inputs[0].shape(), inputs[1].shape());
        if a != b {
            return Err(GradNetError::ShapeMismatch {
                expected: a,
                actual: b,
                operation: "Subtract".to_string(),
            });
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        difference(&values[0], &values[1])
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        Ok(vec![gradient.clone(), gradient.map(|g| -g)])
    }
}

/// Subtracts `b` from `a` elementwise and records the operation.
pub fn sub(a: &Tensor, b: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Subtract),
        &[a.clone(), b.clone()],
        InvokeOptions::default(),
    )
}
