use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Elementwise n-ary addition.
///
/// All inputs must share one shape; the backward pass hands the incoming
/// gradient to every input unchanged.
#[derive(Debug, Default)]
pub struct Add {
    input_count: usize,
}

impl TensorOperation for Add {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.is_empty() {
            return Err(GradNetError::Arity {
                operation: "Add".to_string(),
                expected: 1,
                actual: 0,
            });
        }
        let first = inputs[0].shape();
        for input in &inputs[1..] {
            let shape = input.shape();
            if shape != first {
                return Err(GradNetError::ShapeMismatch {
                    expected: first,
                    actual: shape,
                    operation: "Add".to_string(),
                });
            }
        }
        self.input_count = inputs.len();
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        let shape = values[0].shape();
        let mut acc = values[0].flatten();
        for value in &values[1..] {
            for (slot, x) in acc.iter_mut().zip(value.flatten()) {
                *slot += x;
            }
        }
        Ok(Value::from_flat(&shape, &acc))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        Ok(vec![gradient.clone(); self.input_count])
    }
}

/// Sums the given tensors elementwise and records the operation.
pub fn add(inputs: &[Tensor]) -> Result<Tensor, GradNetError> {
    invoke(Box::new(Add::default()), inputs, InvokeOptions::default())
}
