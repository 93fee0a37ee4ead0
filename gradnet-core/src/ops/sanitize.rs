//! NaN sanitization.

use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::create::zeros;
use crate::tensor::Tensor;
use crate::value::Value;

/// Raw helper: replaces every NaN element with 0.
///
/// Shared with the SGD optimizer, which sanitizes raw gradient values
/// outside any recorded graph. Infinities pass through so that a
/// diverging loss stays observable.
pub fn sanitize(value: &Value) -> Value {
    value.map(|x| if x.is_nan() { 0.0 } else { x })
}

/// Replaces NaN elements with a `[1]`-shaped replacement operand.
///
/// Backward passes the gradient through where the original element was a
/// number and zeroes it where it was NaN; the replacement operand's
/// gradient is always `[0]`.
#[derive(Debug, Default)]
pub struct NanToNum {
    was_nan: Vec<bool>,
    shape: Vec<usize>,
}

impl TensorOperation for NanToNum {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 2 {
            return Err(GradNetError::Arity {
                operation: "NanToNum".to_string(),
                expected: 2,
                actual: inputs.len(),
            });
        }
        let replacement_shape = inputs[1].shape();
        if replacement_shape != [1] {
            return Err(GradNetError::ShapeMismatch {
                expected: vec![1],
                actual: replacement_shape,
                operation: "NanToNum".to_string(),
            });
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        self.shape = values[0].shape();
        let replacement = values[1].flatten().first().copied().unwrap_or(0.0);
        let flat = values[0].flatten();
        self.was_nan = flat.iter().map(|x| x.is_nan()).collect();
        let data: Vec<f64> = flat
            .into_iter()
            .map(|x| if x.is_nan() { replacement } else { x })
            .collect();
        Ok(Value::from_flat(&self.shape, &data))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let data: Vec<f64> = self
            .was_nan
            .iter()
            .zip(gradient.flatten())
            .map(|(&nan, g)| if nan { 0.0 } else { g })
            .collect();
        Ok(vec![
            Value::from_flat(&self.shape, &data),
            Value::from(vec![0.0]),
        ])
    }
}

/// Replaces NaN elements with 0, recording the operation.
pub fn nan_to_num(input: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(NanToNum::default()),
        &[input.clone(), zeros(&[1])],
        InvokeOptions::default(),
    )
}
