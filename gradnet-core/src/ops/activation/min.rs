use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Elementwise clamp of a tensor against a scalar-shaped `[1]` limit
/// from above: `min(x, limit)` per element. Mirror of [`super::Max`].
#[derive(Debug, Default)]
pub struct Min {
    operand: Vec<f64>,
    shape: Vec<usize>,
    limit: f64,
}

impl TensorOperation for Min {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 2 {
            return Err(GradNetError::Arity {
                operation: "Min".to_string(),
                expected: 2,
                actual: inputs.len(),
            });
        }
        let limit_shape = inputs[1].shape();
        if limit_shape != [1] {
            return Err(GradNetError::ShapeMismatch {
                expected: vec![1],
                actual: limit_shape,
                operation: "Min".to_string(),
            });
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        self.shape = values[0].shape();
        self.operand = values[0].flatten();
        self.limit = values[1].flatten().first().copied().unwrap_or(0.0);
        let limit = self.limit;
        let data: Vec<f64> = self
            .operand
            .iter()
            .map(|&x| if x < limit { x } else { limit })
            .collect();
        Ok(Value::from_flat(&self.shape, &data))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let limit = self.limit;
        let data: Vec<f64> = self
            .operand
            .iter()
            .zip(gradient.flatten())
            .map(|(&x, g)| if x < limit { g } else { 0.0 })
            .collect();
        Ok(vec![
            Value::from_flat(&self.shape, &data),
            Value::from(vec![0.0]),
        ])
    }
}

/// Clamps `input` from above against the `[1]`-shaped `limit` tensor and
/// records the operation.
pub fn min(input: &Tensor, limit: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Min::default()),
        &[input.clone(), limit.clone()],
        InvokeOptions::default(),
    )
}
