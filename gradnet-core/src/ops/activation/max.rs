use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Elementwise clamp of a tensor against a scalar-shaped `[1]` limit:
/// `max(x, limit)` per element.
///
/// The gradient passes through where `x > limit` and is zero elsewhere;
/// the limit's gradient is always `[0]`. The operand and limit are
/// cached at forward time.
#[derive(Debug, Default)]
pub struct Max {
    operand: Vec<f64>,
    shape: Vec<usize>,
    limit: f64,
}

impl TensorOperation for Max {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 2 {
            return Err(GradNetError::Arity {
                operation: "Max".to_string(),
                expected: 2,
                actual: inputs.len(),
            });
        }
        let limit_shape = inputs[1].shape();
        if limit_shape != [1] {
            return Err(GradNetError::ShapeMismatch {
                expected: vec![1],
                actual: limit_shape,
                operation: "Max".to_string(),
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
            .map(|&x| if x > limit { x } else { limit })
            .collect();
        Ok(Value::from_flat(&self.shape, &data))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let limit = self.limit;
        let data: Vec<f64> = self
            .operand
            .iter()
            .zip(gradient.flatten())
            .map(|(&x, g)| if x > limit { g } else { 0.0 })
            .collect();
        Ok(vec![
            Value::from_flat(&self.shape, &data),
            Value::from(vec![0.0]),
        ])
    }
}

/// Clamps `input` from below against the `[1]`-shaped `limit` tensor and
/// records the operation.
pub fn max(input: &Tensor, limit: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Max::default()),
        &[input.clone(), limit.clone()],
        InvokeOptions::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::verify;
    use crate::tensor::create::{filled, ones, zeros};

    #[test]
    fn forward_clamps_below_the_limit() {
        let input = Tensor::new(Value::from(vec![vec![-1.0, 2.0, -3.0]])).unwrap();
        let out = max(&input, &zeros(&[1])).unwrap();
        assert_eq!(out.value(), Value::from(vec![vec![0.0, 2.0, 0.0]]));
    }

    #[test]
    fn backward_masks_clamped_elements() {
        let input = Tensor::new(Value::from(vec![vec![-1.0, 2.0, -3.0]])).unwrap();
        let limit = zeros(&[1]);
        let out = max(&input, &limit).unwrap();
        let grad = Tensor::new(Value::from(vec![vec![1.0, 1.0, 1.0]])).unwrap();
        out.backward_with(&grad).unwrap();
        assert_eq!(
            input.gradient().unwrap().value(),
            Value::from(vec![vec![0.0, 1.0, 0.0]])
        );
        assert_eq!(limit.gradient().unwrap().value(), Value::from(vec![0.0]));
    }

    #[test]
    fn setup_requires_a_scalar_limit() {
        let err = max(&ones(&[2]), &ones(&[2])).unwrap_err();
        assert_eq!(
            err,
            GradNetError::ShapeMismatch {
                expected: vec![1],
                actual: vec![2],
                operation: "Max".to_string(),
            }
        );
    }

    #[test]
    fn verify_passes() {
        verify(
            Box::new(Max::default()),
            &[filled(&[2, 2], -0.5), zeros(&[1])],
        )
        .unwrap();
    }
}
