use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

const EPSILON: f64 = 1e-8;

/// The engine's "cross entropy": a smoothed squared-error formula, not
/// textbook log-loss. Kept verbatim from the historical engine.
///
/// Forward, per element with `a` clipped to at most 1:
/// `-ln(1 + ε - (a - b)²)`, ε = 1e-8.
/// Backward returns `[2(a - b) / (1 + ε - (a - b)²), gradient]`: the
/// prediction's gradient ignores the incoming gradient and the target
/// receives the incoming gradient unchanged.
#[derive(Debug, Default)]
pub struct CrossEntropy {
    clipped: Vec<f64>,
    target: Vec<f64>,
    shape: Vec<usize>,
}

impl TensorOperation for CrossEntropy {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 2 {
            return Err(GradNetError::Arity {
                operation: "CrossEntropy".to_string(),
                expected: 2,
                actual: inputs.len(),
            });
        }
        let (a, b) = (inputs[0].shape(), inputs[1].shape());
        if a != b {
            return Err(GradNetError::ShapeMismatch {
                expected: a,
                actual: b,
                operation: "CrossEntropy".to_string(),
            });
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        self.shape = values[0].shape();
        self.clipped = values[0]
            .flatten()
            .into_iter()
            .map(|a| a.min(1.0))
            .collect();
        self.target = values[1].flatten();
        let data: Vec<f64> = self
            .clipped
            .iter()
            .zip(&self.target)
            .map(|(&a, &b)| {
                let diff = a - b;
                -(1.0 + EPSILON - diff * diff).ln()
            })
            .collect();
        Ok(Value::from_flat(&self.shape, &data))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let data: Vec<f64> = self
            .clipped
            .iter()
            .zip(&self.target)
            .map(|(&a, &b)| {
                let diff = a - b;
                2.0 * diff / (1.0 + EPSILON - diff * diff)
            })
            .collect();
        Ok(vec![Value::from_flat(&self.shape, &data), gradient.clone()])
    }
}

/// Computes the smoothed loss of (prediction, target), recording the
/// operation.
pub fn cross_entropy(prediction: &Tensor, target: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(CrossEntropy::default()),
        &[prediction.clone(), target.clone()],
        InvokeOptions::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::verify;
    use approx::assert_relative_eq;

    #[test]
    fn perfect_prediction_has_near_zero_loss() {
        let prediction = Tensor::new(Value::from(vec![vec![0.8, 0.1]])).unwrap();
        let target = Tensor::new(Value::from(vec![vec![0.8, 0.1]])).unwrap();
        let out = cross_entropy(&prediction, &target).unwrap();
        for x in out.value().flatten() {
            assert_relative_eq!(x, -(1.0_f64 + EPSILON).ln(), epsilon = 1e-12);
        }
    }

    #[test]
    fn loss_grows_with_the_error() {
        let target = Tensor::new(Value::from(vec![0.0])).unwrap();
        let near = cross_entropy(&Tensor::new(Value::from(vec![0.1])).unwrap(), &target)
            .unwrap()
            .value()
            .flatten()[0];
        let far = cross_entropy(&Tensor::new(Value::from(vec![0.9])).unwrap(), &target)
            .unwrap()
            .value()
            .flatten()[0];
        assert!(far > near);
    }

    #[test]
    fn predictions_above_one_are_clipped() {
        let prediction = Tensor::new(Value::from(vec![5.0])).unwrap();
        let target = Tensor::new(Value::from(vec![1.0])).unwrap();
        let out = cross_entropy(&prediction, &target).unwrap();
        // clip(5) = 1, so the loss is the perfect-match value.
        assert_relative_eq!(
            out.value().flatten()[0],
            -(1.0_f64 + EPSILON).ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn backward_keeps_the_historical_asymmetry() {
        let prediction = Tensor::new(Value::from(vec![0.5])).unwrap();
        let target = Tensor::new(Value::from(vec![0.0])).unwrap();
        let out = cross_entropy(&prediction, &target).unwrap();
        let grad = Tensor::new(Value::from(vec![10.0])).unwrap();
        out.backward_with(&grad).unwrap();
        // Prediction gradient is the local formula, independent of the
        // incoming gradient.
        let expected = 2.0 * 0.5 / (1.0 + EPSILON - 0.25);
        assert_relative_eq!(
            prediction.gradient().unwrap().value().flatten()[0],
            expected,
            epsilon = 1e-12
        );
        // Target receives the incoming gradient unchanged.
        assert_eq!(
            target.gradient().unwrap().value(),
            Value::from(vec![10.0])
        );
    }

    #[test]
    fn verify_passes() {
        let prediction = Tensor::new(Value::from(vec![vec![0.2, 0.7]])).unwrap();
        let target = Tensor::new(Value::from(vec![vec![0.0, 1.0]])).unwrap();
        verify(Box::new(CrossEntropy::default()), &[prediction, target]).unwrap();
    }
}
