use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Standardizes the flattened input: `(x - mean) / stddev` with the
/// population standard deviation. The stddev is cached for backward,
/// which is simply `grad / stddev`.
#[derive(Debug, Default)]
pub struct Normalize {
    stddev: f64,
}

impl TensorOperation for Normalize {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 1 {
            return Err(GradNetError::Arity {
                operation: "Normalize".to_string(),
                expected: 1,
                actual: inputs.len(),
            });
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        let flat = values[0].flatten();
        let count = flat.len() as f64;
        let mean: f64 = flat.iter().sum::<f64>() / count;
        let variance: f64 = flat.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / count;
        self.stddev = variance.sqrt();
        let stddev = self.stddev;
        Ok(values[0].map(|x| (x - mean) / stddev))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let stddev = self.stddev;
        Ok(vec![gradient.map(|g| g / stddev)])
    }
}

/// Standardizes a tensor over its flattened elements, recording the
/// operation.
pub fn normalize(input: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Normalize::default()),
        &[input.clone()],
        InvokeOptions::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::verify;
    use approx::assert_relative_eq;

    #[test]
    fn forward_standardizes_the_elements() {
        let input = Tensor::new(Value::from(vec![1.0, 2.0, 3.0, 4.0])).unwrap();
        let out = normalize(&input).unwrap();
        let data = out.value().flatten();
        let mean: f64 = data.iter().sum::<f64>() / data.len() as f64;
        let variance: f64 =
            data.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / data.len() as f64;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
        assert_relative_eq!(variance, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn backward_divides_by_the_cached_stddev() {
        let input = Tensor::new(Value::from(vec![0.0, 2.0])).unwrap(); // stddev = 1
        let out = normalize(&input).unwrap();
        let grad = Tensor::new(Value::from(vec![3.0, 5.0])).unwrap();
        out.backward_with(&grad).unwrap();
        assert_eq!(
            input.gradient().unwrap().value(),
            Value::from(vec![3.0, 5.0])
        );
    }

    #[test]
    fn verify_passes() {
        let input = Tensor::new(Value::from(vec![vec![1.0, 5.0], vec![2.0, 8.0]])).unwrap();
        verify(Box::new(Normalize::default()), &[input]).unwrap();
    }
}
