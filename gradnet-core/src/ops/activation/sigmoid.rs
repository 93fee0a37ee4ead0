use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Logistic activation `1 / (1 + e^-x)`.
///
/// The forward output is cached so backward can use `grad * s * (1 - s)`
/// without recomputing the exponentials.
#[derive(Debug, Default)]
pub struct Sigmoid {
    output: Vec<f64>,
    shape: Vec<usize>,
}

impl TensorOperation for Sigmoid {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 1 {
            return Err(GradNetError::Arity {
                operation: "Sigmoid".to_string(),
                expected: 1,
                actual: inputs.len(),
            });
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        self.shape = values[0].shape();
        self.output = values[0]
            .flatten()
            .into_iter()
            .map(|x| 1.0 / (1.0 + (-x).exp()))
            .collect();
        Ok(Value::from_flat(&self.shape, &self.output))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let data: Vec<f64> = self
            .output
            .iter()
            .zip(gradient.flatten())
            .map(|(&s, g)| g * s * (1.0 - s))
            .collect();
        Ok(vec![Value::from_flat(&self.shape, &data)])
    }
}

/// Applies the logistic function elementwise, recording the operation.
pub fn sigmoid(input: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Sigmoid::default()),
        &[input.clone()],
        InvokeOptions::default(),
    )
}
