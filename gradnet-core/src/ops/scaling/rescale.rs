use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Divides every element by the largest absolute element, clamped to at
/// least 1: `x / max(max|x|, 1)`. The divisor is cached for backward,
/// which is `grad / max`.
#[derive(Debug, Default)]
pub struct Rescale {
    scale: f64,
}

impl TensorOperation for Rescale {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 1 {
            return Err(GradNetError::Arity {
                operation: "Rescale".to_string(),
                expected: 1,
                actual: inputs.len(),
            });
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        self.scale = values[0]
            .flatten()
            .iter()
            .fold(1.0_f64, |m, x| m.max(x.abs()));
        let scale = self.scale;
        Ok(values[0].map(|x| x / scale))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let scale = self.scale;
        Ok(vec![gradient.map(|g| g / scale)])
    }
}

/// Rescales a tensor into `[-1, 1]` by its largest absolute element,
/// recording the operation.
pub fn rescale(input: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Rescale::default()),
        &[input.clone()],
        InvokeOptions::default(),
    )
}
