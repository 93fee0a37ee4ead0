use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Mean over all elements of a single input, producing a `[1]` scalar.
///
/// The input shape and element count are cached at setup so backward can
/// broadcast the incoming scalar gradient back over the full input.
#[derive(Debug, Default)]
pub struct Mean {
    shape: Vec<usize>,
    element_count: usize,
}

impl TensorOperation for Mean {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 1 {
            return Err(GradNetError::Arity {
                operation: "Mean".to_string(),
                expected: 1,
                actual: inputs.len(),
            });
        }
        self.shape = inputs[0].shape();
        self.element_count = self.shape.iter().product();
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        let total: f64 = values[0].flatten().iter().sum();
        Ok(Value::from(vec![total / self.element_count as f64]))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let g = gradient.flatten().first().copied().unwrap_or(0.0);
        Ok(vec![Value::filled(&self.shape, g)])
    }
}

/// Reduces a tensor to the mean of its elements, recording the
/// operation.
pub fn mean(input: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Mean::default()),
        &[input.clone()],
        InvokeOptions::default(),
    )
}
