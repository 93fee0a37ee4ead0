use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Raw 2-D transpose on row vectors.
pub(crate) fn transposed(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let cols = rows.first().map_or(0, Vec::len);
    (0..cols)
        .map(|c| rows.iter().map(|row| row[c]).collect())
        .collect()
}

/// 2-D matrix transpose. The backward pass transposes the incoming
/// gradient back.
#[derive(Debug, Default)]
pub struct Transpose;

impl TensorOperation for Transpose {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 1 {
            return Err(GradNetError::Arity {
                operation: "Transpose".to_string(),
                expected: 1,
                actual: inputs.len(),
            });
        }
        let rank = inputs[0].shape().len();
        if rank != 2 {
            return Err(GradNetError::DimensionMismatch {
                operation: "Transpose".to_string(),
                expected: 2,
                actual: rank,
            });
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        Ok(Value::from_rows(transposed(&values[0].rows()?)))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        Ok(vec![Value::from_rows(transposed(&gradient.rows()?))])
    }
}

/// Transposes a 2-D tensor and records the operation.
pub fn transpose(input: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Transpose),
        &[input.clone()],
        InvokeOptions::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::verify;
    use crate::tensor::create::ones;

    #[test]
    fn forward_transposes() {
        let input = Tensor::new(Value::from(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]))
            .unwrap();
        let out = transpose(&input).unwrap();
        assert_eq!(out.shape(), vec![3, 2]);
        assert_eq!(
            out.value(),
            Value::from(vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]])
        );
    }

    #[test]
    fn backward_transposes_the_gradient() {
        let input = ones(&[2, 3]);
        let out = transpose(&input).unwrap();
        let grad =
            Tensor::new(Value::from(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]))
                .unwrap();
        out.backward_with(&grad).unwrap();
        assert_eq!(
            input.gradient().unwrap().value(),
            Value::from(vec![vec![1.0, 3.0, 5.0], vec![2.0, 4.0, 6.0]])
        );
    }

    #[test]
    fn setup_rejects_non_matrices() {
        let err = transpose(&ones(&[3])).unwrap_err();
        assert_eq!(
            err,
            GradNetError::DimensionMismatch {
                operation: "Transpose".to_string(),
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn verify_passes() {
        verify(Box::new(Transpose), &[ones(&[2, 3])]).unwrap();
    }
}
