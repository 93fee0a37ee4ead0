use crate::error::GradNetError;
use crate::ops::linalg::transpose::transposed;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Raw row-major matrix product.
pub(crate) fn mat_mul(a: &[Vec<f64>], b: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let rows = a.len();
    let cols = b.first().map_or(0, Vec::len);
    let inner = b.len();
    let mut out = vec![vec![0.0; cols]; rows];
    for (r, out_row) in out.iter_mut().enumerate() {
        for (c, slot) in out_row.iter_mut().enumerate() {
            let mut sum = 0.0;
            for i in 0..inner {
                sum += a[r][i] * b[i][c];
            }
            *slot = sum;
        }
    }
    out
}

/// Matrix product of shapes `[m, k] x [k, n]`.
///
/// The operands are cached at forward time; backward computes
/// `dA = G * Bᵗ` and `dB = Aᵗ * G`.
#[derive(Debug, Default)]
pub struct Matmul {
    lhs: Vec<Vec<f64>>,
    rhs: Vec<Vec<f64>>,
}

impl TensorOperation for Matmul {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 2 {
            return Err(GradNetError::Arity {
                operation: "Matmul".to_string(),
                expected: 2,
                actual: inputs.len(),
            });
        }
        let shape1 = inputs[0].shape();
        let shape2 = inputs[1].shape();
        for shape in [&shape1, &shape2] {
            if shape.len() != 2 {
                return Err(GradNetError::DimensionMismatch {
                    operation: "Matmul".to_string(),
                    expected: 2,
                    actual: shape.len(),
                });
            }
        }
        if shape1[1] != shape2[0] {
            return Err(GradNetError::IncompatibleShapes {
                shape1,
                shape2,
                operation: "Matmul".to_string(),
            });
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        self.lhs = values[0].rows()?;
        self.rhs = values[1].rows()?;
        Ok(Value::from_rows(mat_mul(&self.lhs, &self.rhs)))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let grad = gradient.rows()?;
        let grad_lhs = mat_mul(&grad, &transposed(&self.rhs));
        let grad_rhs = mat_mul(&transposed(&self.lhs), &grad);
        Ok(vec![
            Value::from_rows(grad_lhs),
            Value::from_rows(grad_rhs),
        ])
    }
}

/// Multiplies two matrices and records the operation.
pub fn matmul(a: &Tensor, b: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Matmul::default()),
        &[a.clone(), b.clone()],
        InvokeOptions::default(),
    )
}
