use crate::error::GradNetError;
use crate::ops::linalg::matmul::mat_mul;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Softmax over the flattened input: `exp(x) / sum(exp(x))`, preceded by
/// an internal rescale-by-max pass (`x / max(max|x|, 1)`) that keeps the
/// exponents bounded.
///
/// The probabilities are cached at forward time; backward contracts the
/// full Jacobian (diagonal `p_i(1-p_i)`, off-diagonal `-p_i p_j`) with
/// the incoming gradient via matrix multiply.
#[derive(Debug, Default)]
pub struct Softmax {
    probabilities: Vec<f64>,
    shape: Vec<usize>,
}

impl TensorOperation for Softmax {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.len() != 1 {
            return Err(GradNetError::Arity {
                operation: "Softmax".to_string(),
                expected: 1,
                actual: inputs.len(),
            });
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        self.shape = values[0].shape();
        let flat = values[0].flatten();
        let scale = flat.iter().fold(1.0_f64, |m, x| m.max(x.abs()));
        let exps: Vec<f64> = flat.iter().map(|x| (x / scale).exp()).collect();
        let total: f64 = exps.iter().sum();
        self.probabilities = exps.into_iter().map(|e| e / total).collect();
        Ok(Value::from_flat(&self.shape, &self.probabilities))
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let p = &self.probabilities;
        let n = p.len();
        let jacobian: Vec<Vec<f64>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| {
                        if i == j {
                            p[i] * (1.0 - p[i])
                        } else {
                            -p[i] * p[j]
                        }
                    })
                    .collect()
            })
            .collect();
        let contracted = mat_mul(&[gradient.flatten()], &jacobian);
        Ok(vec![Value::from_flat(&self.shape, &contracted[0])])
    }
}

/// Applies softmax over the flattened input, recording the operation.
pub fn softmax(input: &Tensor) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Softmax::default()),
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
    fn forward_produces_a_probability_distribution() {
        let input = Tensor::new(Value::from(vec![vec![1.0, 2.0, 3.0]])).unwrap();
        let out = softmax(&input).unwrap();
        let p = out.value().flatten();
        assert_eq!(out.shape(), vec![1, 3]);
        assert_relative_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(p[0] < p[1] && p[1] < p[2]);
    }

    #[test]
    fn forward_rescales_large_logits() {
        // Without the rescale pass these exponents would overflow.
        let input = Tensor::new(Value::from(vec![vec![800.0, 810.0]])).unwrap();
        let out = softmax(&input).unwrap();
        let p = out.value().flatten();
        assert!(p.iter().all(|x| x.is_finite()));
        assert_relative_eq!(p.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn uniform_input_gets_a_zero_gradient_for_a_uniform_upstream() {
        // For equal probabilities, every Jacobian row sums to zero, so a
        // constant upstream gradient is annihilated.
        let input = Tensor::new(Value::from(vec![vec![0.0, 0.0, 0.0, 0.0]])).unwrap();
        let out = softmax(&input).unwrap();
        let grad = Tensor::new(Value::from(vec![vec![1.0, 1.0, 1.0, 1.0]])).unwrap();
        out.backward_with(&grad).unwrap();
        for g in input.gradient().unwrap().value().flatten() {
            assert_relative_eq!(g, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn verify_passes() {
        let input = Tensor::new(Value::from(vec![vec![0.5, -0.5, 1.5]])).unwrap();
        verify(Box::new(Softmax::default()), &[input]).unwrap();
    }
}
