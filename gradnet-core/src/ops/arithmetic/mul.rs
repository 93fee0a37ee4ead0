use crate::error::GradNetError;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::tensor::Tensor;
use crate::value::Value;

/// Raw elementwise product of equally shaped values.
///
/// Shared with the SGD optimizer, which scales a sanitized gradient by a
/// same-shaped tensor of the learning rate.
pub(crate) fn product(values: &[Value]) -> Result<Value, GradNetError> {
    let shape = values[0].shape();
    let mut acc = values[0].flatten();
    for value in &values[1..] {
        let other = value.shape();
        if other != shape {
            return Err(GradNetError::ShapeMismatch {
                expected: shape,
                actual: other,
                operation: "Multiply".to_string(),
            });
        }
        for (slot, x) in acc.iter_mut().zip(value.flatten()) {
            *slot *= x;
        }
    }
    Ok(Value::from_flat(&shape, &acc))
}

/// Elementwise n-ary multiplication.
///
/// The backward pass gives each input the incoming gradient times the
/// product of all *other* inputs' forward values, which are cached here
/// during `forward`.
#[derive(Debug, Default)]
pub struct Multiply {
    operands: Vec<Value>,
}

impl TensorOperation for Multiply {
    fn setup(&mut self, inputs: &[Tensor]) -> Result<(), GradNetError> {
        if inputs.is_empty() {
            return Err(GradNetError::Arity {
                operation: "Multiply".to_string(),
                expected: 1,
                actual: 0,
            });
        }
        let first = inputs[0].shape();
        for input in &inputs[1..] {
            let shape = input.shape();
            if shape != first {
                return Err(GradNetError::ShapeMismatch {
                    expected: first,
                    actual: shape,
                    operation: "Multiply".to_string(),
                });
            }
        }
        Ok(())
    }

    fn forward(&mut self, values: &[Value]) -> Result<Value, GradNetError> {
        self.operands = values.to_vec();
        product(values)
    }

    fn backward(&self, gradient: &Value) -> Result<Vec<Value>, GradNetError> {
        let shape = gradient.shape();
        let grad = gradient.flatten();
        let flats: Vec<Vec<f64>> = self.operands.iter().map(Value::flatten).collect();
        let mut gradients = Vec::with_capacity(flats.len());
        for skip in 0..flats.len() {
            let mut data = grad.clone();
            for (index, operand) in flats.iter().enumerate() {
                if index == skip {
                    continue;
                }
                for (slot, x) in data.iter_mut().zip(operand) {
                    *slot *= x;
                }
            }
            gradients.push(Value::from_flat(&shape, &data));
        }
        Ok(gradients)
    }
}

/// Multiplies the given tensors elementwise and records the operation.
pub fn mul(inputs: &[Tensor]) -> Result<Tensor, GradNetError> {
    invoke(
        Box::new(Multiply::default()),
        inputs,
        InvokeOptions::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::verify;
    use crate::tensor::create::filled;

    #[test]
    fn forward_multiplies_all_inputs() {
        let out = mul(&[filled(&[2], 2.0), filled(&[2], 3.0), filled(&[2], 4.0)]).unwrap();
        assert_eq!(out.value(), Value::from(vec![24.0, 24.0]));
    }

    #[test]
    fn backward_uses_the_other_operands() {
        let a = filled(&[2], 2.0);
        let b = filled(&[2], 3.0);
        let out = mul(&[a.clone(), b.clone()]).unwrap();
        let grad = Tensor::new(Value::from(vec![1.0, 10.0])).unwrap();
        out.backward_with(&grad).unwrap();
        // dA = grad * b, dB = grad * a
        assert_eq!(a.gradient().unwrap().value(), Value::from(vec![3.0, 30.0]));
        assert_eq!(b.gradient().unwrap().value(), Value::from(vec![2.0, 20.0]));
    }

    #[test]
    fn squaring_through_two_handles_of_one_tensor() {
        // loss = x * x: both children are the same tensor, so under the
        // default overwrite mode the stored gradient is the last path's.
        let x = filled(&[1], 3.0);
        let out = mul(&[x.clone(), x.clone()]).unwrap();
        assert_eq!(out.value(), Value::from(vec![9.0]));
        out.backward().unwrap();
        // seed is out's own value (9); each path contributes 9 * 3 = 27.
        assert_eq!(x.gradient().unwrap().value(), Value::from(vec![27.0]));
    }

    #[test]
    fn verify_passes() {
        verify(
            Box::new(Multiply::default()),
            &[filled(&[2, 2], 2.0), filled(&[2, 2], 3.0)],
        )
        .unwrap();
    }
}
