use crate::error::GradNetError;
use crate::nn::activation::Activation;
use crate::nn::layer::{Layer, ParameterList};
use crate::ops::{add, matmul, transpose};
use crate::tensor::create::zeros;
use crate::tensor::Tensor;

/// A dense layer: `y = x * Wᵗ (+ b)`, optionally followed by an
/// activation resolved at construction from the fixed registry.
///
/// `weights` has shape `[outputs, inputs]` and `biases` (when present)
/// `[1, outputs]`; both start at zero, matching the historical engine.
#[derive(Debug)]
pub struct Linear {
    parameters: ParameterList,
    weights: Tensor,
    biases: Option<Tensor>,
    activation: Option<Activation>,
    num_inputs: usize,
    num_outputs: usize,
}

impl Linear {
    pub fn new(
        num_inputs: usize,
        num_outputs: usize,
        activation: Option<Activation>,
        bias: bool,
    ) -> Self {
        let weights = zeros(&[num_outputs, num_inputs]);
        let biases = bias.then(|| zeros(&[1, num_outputs]));
        let mut parameters: ParameterList = vec![("weights".to_string(), weights.clone())];
        if let Some(b) = &biases {
            parameters.push(("biases".to_string(), b.clone()));
        }
        Linear {
            parameters,
            weights,
            biases,
            activation,
            num_inputs,
            num_outputs,
        }
    }

    pub fn weights(&self) -> &Tensor {
        &self.weights
    }

    pub fn biases(&self) -> Option<&Tensor> {
        self.biases.as_ref()
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> usize {
        self.num_outputs
    }

    pub fn activation(&self) -> Option<Activation> {
        self.activation
    }
}

impl Layer for Linear {
    fn forward(&self, input: &Tensor) -> Result<Tensor, GradNetError> {
        let mut x = matmul(input, &transpose(&self.weights)?)?;
        if let Some(biases) = &self.biases {
            x = add(&[x, biases.clone()])?;
        }
        match &self.activation {
            Some(activation) => activation.apply(&x),
            None => Ok(x),
        }
    }

    fn parameters(&self) -> &[(String, Tensor)] {
        &self.parameters
    }
}

#[cfg(test)]
#[path = "linear_test.rs"]
mod tests;
