use std::str::FromStr;

use crate::error::GradNetError;
use crate::ops::{leaky_relu, relu, sigmoid, softmax};
use crate::tensor::Tensor;

/// The fixed registry of activation operations a layer can resolve.
///
/// Layers hold one of these variants, chosen at construction time;
/// nothing is looked up by string while the network runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    Relu,
    LeakyRelu,
    Sigmoid,
    Softmax,
}

impl Activation {
    /// Applies the activation, recording it on the graph.
    pub fn apply(&self, input: &Tensor) -> Result<Tensor, GradNetError> {
        match self {
            Activation::Relu => relu(input),
            Activation::LeakyRelu => leaky_relu(input),
            Activation::Sigmoid => sigmoid(input),
            Activation::Softmax => softmax(input),
        }
    }
}

impl FromStr for Activation {
    type Err = GradNetError;

    /// Case-insensitive lookup; accepts the spellings historical model
    /// descriptors used ("relu", "ReLU", "Softmax", ...).
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "relu" => Ok(Activation::Relu),
            "leakyrelu" | "leaky_relu" => Ok(Activation::LeakyRelu),
            "sigmoid" => Ok(Activation::Sigmoid),
            "softmax" => Ok(Activation::Softmax),
            _ => Err(GradNetError::UnknownActivation {
                name: name.to_string(),
            }),
        }
    }
}
