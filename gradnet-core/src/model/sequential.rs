use crate::error::GradNetError;
use crate::model::Model;
use crate::nn::activation::Activation;
use crate::nn::layer::{Layer, ParameterList};
use crate::nn::layers::linear::Linear;
use crate::tensor::Tensor;
use crate::value::Value;

/// Construction record for one dense layer, sufficient to rebuild a
/// [`Sequential`] with matching topology. These records are the boundary
/// with external persistence collaborators; no I/O happens here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSpec {
    pub inputs: usize,
    pub outputs: usize,
    pub activation: Option<Activation>,
    pub bias: bool,
}

impl LayerSpec {
    pub fn new(inputs: usize, outputs: usize) -> Self {
        LayerSpec {
            inputs,
            outputs,
            activation: None,
            bias: true,
        }
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = Some(activation);
        self
    }

    pub fn without_bias(mut self) -> Self {
        self.bias = false;
        self
    }
}

/// Ordered composition of layers: layer *i*'s output feeds layer
/// *i + 1*'s input.
#[derive(Debug, Default)]
pub struct Sequential {
    layers: Vec<Box<dyn Layer>>,
}

impl Sequential {
    pub fn new() -> Self {
        Sequential { layers: Vec::new() }
    }

    pub fn add(&mut self, layer: Box<dyn Layer>) {
        self.layers.push(layer);
    }

    pub fn layers(&self) -> &[Box<dyn Layer>] {
        &self.layers
    }

    /// Rebuilds a model from an ordered list of layer descriptors.
    pub fn from_layer_specs(specs: &[LayerSpec]) -> Self {
        let mut model = Sequential::new();
        for spec in specs {
            model.add(Box::new(Linear::new(
                spec.inputs,
                spec.outputs,
                spec.activation,
                spec.bias,
            )));
        }
        model
    }

    /// Exports every parameter value keyed by layer position and
    /// parameter name, in structural order, for an external persistence
    /// collaborator to serialize.
    pub fn export_parameters(&self) -> Vec<Vec<(String, Value)>> {
        self.layers
            .iter()
            .map(|layer| {
                layer
                    .parameters()
                    .iter()
                    .map(|(name, tensor)| (name.clone(), tensor.value()))
                    .collect()
            })
            .collect()
    }

    /// Restores parameter values exported by [`Self::export_parameters`]
    /// (or produced by an external loader) into a model of matching
    /// topology. Every value is shape-validated against the parameter it
    /// replaces.
    pub fn load_parameters(&self, data: &[Vec<(String, Value)>]) -> Result<(), GradNetError> {
        if data.len() != self.layers.len() {
            return Err(GradNetError::ModelDataMismatch(format!(
                "expected parameter lists for {} layers, got {}",
                self.layers.len(),
                data.len()
            )));
        }
        for (position, (layer, entries)) in self.layers.iter().zip(data).enumerate() {
            let parameters = layer.parameters();
            if entries.len() != parameters.len() {
                return Err(GradNetError::ModelDataMismatch(format!(
                    "layer {position} holds {} parameters, got {}",
                    parameters.len(),
                    entries.len()
                )));
            }
            for ((name, tensor), (entry_name, value)) in parameters.iter().zip(entries) {
                if name != entry_name {
                    return Err(GradNetError::ModelDataMismatch(format!(
                        "layer {position}: expected parameter '{name}', got '{entry_name}'"
                    )));
                }
                tensor.set_value(value.clone())?;
            }
        }
        Ok(())
    }
}

impl Model for Sequential {
    fn forward(&self, input: &Tensor) -> Result<Tensor, GradNetError> {
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.forward(&current)?;
        }
        Ok(current)
    }

    fn parameters(&self) -> Vec<ParameterList> {
        self.layers
            .iter()
            .map(|layer| layer.parameters().to_vec())
            .collect()
    }
}
