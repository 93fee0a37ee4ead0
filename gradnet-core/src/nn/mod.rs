//! Neural-network building blocks: the activation registry, the layer
//! contract and concrete layers.

pub mod activation;
pub mod layer;
pub mod layers;

pub use activation::Activation;
pub use layer::{Layer, ParameterList};
pub use layers::linear::Linear;
