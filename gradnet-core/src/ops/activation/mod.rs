//! Clamp-based activations and the smooth activation family.

pub mod max;
pub mod min;
pub mod relu;
pub mod sigmoid;
pub mod softmax;

pub use max::{max, Max};
pub use min::{min, Min};
pub use relu::{leaky_relu, relu};
pub use sigmoid::{sigmoid, Sigmoid};
pub use softmax::{softmax, Softmax};
