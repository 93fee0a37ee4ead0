use thiserror::Error;

/// Custom error type for the GradNet engine.
///
/// Every variant is fatal and local: it aborts the operation or the
/// training example in progress and surfaces to the caller. Nothing is
/// retried or silently recovered.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum GradNetError {
    #[error("shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("incompatible shapes for {operation}: {shape1:?} and {shape2:?}")]
    IncompatibleShapes {
        shape1: Vec<usize>,
        shape2: Vec<usize>,
        operation: String,
    },

    #[error("ragged value: elements at depth {depth} disagree on shape")]
    Ragged { depth: usize },

    #[error("{operation} requires {expected} input tensors, got {actual}")]
    Arity {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("{operation} requires a {expected}-dimensional tensor, got {actual} dimensions")]
    DimensionMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },

    #[error("backward function does not return gradients of all tensors: {returned} gradients for {expected} inputs")]
    GradientCount { expected: usize, returned: usize },

    #[error("gradient shape mismatch on element at index {index}: required shape {required:?} but got shape {actual:?}")]
    GradientShapeMismatch {
        index: usize,
        required: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("shape mismatch during gradient accumulation: expected {expected:?}, got {actual:?}")]
    GradientAccumulation {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("tensor not connected to the main gradient tensor or backward() not called")]
    NotConnected,

    #[error("cannot call backward() when the tensor is not one-dimensional")]
    NonScalarBackward,

    #[error("loss diverged to an infinite value on example {example}")]
    Divergence { example: usize },

    #[error("unknown activation name: {name}")]
    UnknownActivation { name: String },

    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("model data mismatch: {0}")]
    ModelDataMismatch(String),
}
