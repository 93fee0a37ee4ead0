//! 2-D linear-algebra primitives.

pub mod matmul;
pub mod transpose;

pub use matmul::{matmul, Matmul};
pub use transpose::{transpose, Transpose};
