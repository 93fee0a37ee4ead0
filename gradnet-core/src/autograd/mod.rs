//! Gradient graph bookkeeping: the per-tensor [`node::GradNode`] record
//! and the [`GradMode`] policy for resolving fan-out.

mod node;

pub(crate) use node::GradNode;

/// How a backward pass resolves the gradient of a tensor that sits on
/// more than one path to the output (fan-out).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GradMode {
    /// Each consuming path overwrites the stored gradient, so the
    /// last-visited path wins. This matches the historical engine and is
    /// the default for behavioral parity; it is *not* standard
    /// reverse-mode accumulation.
    #[default]
    Overwrite,
    /// Per-path gradients are summed elementwise, the standard
    /// reverse-mode treatment of a DAG with shared subexpressions.
    Accumulate,
}
