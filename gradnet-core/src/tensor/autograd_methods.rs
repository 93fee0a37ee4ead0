//! Backward propagation and gradient access for [`Tensor`].

use crate::autograd::{GradMode, GradNode};
use crate::error::GradNetError;
use crate::ops::arithmetic::sub::difference;
use crate::tensor::Tensor;
use crate::value::Value;

impl Tensor {
    /// Starts a backward pass from this tensor with the default seed.
    ///
    /// Requires the tensor to be a `[1]`-shaped scalar. The seed used is
    /// a copy of the tensor's own value, not a canonical unit gradient;
    /// the two coincide only when the loss value itself happens to be the
    /// wanted seed. Call sites in this engine only ever use this on a
    /// true scalar loss.
    pub fn backward(&self) -> Result<(), GradNetError> {
        self.backward_in(None, GradMode::default())
    }

    /// Starts a backward pass with an explicit incoming gradient.
    pub fn backward_with(&self, gradient: &Tensor) -> Result<(), GradNetError> {
        self.backward_in(Some(gradient), GradMode::default())
    }

    /// Backward pass with an explicit fan-out policy. `None` gradient
    /// falls back to the scalar-only own-value seed.
    pub fn backward_in(
        &self,
        gradient: Option<&Tensor>,
        mode: GradMode,
    ) -> Result<(), GradNetError> {
        let seed = match gradient {
            Some(g) => g.clone(),
            None => {
                if self.shape() != [1] {
                    return Err(GradNetError::NonScalarBackward);
                }
                self.deep_clone()
            }
        };
        self.propagate(seed, mode)
    }

    /// Depth-first chain-rule recursion. Stores the incoming gradient,
    /// asks the producing operation (if any) for per-child gradients and
    /// recurses into the children in registration order.
    fn propagate(&self, gradient: Tensor, mode: GradMode) -> Result<(), GradNetError> {
        let pending = {
            let mut guard = self.write_data();
            match mode {
                GradMode::Overwrite => {
                    guard.node.gradient = Some(gradient.clone());
                }
                GradMode::Accumulate => match &guard.node.gradient {
                    Some(existing) => {
                        let seen = existing.value();
                        let incoming = gradient.value();
                        if seen.shape() != incoming.shape() {
                            return Err(GradNetError::GradientAccumulation {
                                expected: seen.shape(),
                                actual: incoming.shape(),
                            });
                        }
                        let shape = seen.shape();
                        let summed: Vec<f64> = seen
                            .flatten()
                            .into_iter()
                            .zip(incoming.flatten())
                            .map(|(a, b)| a + b)
                            .collect();
                        guard.node.gradient =
                            Some(Tensor::from_value(Value::from_flat(&shape, &summed)));
                    }
                    None => guard.node.gradient = Some(gradient.clone()),
                },
            }
            match &guard.node.producer {
                Some(operation) => {
                    let child_gradients = operation.backward(&gradient.value())?;
                    Some((child_gradients, guard.node.children.clone()))
                }
                None => {
                    log::trace!("backward reached a leaf tensor");
                    None
                }
            }
        };
        if let Some((child_gradients, children)) = pending {
            for (child, child_gradient) in children.iter().zip(child_gradients) {
                child.propagate(Tensor::new(child_gradient)?, mode)?;
            }
        }
        Ok(())
    }

    /// The gradient resolved by the most recent backward pass.
    ///
    /// Reading before any backward visited this tensor is an error.
    pub fn gradient(&self) -> Result<Tensor, GradNetError> {
        self.read_data()
            .node
            .gradient
            .clone()
            .ok_or(GradNetError::NotConnected)
    }

    /// Assigns the resolved gradient directly (used by the optimizer to
    /// substitute the processed update delta).
    pub fn set_gradient(&self, gradient: Tensor) {
        self.write_data().node.gradient = Some(gradient);
    }

    /// In-place update: subtracts the resolved gradient from the value,
    /// elementwise.
    pub fn apply_gradient(&self) -> Result<(), GradNetError> {
        let gradient = self.gradient()?;
        let updated = difference(&self.value(), &gradient.value())?;
        self.set_value(updated)
    }

    /// Replaces the gradient node wholesale with a fresh, empty one.
    /// This is the only mechanism for detaching recorded graph state.
    pub fn reset_graph(&self) {
        self.write_data().node = GradNode::default();
    }
}
