use crate::error::GradNetError;
use crate::nn::layer::ParameterList;
use crate::tensor::Tensor;

/// Trait defining the common interface for all optimizers.
///
/// An optimizer holds the model's parameter lists (non-owning handles;
/// the layers own the tensors) and a step counter. The provided `step`
/// drives the operation-specific [`Optimizer::process_gradient`] over
/// every parameter; `zero_grad` is the only mechanism for detaching the
/// recorded graph between training steps.
pub trait Optimizer {
    /// Parameter lists, one per layer, in model order.
    fn parameters(&self) -> &[ParameterList];

    /// Number of completed steps.
    fn step_count(&self) -> usize;

    fn set_step_count(&mut self, steps: usize);

    /// Operation-specific mapping from a parameter's resolved gradient to
    /// the update delta that will be subtracted from its value.
    fn process_gradient(&self, gradient: &Tensor, step: usize)
        -> Result<Tensor, GradNetError>;

    /// Hook run after a completed step (learning-rate decay and the
    /// like). Default: nothing.
    fn after_step(&mut self) {}

    /// One optimization step: for every parameter, process its resolved
    /// gradient, assign the delta back as the resolved gradient, then
    /// subtract it from the parameter's value in place. Reading a
    /// gradient before any backward pass surfaces as
    /// [`GradNetError::NotConnected`].
    fn step(&mut self) -> Result<(), GradNetError> {
        let step = self.step_count();
        for group in self.parameters() {
            for (_name, tensor) in group {
                let gradient = tensor.gradient()?;
                let delta = self.process_gradient(&gradient, step)?;
                tensor.set_gradient(delta);
                tensor.apply_gradient()?;
            }
        }
        self.set_step_count(step + 1);
        self.after_step();
        Ok(())
    }

    /// Discards all per-parameter graph state by replacing each
    /// parameter's gradient node with a fresh, empty one.
    fn zero_grad(&mut self) {
        for group in self.parameters() {
            for (_name, tensor) in group {
                tensor.reset_graph();
            }
        }
    }
}
