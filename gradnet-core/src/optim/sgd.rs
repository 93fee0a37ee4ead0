use crate::error::GradNetError;
use crate::nn::layer::ParameterList;
use crate::ops::arithmetic::mul::product;
use crate::ops::sanitize::sanitize;
use crate::optim::optimizer::Optimizer;
use crate::tensor::Tensor;
use crate::value::Value;

/// Configuration for [`Sgd`]. Defaults follow the historical engine:
/// learning rate `1e-4`, decay `1e-2` per step, floor at one hundredth of
/// the initial rate.
#[derive(Clone, Copy, Debug)]
pub struct SgdConfig {
    pub lr: f64,
    pub decay: f64,
    /// Floor for the decayed learning rate; `None` means `lr * 1e-2`.
    pub min_lr: Option<f64>,
}

impl Default for SgdConfig {
    fn default() -> Self {
        SgdConfig {
            lr: 1e-4,
            decay: 1e-2,
            min_lr: None,
        }
    }
}

/// Stochastic gradient descent with NaN-sanitized gradients and a
/// geometrically decaying learning rate.
#[derive(Debug)]
pub struct Sgd {
    parameters: Vec<ParameterList>,
    step_num: usize,
    lr: f64,
    min_lr: f64,
    decay: f64,
}

impl Sgd {
    pub fn new(parameters: Vec<ParameterList>, config: SgdConfig) -> Self {
        let min_lr = config.min_lr.unwrap_or(config.lr * 1e-2);
        Sgd {
            parameters,
            step_num: 0,
            lr: config.lr,
            min_lr,
            decay: config.decay,
        }
    }

    /// The current (decayed) learning rate.
    pub fn learning_rate(&self) -> f64 {
        self.lr
    }
}

impl Optimizer for Sgd {
    fn parameters(&self) -> &[ParameterList] {
        &self.parameters
    }

    fn step_count(&self) -> usize {
        self.step_num
    }

    fn set_step_count(&mut self, steps: usize) {
        self.step_num = steps;
    }

    /// NaN-sanitized gradient times a same-shaped tensor of the current
    /// learning rate.
    fn process_gradient(
        &self,
        gradient: &Tensor,
        _step: usize,
    ) -> Result<Tensor, GradNetError> {
        let raw = sanitize(&gradient.value());
        let rate = Value::filled(&raw.shape(), self.lr);
        Tensor::new(product(&[raw, rate])?)
    }

    /// Decays the learning rate toward the floor:
    /// `lr = max(min_lr, lr - lr * decay)`.
    fn after_step(&mut self) {
        self.lr = self.min_lr.max(self.lr - self.lr * self.decay);
    }
}

#[cfg(test)]
#[path = "sgd_test.rs"]
mod tests;
