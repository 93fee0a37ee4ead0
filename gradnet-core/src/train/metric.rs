use std::fmt::Debug;

use crate::tensor::Tensor;

/// A running training metric, polled once per example.
pub trait Metric: Debug {
    /// Reports the metric value for this example and folds the example
    /// into the running state.
    fn update(&mut self, actual: &Tensor, predicted: &Tensor, example: usize) -> f64;
}

/// Running argmax accuracy over a fixed window of examples.
#[derive(Debug)]
pub struct Accuracy {
    corrects: usize,
    window: usize,
}

impl Accuracy {
    pub fn new(window: usize) -> Self {
        Accuracy {
            corrects: 0,
            window,
        }
    }
}

impl Default for Accuracy {
    fn default() -> Self {
        Accuracy::new(100)
    }
}

impl Metric for Accuracy {
    /// Returns the accuracy accumulated so far, *before* this example is
    /// counted. The window resets exactly when `example % window == 0`,
    /// which also clears the counter at index 0 of every window.
    fn update(&mut self, actual: &Tensor, predicted: &Tensor, example: usize) -> f64 {
        let value = self.corrects as f64 / self.window as f64;
        if example % self.window == 0 {
            self.corrects = 0;
        }
        if actual.value().argmax() == predicted.value().argmax() {
            self.corrects += 1;
        }
        value
    }
}
