use std::collections::VecDeque;

use crate::error::GradNetError;
use crate::model::Model;
use crate::ops::reduction::mean::mean;
use crate::ops::{invoke, InvokeOptions, TensorOperation};
use crate::optim::optimizer::Optimizer;
use crate::tensor::Tensor;
use crate::train::metric::Metric;
use crate::value::Value;

/// Builds a fresh loss-operation instance for each example (operation
/// instances live exactly one forward/backward cycle).
pub type LossFactory = Box<dyn Fn() -> Box<dyn TensorOperation>>;

/// Progress hook invoked after every example with
/// (loss, expected, output, example index, metric value).
pub type LoopHook = Box<dyn FnMut(&Tensor, &Tensor, &Tensor, usize, f64)>;

/// Hook invoked with the model once an epoch's queue has drained.
pub type DoneHook<M> = Box<dyn FnMut(&M)>;

/// The one-hot "hot" value used by the historical engine.
const HOT: f64 = 0.8;

/// Drives one training epoch: forward, loss, backward, optimizer step,
/// metric and graph reset per example.
pub struct Trainer<M: Model, O: Optimizer> {
    model: M,
    optimizer: O,
    loss: LossFactory,
    metric: Option<Box<dyn Metric>>,
    on_loop_done: Option<LoopHook>,
    on_training_done: Option<DoneHook<M>>,
}

impl<M: Model, O: Optimizer> Trainer<M, O> {
    pub fn new(
        model: M,
        optimizer: O,
        loss: LossFactory,
        metric: Option<Box<dyn Metric>>,
    ) -> Self {
        Trainer {
            model,
            optimizer,
            loss,
            metric,
            on_loop_done: None,
            on_training_done: None,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn optimizer(&self) -> &O {
        &self.optimizer
    }

    /// Registers the per-example progress hook.
    pub fn on_loop_done(&mut self, hook: LoopHook) {
        self.on_loop_done = Some(hook);
    }

    /// Registers the end-of-epoch hook.
    pub fn on_training_done(&mut self, hook: DoneHook<M>) {
        self.on_training_done = Some(hook);
    }

    /// Runs one example's full cycle to completion: forward on the
    /// input, loss against the wrapped label, reduction to a scalar,
    /// parameterless backward, optimizer step and graph reset, then the
    /// divergence check, the metric and the progress hook.
    pub fn run_example(
        &mut self,
        input: &Value,
        label: &Value,
        example: usize,
    ) -> Result<(), GradNetError> {
        let input = Tensor::new(input.clone())?;
        let output = self.model.forward(&input)?;
        let expected = Tensor::new(label.clone())?;
        let loss = invoke(
            (self.loss)(),
            &[output.clone(), expected.clone()],
            InvokeOptions::default(),
        )?;
        let loss = mean(&loss)?;
        loss.backward()?;
        self.optimizer.step()?;
        self.optimizer.zero_grad();

        if loss.value().flatten().iter().any(|x| x.is_infinite()) {
            return Err(GradNetError::Divergence { example });
        }

        let metric_value = match &mut self.metric {
            Some(metric) => metric.update(&expected, &output, example),
            None => 0.0,
        };
        if let Some(hook) = &mut self.on_loop_done {
            hook(&loss, &expected, &output, example, metric_value);
        }
        Ok(())
    }

    /// Drives one epoch over parallel input/label sequences.
    ///
    /// Every example is first enqueued as its own deferred job, then the
    /// queue drains strictly in order; each cycle runs to completion
    /// before the next starts, and the progress hook between cycles is
    /// where the host gets to service interleaved events. A diverged
    /// example aborts only its own job; every other error aborts the
    /// run. There is no cancellation and no retry.
    pub fn train(
        &mut self,
        inputs: &[Value],
        labels: &[Value],
        one_hot: Option<usize>,
    ) -> Result<(), GradNetError> {
        let mut queue: VecDeque<(usize, Value, Value)> = VecDeque::new();
        for (example, (input, label)) in inputs.iter().zip(labels).enumerate() {
            let label = match one_hot {
                Some(classes) => one_hot_encode(label, classes)?,
                None => label.clone(),
            };
            queue.push_back((example, input.clone(), label));
        }
        while let Some((example, input, label)) = queue.pop_front() {
            match self.run_example(&input, &label, example) {
                Ok(()) => {}
                Err(GradNetError::Divergence { example }) => {
                    log::warn!("loss diverged on example {example}; skipping");
                }
                Err(other) => return Err(other),
            }
        }
        if let Some(hook) = &mut self.on_training_done {
            hook(&self.model);
        }
        Ok(())
    }
}

/// Encodes a scalar-like class label as a `[1, classes]` row holding
/// `0.8` at the class index.
fn one_hot_encode(label: &Value, classes: usize) -> Result<Value, GradNetError> {
    let class = label.flatten().first().copied().unwrap_or(0.0) as usize;
    if class >= classes {
        return Err(GradNetError::ModelDataMismatch(format!(
            "label class {class} outside {classes} one-hot classes"
        )));
    }
    let mut row = vec![0.0; classes];
    row[class] = HOT;
    Ok(Value::List(vec![Value::from(row)]))
}

#[cfg(test)]
#[path = "trainer_test.rs"]
mod tests;
