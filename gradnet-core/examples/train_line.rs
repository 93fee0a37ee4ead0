//! Fits a one-neuron model to `y = 2x` with the full training stack:
//! `Sequential` model, `Sgd` optimizer, `Subtract` loss reduced by
//! `Mean`, and the `Trainer` driving the per-example cycles.
//!
//! Run with: `cargo run --example train_line`

use gradnet_core::model::{LayerSpec, Model, Sequential};
use gradnet_core::ops::arithmetic::sub::Subtract;
use gradnet_core::optim::{Sgd, SgdConfig};
use gradnet_core::train::Trainer;
use gradnet_core::{GradNetError, Tensor, Value};

fn main() -> Result<(), GradNetError> {
    let model = Sequential::from_layer_specs(&[LayerSpec::new(1, 1)]);
    let optimizer = Sgd::new(
        model.parameters(),
        SgdConfig {
            lr: 0.1,
            decay: 0.0,
            min_lr: None,
        },
    );
    let mut trainer = Trainer::new(model, optimizer, Box::new(|| Box::new(Subtract)), None);
    trainer.on_loop_done(Box::new(|loss, _expected, _out, example, _metric| {
        if example % 20 == 0 {
            println!("example {example:>3}  loss {:+.5}", loss.value().flatten()[0]);
        }
    }));

    let points = [0.5, 1.0, 1.5, 2.0];
    let mut inputs = Vec::new();
    let mut labels = Vec::new();
    for _ in 0..25 {
        for x in points {
            inputs.push(Value::from(vec![vec![x]]));
            labels.push(Value::from(vec![vec![2.0 * x]]));
        }
    }
    trainer.train(&inputs, &labels, None)?;

    let probe = Tensor::new(Value::from(vec![vec![3.0]]))?;
    let prediction = trainer.model().forward(&probe)?.value().flatten()[0];
    println!("f(3.0) = {prediction:.4} (target 6.0)");
    Ok(())
}
