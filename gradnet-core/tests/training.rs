//! End-to-end training properties over the public API.

use gradnet_core::model::{LayerSpec, Sequential, Model};
use gradnet_core::nn::Activation;
use gradnet_core::ops::arithmetic::sub::Subtract;
use gradnet_core::ops::{mean, sub};
use gradnet_core::optim::{Optimizer, Sgd, SgdConfig};
use gradnet_core::train::Trainer;
use gradnet_core::{Tensor, Value};

#[test]
fn linear_forward_matches_the_hand_computed_product() {
    let model = Sequential::from_layer_specs(&[LayerSpec::new(3, 1).without_bias()]);
    model.parameters()[0][0]
        .1
        .set_value(Value::from(vec![vec![1.0, 1.0, 1.0]]))
        .unwrap();
    let input = Tensor::new(Value::from(vec![vec![1.0, 2.0, 3.0]])).unwrap();
    let out = model.forward(&input).unwrap();
    assert_eq!(out.value(), Value::from(vec![vec![6.0]]));
}

#[test]
fn perfect_prediction_yields_a_zero_weight_gradient() {
    let model = Sequential::from_layer_specs(&[LayerSpec::new(3, 1).without_bias()]);
    let weights = model.parameters()[0][0].1.clone();
    weights
        .set_value(Value::from(vec![vec![1.0, 1.0, 1.0]]))
        .unwrap();

    let input = Tensor::new(Value::from(vec![vec![1.0, 2.0, 3.0]])).unwrap();
    let out = model.forward(&input).unwrap();
    let target = Tensor::new(Value::from(vec![vec![6.0]])).unwrap();
    let loss = mean(&sub(&out, &target).unwrap()).unwrap();
    assert_eq!(loss.value(), Value::from(vec![0.0]));

    loss.backward().unwrap();
    assert_eq!(
        weights.gradient().unwrap().value(),
        Value::from(vec![vec![0.0, 0.0, 0.0]])
    );
}

#[test]
fn zero_grad_detaches_every_parameter() {
    let model = Sequential::from_layer_specs(&[
        LayerSpec::new(2, 2).with_activation(Activation::Relu),
        LayerSpec::new(2, 1),
    ]);
    let mut optimizer = Sgd::new(model.parameters(), SgdConfig::default());

    let input = Tensor::new(Value::from(vec![vec![1.0, -1.0]])).unwrap();
    let out = model.forward(&input).unwrap();
    let target = Tensor::new(Value::from(vec![vec![0.5]])).unwrap();
    let loss = mean(&sub(&out, &target).unwrap()).unwrap();
    loss.backward().unwrap();
    optimizer.step().unwrap();
    optimizer.zero_grad();

    for group in model.parameters() {
        for (_name, tensor) in group {
            assert!(tensor.gradient().is_err());
            assert!(tensor.is_leaf());
        }
    }
}

#[test]
fn a_two_layer_network_trains_through_the_trainer() {
    // One hidden layer with relu on top of zero-initialized weights
    // leaves the relu half-open; the output layer still learns the
    // constant target through its bias, which is all this smoke test
    // needs from a full trainer cycle.
    let model = Sequential::from_layer_specs(&[
        LayerSpec::new(2, 3).with_activation(Activation::Relu),
        LayerSpec::new(3, 1),
    ]);
    let parameters = model.parameters();
    let optimizer = Sgd::new(
        parameters,
        SgdConfig {
            lr: 0.05,
            decay: 0.0,
            min_lr: None,
        },
    );
    let mut trainer = Trainer::new(
        model,
        optimizer,
        Box::new(|| Box::new(Subtract)),
        None,
    );

    let inputs = vec![Value::from(vec![vec![1.0, 0.5]]); 80];
    let labels = vec![Value::from(vec![vec![1.0]]); 80];
    trainer.train(&inputs, &labels, None).unwrap();

    let input = Tensor::new(Value::from(vec![vec![1.0, 0.5]])).unwrap();
    let out = trainer.model().forward(&input).unwrap();
    let prediction = out.value().flatten()[0];
    assert!(
        (prediction - 1.0).abs() < 0.1,
        "prediction {prediction} did not approach the target"
    );
}
