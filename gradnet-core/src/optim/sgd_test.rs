use super::*;
use crate::error::GradNetError;
use crate::tensor::create::filled;
use approx::assert_relative_eq;

fn single_parameter(shape: &[usize], fill: f64) -> (Vec<ParameterList>, Tensor) {
    let parameter = filled(shape, fill);
    (
        vec![vec![("weights".to_string(), parameter.clone())]],
        parameter,
    )
}

#[test]
fn process_gradient_scales_by_the_learning_rate() {
    let (groups, _) = single_parameter(&[2, 2], 0.0);
    let sgd = Sgd::new(
        groups,
        SgdConfig {
            lr: 0.1,
            ..SgdConfig::default()
        },
    );
    let gradient = filled(&[2, 2], 3.0);
    let delta = sgd.process_gradient(&gradient, 0).unwrap();
    assert_eq!(delta.shape(), vec![2, 2]);
    for x in delta.value().flatten() {
        assert_relative_eq!(x, 0.3);
    }
}

#[test]
fn process_gradient_sanitizes_nans() {
    let (groups, _) = single_parameter(&[2], 0.0);
    let sgd = Sgd::new(
        groups,
        SgdConfig {
            lr: 0.5,
            ..SgdConfig::default()
        },
    );
    let gradient = Tensor::new(Value::from(vec![f64::NAN, 2.0])).unwrap();
    let delta = sgd.process_gradient(&gradient, 0).unwrap();
    assert_eq!(delta.value(), Value::from(vec![0.0, 1.0]));
}

#[test]
fn step_applies_the_delta_and_decays_the_rate() {
    let (groups, parameter) = single_parameter(&[2], 1.0);
    let mut sgd = Sgd::new(
        groups,
        SgdConfig {
            lr: 0.1,
            decay: 0.5,
            min_lr: Some(1e-3),
        },
    );
    parameter.set_gradient(filled(&[2], 2.0));
    sgd.step().unwrap();
    // value -= grad * lr = 1 - 0.2
    assert_eq!(parameter.value(), Value::from(vec![0.8, 0.8]));
    assert_eq!(sgd.step_count(), 1);
    // lr -= lr * decay
    assert_relative_eq!(sgd.learning_rate(), 0.05);
}

#[test]
fn decay_floors_at_min_lr() {
    let (groups, parameter) = single_parameter(&[1], 0.0);
    let mut sgd = Sgd::new(
        groups,
        SgdConfig {
            lr: 0.1,
            decay: 0.9,
            min_lr: Some(0.05),
        },
    );
    for _ in 0..5 {
        parameter.set_gradient(filled(&[1], 0.0));
        sgd.step().unwrap();
    }
    assert_relative_eq!(sgd.learning_rate(), 0.05);
}

#[test]
fn default_floor_is_a_hundredth_of_the_initial_rate() {
    let (groups, _) = single_parameter(&[1], 0.0);
    let sgd = Sgd::new(
        groups,
        SgdConfig {
            lr: 0.2,
            ..SgdConfig::default()
        },
    );
    assert_relative_eq!(sgd.min_lr, 0.002);
}

#[test]
fn step_without_a_backward_pass_is_not_connected() {
    let (groups, _) = single_parameter(&[1], 0.0);
    let mut sgd = Sgd::new(groups, SgdConfig::default());
    assert_eq!(sgd.step().unwrap_err(), GradNetError::NotConnected);
}

#[test]
fn zero_grad_discards_all_graph_state() {
    let (groups, parameter) = single_parameter(&[1], 0.0);
    let mut sgd = Sgd::new(groups, SgdConfig::default());
    parameter.set_gradient(filled(&[1], 1.0));
    sgd.zero_grad();
    assert_eq!(
        parameter.gradient().unwrap_err(),
        GradNetError::NotConnected
    );
}
