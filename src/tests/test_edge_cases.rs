use ndarray::array;

use super::fixtures::{scalar_params, Plant};
use crate::algorithms::DpgTrainer;
use crate::config::{CriticUpdate, DpgBuilder, NoiseScale};
use crate::error::DpgError;
use crate::metrics::TrainingHistory;

fn builder() -> DpgBuilder {
    DpgBuilder::new(1)
        .critic_update(CriticUpdate::Gradient)
        .noise(0.4)
        .step_sizes(0.1, 0.1, 0.1)
        .seed(5)
}

#[test]
fn test_invalid_config_runs_nothing() {
    let plant = Plant::new(10);
    let mut config = builder().build().unwrap();
    config.tau = 0.0;

    assert!(matches!(
        DpgTrainer::new(config, &plant),
        Err(DpgError::InvalidParameter { .. })
    ));
    assert_eq!(plant.simulations(), 0);
}

#[test]
fn test_empty_trajectory_is_rejected() {
    let plant = Plant::new(0);
    let config = builder().iters(3).build().unwrap();
    let result = DpgTrainer::new(config, &plant)
        .unwrap()
        .train(scalar_params(0.0, 0.0, 0.0), array![1.0].view(), &mut ());
    assert!(matches!(result, Err(DpgError::Collaborator(_))));
}

#[test]
fn test_single_step_trajectory_has_no_transitions() {
    let plant = Plant::new(1);
    let config = builder().iters(3).build().unwrap();
    let initial = scalar_params(0.3, 0.2, 0.1);
    let mut history = TrainingHistory::with_parameters();
    DpgTrainer::new(config, &plant)
        .unwrap()
        .train(initial.clone(), array![1.0].view(), &mut history)
        .unwrap();

    // nothing to learn from; only target tracking runs
    assert!(history.parameters.iter().all(|p| *p == initial));
}

#[test]
fn test_action_width_mismatch() {
    let mut plant = Plant::new(10);
    plant.action_width = 2;
    let config = builder().iters(3).build().unwrap();
    let result = DpgTrainer::new(config, &plant)
        .unwrap()
        .train(scalar_params(0.0, 0.0, 0.0), array![1.0].view(), &mut ());
    assert!(matches!(result, Err(DpgError::DimensionMismatch { .. })));
}

#[test]
fn test_gradient_shape_mismatch() {
    let plant = Plant::new(10);
    let config = builder().iters(3).build().unwrap();
    let initial = crate::state::Parameters::new(array![0.0], array![0.0], array![0.0, 0.0]);
    let result = DpgTrainer::new(config, &plant)
        .unwrap()
        .train(initial, array![1.0].view(), &mut ());
    assert!(matches!(result, Err(DpgError::DimensionMismatch { .. })));
}

#[test]
fn test_collaborator_failure_propagates() {
    let mut plant = Plant::new(10);
    plant.fail_exploration = true;
    let config = builder().iters(3).build().unwrap();
    let result = DpgTrainer::new(config, &plant)
        .unwrap()
        .train(scalar_params(0.0, 0.0, 0.0), array![1.0].view(), &mut ());
    assert!(matches!(result, Err(DpgError::Collaborator(_))));
    assert_eq!(plant.simulations(), 0);
}

#[test]
fn test_nan_evaluation_counts_as_divergence() {
    let mut plant = Plant::new(10);
    plant.poison_after = Some(1);
    let config = builder().iters(4).eval_interval(2).build().unwrap();
    let mut history = TrainingHistory::with_parameters();

    let result = DpgTrainer::new(config, &plant)
        .unwrap()
        .train(scalar_params(-0.2, 0.0, 0.0), array![1.0].view(), &mut history)
        .unwrap();

    assert_eq!(result.divergences, 2);
    assert!(result.best_cost.is_finite());
    assert_eq!(result.best, history.parameters[0]);

    let first = &history.divergences[0];
    assert_eq!(first.iteration, 2);
    assert_eq!(first.noise, NoiseScale::Scalar(0.2));
    assert!((first.steps.actor - 0.01).abs() < 1e-15);

    let second = &history.divergences[1];
    assert_eq!(second.noise, NoiseScale::Scalar(0.1));
    assert!((second.steps.actor - 0.001).abs() < 1e-15);
}
