// Tests for network assembly: cached forward pass, backward pass through the
// whole pipeline, and the gradient-descent step.

mod common;

use common::*;
use ferrite_backprop::layers::Layer;
use ferrite_backprop::{Linear, Matrix, Network, NetworkSpec, NnError, Sgd};

fn small_network(seed: u64) -> Network {
    let mut rng = rng(seed);
    Network::new(&NetworkSpec::default(), &mut rng).unwrap()
}

fn linear_at(network: &Network, index: usize) -> Linear {
    network.layers()[index].as_linear().unwrap().clone()
}

fn loss_with(hidden: Linear, output: Linear, x: &Matrix, labels: &[usize]) -> f64 {
    let net = Network::from_linear(hidden, output);
    let pass = net.forward(x).unwrap();
    net.loss(&pass, labels).unwrap()
}

#[test]
fn pipeline_order_is_fixed() {
    let net = small_network(1);
    assert_pipeline_shape(&net);
    assert_eq!(linear_at(&net, 0).weights().shape(), (4, 2));
    assert_eq!(linear_at(&net, 2).weights().shape(), (2, 4));
}

fn assert_pipeline_shape(net: &Network) {
    let layers = net.layers();
    assert_eq!(layers.len(), 4);
    assert!(matches!(layers[0], Layer::Linear(_)));
    assert!(matches!(layers[1], Layer::Sigmoid(_)));
    assert!(matches!(layers[2], Layer::Linear(_)));
    assert!(matches!(layers[3], Layer::Softmax(_)));
}

#[test]
fn descent_steps_keep_the_pipeline_shape() {
    let mut net = small_network(10);
    let x = matrix(vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![1.0, 0.0]]);
    let labels = [0, 0, 1, 1];
    for _ in 0..3 {
        let grads = net.backward(&net.forward(&x).unwrap(), &labels).unwrap();
        Sgd::new(0.5).step_network(&mut net, &grads).unwrap();
    }
    assert_pipeline_shape(&net);
    assert_eq!(linear_at(&net, 0).weights().shape(), (4, 2));
    assert_eq!(linear_at(&net, 2).biases().shape(), (1, 2));
    assert_eq!(net.forward(&x).unwrap().probabilities.shape(), (4, 2));
}

#[test]
fn step_with_too_few_gradients_is_rejected() {
    let mut net = small_network(11);
    let x = matrix(vec![vec![0.0, 1.0]]);
    let grads = net.backward(&net.forward(&x).unwrap(), &[1]).unwrap();
    let result = Sgd::new(0.1).step_network(&mut net, &grads[..2]);
    assert!(matches!(result, Err(NnError::ShapeMismatch { op: "network_update", .. })));
    assert_pipeline_shape(&net);
}

#[test]
fn forward_caches_every_layer_input() {
    let net = small_network(2);
    let mut rng = rng(20);
    let x = random_matrix(6, 2, &mut rng);
    let pass = net.forward(&x).unwrap();

    let shapes: Vec<_> = pass.inputs.iter().map(|m| m.shape()).collect();
    assert_eq!(shapes, vec![(6, 2), (6, 4), (6, 4), (6, 2)]);
    assert_eq!(pass.inputs[0], x);
    assert_eq!(pass.probabilities.shape(), (6, 2));
}

#[test]
fn forward_is_idempotent() {
    let net = small_network(3);
    let mut rng = rng(30);
    let x = random_matrix(4, 2, &mut rng);
    let a = net.forward(&x).unwrap();
    let b = net.forward(&x).unwrap();
    assert_eq!(a.probabilities, b.probabilities);
    assert_eq!(a.inputs, b.inputs);
}

#[test]
fn backward_yields_parameter_gradients_only_for_linear_layers() {
    let net = small_network(4);
    let x = matrix(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]]);
    let labels = [0, 1, 1];
    let grads = net.backward(&net.forward(&x).unwrap(), &labels).unwrap();

    assert_eq!(grads.len(), 4);
    assert!(grads[1].is_none() && grads[3].is_none());
    let g0 = grads[0].as_ref().unwrap();
    let g2 = grads[2].as_ref().unwrap();
    assert_eq!(g0.dldw.shape(), (4, 2));
    assert_eq!(g0.dldb.shape(), (1, 4));
    assert_eq!(g2.dldw.shape(), (2, 4));
    assert_eq!(g2.dldb.shape(), (1, 2));
}

#[test]
fn end_to_end_gradients_match_finite_differences() {
    let net = small_network(5);
    let mut rng = rng(50);
    let x = random_matrix(8, 2, &mut rng);
    let labels = [0, 1, 1, 0, 1, 0, 0, 1];
    let grads = net.backward(&net.forward(&x).unwrap(), &labels).unwrap();

    let hidden = linear_at(&net, 0);
    let output = linear_at(&net, 2);

    let numeric_w1 = numerical_gradient(
        |w| {
            let h = Linear::from_parameters(w.clone(), hidden.biases().clone()).unwrap();
            loss_with(h, output.clone(), &x, &labels)
        },
        hidden.weights(),
    );
    let numeric_b1 = numerical_gradient(
        |b| {
            let h = Linear::from_parameters(hidden.weights().clone(), b.clone()).unwrap();
            loss_with(h, output.clone(), &x, &labels)
        },
        hidden.biases(),
    );
    let numeric_w2 = numerical_gradient(
        |w| {
            let o = Linear::from_parameters(w.clone(), output.biases().clone()).unwrap();
            loss_with(hidden.clone(), o, &x, &labels)
        },
        output.weights(),
    );
    let numeric_b2 = numerical_gradient(
        |b| {
            let o = Linear::from_parameters(output.weights().clone(), b.clone()).unwrap();
            loss_with(hidden.clone(), o, &x, &labels)
        },
        output.biases(),
    );

    let g0 = grads[0].as_ref().unwrap();
    let g2 = grads[2].as_ref().unwrap();
    assert_matrix_close(&g0.dldw, &numeric_w1, 1e-5);
    assert_matrix_close(&g0.dldb, &numeric_b1, 1e-5);
    assert_matrix_close(&g2.dldw, &numeric_w2, 1e-5);
    assert_matrix_close(&g2.dldb, &numeric_b2, 1e-5);
}

#[test]
fn sgd_step_subtracts_scaled_gradient() {
    let mut net = small_network(6);
    let x = matrix(vec![vec![0.0, 1.0], vec![1.0, 1.0]]);
    let labels = [1, 0];
    let grads = net.backward(&net.forward(&x).unwrap(), &labels).unwrap();
    let before = linear_at(&net, 2);
    let lr = 0.1;

    Sgd::new(lr).step_network(&mut net, &grads).unwrap();

    let after = linear_at(&net, 2);
    let g2 = grads[2].as_ref().unwrap();
    let expected_w = before.weights().sub(&g2.dldw.scale(lr)).unwrap();
    let expected_b = before.biases().sub(&g2.dldb.scale(lr)).unwrap();
    assert_matrix_close(after.weights(), &expected_w, 1e-15);
    assert_matrix_close(after.biases(), &expected_b, 1e-15);
}

#[test]
fn one_small_step_lowers_the_loss() {
    let mut net = small_network(7);
    let x = matrix(vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![1.0, 0.0]]);
    let labels = [0, 0, 1, 1];
    let pass = net.forward(&x).unwrap();
    let before = net.loss(&pass, &labels).unwrap();
    let grads = net.backward(&pass, &labels).unwrap();

    Sgd::new(1e-3).step_network(&mut net, &grads).unwrap();

    let after = net.loss(&net.forward(&x).unwrap(), &labels).unwrap();
    assert!(after < before, "loss went from {} to {}", before, after);
}

#[test]
fn predictions_are_argmax_of_probabilities() {
    let net = small_network(8);
    let mut rng = rng(80);
    let x = random_matrix(10, 2, &mut rng);
    let probs = net.forward(&x).unwrap().probabilities;
    let predicted = net.predict(&x).unwrap();
    for (row, &p) in probs.data.iter().zip(predicted.iter()) {
        assert!(row[p] >= row[1 - p]);
    }
}

#[test]
fn wrong_feature_count_propagates_shape_mismatch() {
    let net = small_network(9);
    let x = Matrix::zeros(3, 5);
    assert!(matches!(net.forward(&x), Err(NnError::ShapeMismatch { .. })));
}

#[test]
fn zero_classes_is_rejected() {
    let spec = NetworkSpec { num_class: 0, ..NetworkSpec::default() };
    assert!(Network::new(&spec, &mut rng(0)).is_err());
}
