use tracing::{debug, info};

use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;
use crate::optim::sgd::Sgd;
use crate::train::history::TrainHistory;
use crate::train::train_config::TrainConfig;

/// Trains `network` on one fixed batch for exactly `config.iterations` steps.
///
/// Every iteration runs the forward pass, records the loss, backpropagates
/// from the cross-entropy head to the first linear layer and applies one
/// gradient-descent step with `config.learning_rate`. There is no shuffling,
/// mini-batching or early stop.
pub fn train_loop(
    network: &mut Network,
    inputs: &Matrix,
    labels: &[usize],
    config: &TrainConfig,
) -> Result<TrainHistory> {
    if config.iterations == 0 {
        return Err(NnError::InvalidParameter("iterations must be at least 1".into()));
    }
    if !config.learning_rate.is_finite() {
        return Err(NnError::InvalidParameter(format!(
            "learning rate must be finite, got {}",
            config.learning_rate
        )));
    }
    let optimizer = Sgd::new(config.learning_rate);

    let mut history = TrainHistory { losses: Vec::with_capacity(config.iterations) };

    for iteration in 1..=config.iterations {
        let pass = network.forward(inputs)?;
        let loss = network.loss(&pass, labels)?;
        history.losses.push(loss);

        let grads = network.backward(&pass, labels)?;
        optimizer.step_network(network, &grads)?;

        if config.log_every > 0 && iteration % config.log_every == 0 {
            info!(iteration, loss, "gradient descent");
        } else {
            debug!(iteration, loss, "gradient descent");
        }
    }

    info!(
        iterations = config.iterations,
        first_loss = ?history.first(),
        last_loss = ?history.last(),
        "training finished"
    );

    Ok(history)
}
