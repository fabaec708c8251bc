use rand::Rng;

use crate::activation::sigmoid::Sigmoid;
use crate::activation::softmax::Softmax;
use crate::error::{NnError, Result};
use crate::layers::layer::Layer;
use crate::layers::linear::{Linear, ParamGrads};
use crate::loss::cross_entropy::CrossEntropy;
use crate::math::matrix::Matrix;
use crate::metrics;
use crate::network::spec::NetworkSpec;

/// Linear → Sigmoid → Linear → Softmax, with a cross-entropy loss head.
#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    loss: CrossEntropy,
}

/// Cached activations of one forward pass.
///
/// `inputs[i]` is the batch that was fed to layer `i`; backprop for layer `i`
/// needs exactly that batch.
#[derive(Debug, Clone)]
pub struct ForwardPass {
    pub inputs: Vec<Matrix>,
    pub probabilities: Matrix,
}

impl Network {
    pub fn new<R: Rng + ?Sized>(spec: &NetworkSpec, rng: &mut R) -> Result<Network> {
        if spec.num_class == 0 {
            return Err(NnError::InvalidParameter("num_class must be at least 1".into()));
        }
        let hidden = Linear::new(spec.input_size, spec.hidden_size, spec.init_std, rng)?;
        let output = Linear::new(spec.hidden_size, spec.num_class, spec.init_std, rng)?;
        Ok(Network::from_linear(hidden, output))
    }

    /// Assembles the fixed pipeline around two existing linear layers.
    pub fn from_linear(hidden: Linear, output: Linear) -> Network {
        Network {
            layers: vec![
                hidden.into(),
                Sigmoid.into(),
                output.into(),
                Softmax.into(),
            ],
            loss: CrossEntropy,
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Runs every layer in order. Parameters are not touched.
    pub fn forward(&self, x: &Matrix) -> Result<ForwardPass> {
        let mut inputs = Vec::with_capacity(self.layers.len());
        let mut current = x.clone();
        for layer in &self.layers {
            let next = layer.forward(&current)?;
            inputs.push(current);
            current = next;
        }
        Ok(ForwardPass { inputs, probabilities: current })
    }

    pub fn loss(&self, pass: &ForwardPass, labels: &[usize]) -> Result<f64> {
        self.loss.forward(&pass.probabilities, labels)
    }

    /// Threads the gradient from the loss head back to the first layer.
    /// Returns one entry per layer, `Some` for layers with parameters.
    pub fn backward(&self, pass: &ForwardPass, labels: &[usize]) -> Result<Vec<Option<ParamGrads>>> {
        let mut grads = vec![None; self.layers.len()];
        let mut dldy = self.loss.backprop(&pass.probabilities, labels)?;

        for (i, layer) in self.layers.iter().enumerate().rev() {
            let step = layer.backprop(&pass.inputs[i], &dldy)?;
            grads[i] = step.params;
            dldy = step.dldx;
        }

        Ok(grads)
    }

    /// Applies `f` to every layer paired with its gradient, if any.
    pub(crate) fn update_each<F>(&mut self, grads: &[Option<ParamGrads>], mut f: F) -> Result<()>
    where
        F: FnMut(&mut Layer, &ParamGrads) -> Result<()>,
    {
        if grads.len() != self.layers.len() {
            return Err(NnError::ShapeMismatch {
                op: "network_update",
                left: (self.layers.len(), 1),
                right: (grads.len(), 1),
            });
        }
        for (layer, g) in self.layers.iter_mut().zip(grads.iter()) {
            if let Some(g) = g {
                f(layer, g)?;
            }
        }
        Ok(())
    }

    /// Argmax of the softmax output for each row of `x`.
    pub fn predict(&self, x: &Matrix) -> Result<Vec<usize>> {
        Ok(self.forward(x)?.probabilities.argmax_rows())
    }

    pub fn accuracy(&self, x: &Matrix, labels: &[usize]) -> Result<f64> {
        metrics::accuracy(&self.predict(x)?, labels)
    }
}
