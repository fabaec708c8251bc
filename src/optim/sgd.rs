use crate::error::Result;
use crate::layers::layer::Layer;
use crate::layers::linear::ParamGrads;
use crate::network::network::Network;

/// Plain gradient descent: θ ← θ - lr·∂L/∂θ.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Scales the gradients by `-learning_rate` and hands them to the layer's
    /// raw additive update.
    pub fn step(&self, layer: &mut Layer, grads: &ParamGrads) -> Result<()> {
        let scaled = ParamGrads {
            dldw: grads.dldw.scale(-self.learning_rate),
            dldb: grads.dldb.scale(-self.learning_rate),
        };
        layer.update_weights(&scaled)
    }

    /// One descent step on every parameterised layer of `network`.
    pub fn step_network(&self, network: &mut Network, grads: &[Option<ParamGrads>]) -> Result<()> {
        network.update_each(grads, |layer, g| self.step(layer, g))
    }
}
