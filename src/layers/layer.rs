use crate::activation::sigmoid::Sigmoid;
use crate::activation::softmax::Softmax;
use crate::error::Result;
use crate::layers::linear::{Linear, ParamGrads};
use crate::math::matrix::Matrix;

/// One stage of the network pipeline.
///
/// All variants share the `forward` / `backprop` contract: `backprop` takes the
/// same input `x` that was given to `forward` and the gradient of the loss with
/// respect to that forward output.
#[derive(Debug, Clone)]
pub enum Layer {
    Linear(Linear),
    Sigmoid(Sigmoid),
    Softmax(Softmax),
}

/// Result of `Layer::backprop`. `params` is only set for parameterised layers.
#[derive(Debug, Clone)]
pub struct LayerGrads {
    pub dldx: Matrix,
    pub params: Option<ParamGrads>,
}

impl Layer {
    pub fn forward(&self, x: &Matrix) -> Result<Matrix> {
        match self {
            Layer::Linear(l) => l.forward(x),
            Layer::Sigmoid(s) => Ok(s.forward(x)),
            Layer::Softmax(s) => Ok(s.forward(x)),
        }
    }

    pub fn backprop(&self, x: &Matrix, dldy: &Matrix) -> Result<LayerGrads> {
        match self {
            Layer::Linear(l) => {
                let (params, dldx) = l.backprop(x, dldy)?.into_parts();
                Ok(LayerGrads { dldx, params: Some(params) })
            }
            Layer::Sigmoid(s) => Ok(LayerGrads { dldx: s.backprop(x, dldy)?, params: None }),
            Layer::Softmax(s) => Ok(LayerGrads { dldx: s.backprop(x, dldy)?, params: None }),
        }
    }

    /// Raw additive update; a no-op for stateless layers.
    pub fn update_weights(&mut self, grads: &ParamGrads) -> Result<()> {
        match self {
            Layer::Linear(l) => l.update_weights(&grads.dldw, &grads.dldb),
            Layer::Sigmoid(_) | Layer::Softmax(_) => Ok(()),
        }
    }

    pub fn as_linear(&self) -> Option<&Linear> {
        match self {
            Layer::Linear(l) => Some(l),
            _ => None,
        }
    }
}

impl From<Linear> for Layer {
    fn from(l: Linear) -> Self {
        Layer::Linear(l)
    }
}

impl From<Sigmoid> for Layer {
    fn from(s: Sigmoid) -> Self {
        Layer::Sigmoid(s)
    }
}

impl From<Softmax> for Layer {
    fn from(s: Softmax) -> Self {
        Layer::Softmax(s)
    }
}
