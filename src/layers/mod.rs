pub mod layer;
pub mod linear;

pub use layer::{Layer, LayerGrads};
pub use linear::{Linear, LinearGrads, ParamGrads};
