pub mod classifier;
pub mod params;

pub use classifier::{cross_entropy_softmax_loss, linear_classifier_accuracy, train_softmax_classifier, SoftmaxFit};
pub use params::{initial_parameters, param_count, SoftmaxParams};
