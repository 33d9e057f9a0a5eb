//! Error types for prediction, dispatch and training

use thiserror::Error;

/// Failure while running inference on a loaded model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error("input has {got} features, model expects {expected}")]
    FeatureCount { got: usize, expected: usize },
}

/// Failure while handling a prediction request
///
/// Each variant maps to one HTTP status: `ModelUnavailable` and `Prediction`
/// are server errors, `MissingFeatures` is a client error. The display
/// strings are the wire-visible `error` bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Model not available on server.")]
    ModelUnavailable,
    #[error("Features missing")]
    MissingFeatures,
    #[error("Prediction error: {0}. Please check your input features.")]
    Prediction(String),
}

/// Failure while training the autism model
///
/// Never reaches a client: the training entry point logs the error and
/// reports the model absent.
#[derive(Debug, Error)]
pub enum TrainError {
    #[error("failed to read dataset: {0}")]
    Dataset(#[from] std::io::Error),
    #[error("dataset is missing required column {0:?}")]
    MissingColumn(String),
    #[error("no label column found in dataset")]
    NoLabelColumn,
    #[error("only {0} usable rows after cleaning, need at least {1}")]
    TooFewRows(usize, usize),
    #[error("age column has no numeric values")]
    NoNumericAges,
    #[error("failed to persist model artifact: {0}")]
    Persist(#[source] std::io::Error),
    #[error("training data contains a single class")]
    SingleClass,
    #[error("training data is empty or inconsistent")]
    BadTrainingData,
}
