//! Core library for the disease prediction API
//!
//! This crate provides the core functionality for:
//! - Model categories and wire types
//! - Decision-forest training and inference
//! - Model artifact storage
//! - Autism questionnaire feature adaptation
//! - Prediction dispatch and metrics

pub mod error;
pub mod features;
pub mod forest;
pub mod models;
pub mod observability;
pub mod registry;
pub mod store;
pub mod training;

pub use error::{DispatchError, PredictError, TrainError};
pub use forest::{ForestConfig, RandomForest};
pub use models::*;
pub use observability::ServerMetrics;
pub use registry::ModelRegistry;
pub use store::ModelStore;
