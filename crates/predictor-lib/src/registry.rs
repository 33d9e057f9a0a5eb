//! Model registry and prediction dispatch
//!
//! The registry is the single owner of every loaded model. It is built once
//! at startup, before the listener accepts connections, and never mutated
//! afterwards, so handlers can share it freely behind an `Arc`.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::error::DispatchError;
use crate::features::adapt_autism_features;
use crate::forest::RandomForest;
use crate::models::{Category, ModelAvailability, PredictRequest, Prediction, StatusResponse};
use crate::store::ModelStore;
use crate::training;

pub struct ModelRegistry {
    models: HashMap<Category, RandomForest>,
}

impl ModelRegistry {
    /// Load every category's artifact; train the autism model when absent
    pub fn initialize(store: &ModelStore, dataset_path: &Path) -> Self {
        let mut models = HashMap::new();
        for category in Category::ALL {
            if let Some(model) = store.load(category) {
                models.insert(category, model);
            }
        }
        if !models.contains_key(&Category::Autism) {
            if let Some(model) = training::train_autism_model(dataset_path, store) {
                models.insert(Category::Autism, model);
            }
        }

        let registry = Self { models };
        for category in Category::ALL {
            info!(
                model = %category,
                loaded = registry.is_available(category),
                "Model availability"
            );
        }
        registry
    }

    /// Build a registry from already-fitted models
    pub fn with_models(models: HashMap<Category, RandomForest>) -> Self {
        Self { models }
    }

    pub fn is_available(&self, category: Category) -> bool {
        self.models.contains_key(&category)
    }

    pub fn availability(&self) -> ModelAvailability {
        ModelAvailability {
            diabetes: self.is_available(Category::Diabetes),
            heart: self.is_available(Category::Heart),
            parkinsons: self.is_available(Category::Parkinsons),
            autism: self.is_available(Category::Autism),
        }
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            status: "running".to_string(),
            models: self.availability(),
        }
    }

    /// Route a request to its category's model and shape the result
    pub fn predict(
        &self,
        category: Category,
        request: &PredictRequest,
    ) -> Result<Prediction, DispatchError> {
        let model = self
            .models
            .get(&category)
            .ok_or(DispatchError::ModelUnavailable)?;

        match category {
            Category::Autism => Self::predict_autism(model, request),
            _ => Self::predict_with_features(category, model, request),
        }
    }

    /// Autism accepts adapted input and always reports probability scores
    fn predict_autism(
        model: &RandomForest,
        request: &PredictRequest,
    ) -> Result<Prediction, DispatchError> {
        let features = adapt_autism_features(request);
        let label = model
            .predict(&features)
            .map_err(|err| DispatchError::Prediction(err.to_string()))?;
        let proba = model
            .predict_proba(&features)
            .map_err(|err| DispatchError::Prediction(err.to_string()))?;

        Ok(Prediction {
            prediction: label,
            result: Category::Autism.result_label(label).to_string(),
            confidence: Some(proba[0].max(proba[1])),
            risk_score: Some(proba[1] * 100.0),
        })
    }

    /// Other categories require the client to supply the trained-width vector
    fn predict_with_features(
        category: Category,
        model: &RandomForest,
        request: &PredictRequest,
    ) -> Result<Prediction, DispatchError> {
        let features = request
            .features
            .as_deref()
            .filter(|features| !features.is_empty())
            .ok_or(DispatchError::MissingFeatures)?;

        let label = model
            .predict(features)
            .map_err(|err| DispatchError::Prediction(err.to_string()))?;

        Ok(Prediction {
            prediction: label,
            result: category.result_label(label).to_string(),
            confidence: None,
            risk_score: None,
        })
    }
}
