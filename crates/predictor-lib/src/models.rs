//! Core data models for the prediction service

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Supported prediction categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Diabetes,
    Heart,
    Parkinsons,
    Autism,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Diabetes,
        Category::Heart,
        Category::Parkinsons,
        Category::Autism,
    ];

    /// Resolve a category from its URL path segment
    pub fn from_route(name: &str) -> Option<Self> {
        match name {
            "diabetes" => Some(Category::Diabetes),
            "heart" => Some(Category::Heart),
            "parkinsons" => Some(Category::Parkinsons),
            "autism" => Some(Category::Autism),
            _ => None,
        }
    }

    /// Name used in routes, logs and metric labels
    pub fn route_name(&self) -> &'static str {
        match self {
            Category::Diabetes => "diabetes",
            Category::Heart => "heart",
            Category::Parkinsons => "parkinsons",
            Category::Autism => "autism",
        }
    }

    /// File name of the serialized model artifact
    pub fn artifact_name(&self) -> &'static str {
        match self {
            Category::Diabetes => "diabetes_model.sav",
            Category::Heart => "heart_disease_model.sav",
            Category::Parkinsons => "parkinsons_model.sav",
            Category::Autism => "autism_model.sav",
        }
    }

    /// Human-readable result string for a predicted class
    pub fn result_label(&self, prediction: u8) -> &'static str {
        match self {
            Category::Autism => {
                if prediction == 1 {
                    "High Risk"
                } else {
                    "Low Risk"
                }
            }
            _ => {
                if prediction == 1 {
                    "Positive"
                } else {
                    "Negative"
                }
            }
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route_name())
    }
}

/// Body of a `POST /predict/{model}` request
///
/// All fields are optional: clients integrate in different styles (raw
/// feature vectors, the 20-question assessment, or a bare risk percentage),
/// and an absent or malformed body is treated as the empty request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<f64>>,

    /// Questionnaire answers keyed by question index ("0".."19"), 0-4 scale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answers: Option<HashMap<String, f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,

    #[serde(
        default,
        rename = "riskPercentage",
        skip_serializing_if = "Option::is_none"
    )]
    pub risk_percentage: Option<f64>,
}

/// A completed prediction, shaped for the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class, 0 or 1
    pub prediction: u8,
    /// Category-specific label for the predicted class
    pub result: String,
    /// Highest class probability, when the model exposes probabilities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Positive-class probability scaled to 0-100
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
}

/// Per-category model availability, as reported by `GET /`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelAvailability {
    pub diabetes: bool,
    pub heart: bool,
    pub parkinsons: bool,
    pub autism: bool,
}

/// Service status response for `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub models: ModelAvailability,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_resolution() {
        assert_eq!(Category::from_route("diabetes"), Some(Category::Diabetes));
        assert_eq!(Category::from_route("heart"), Some(Category::Heart));
        assert_eq!(Category::from_route("parkinsons"), Some(Category::Parkinsons));
        assert_eq!(Category::from_route("autism"), Some(Category::Autism));
        assert_eq!(Category::from_route("unknown"), None);
        assert_eq!(Category::from_route("Diabetes"), None);
    }

    #[test]
    fn test_result_labels() {
        assert_eq!(Category::Autism.result_label(1), "High Risk");
        assert_eq!(Category::Autism.result_label(0), "Low Risk");
        assert_eq!(Category::Diabetes.result_label(1), "Positive");
        assert_eq!(Category::Heart.result_label(0), "Negative");
    }

    #[test]
    fn test_request_accepts_partial_bodies() {
        let req: PredictRequest = serde_json::from_str(r#"{"riskPercentage": 75}"#).unwrap();
        assert_eq!(req.risk_percentage, Some(75.0));
        assert!(req.features.is_none());
        assert!(req.answers.is_none());

        let req: PredictRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(req.risk_percentage.is_none());
    }

    #[test]
    fn test_prediction_omits_absent_scores() {
        let p = Prediction {
            prediction: 1,
            result: "Positive".to_string(),
            confidence: None,
            risk_score: None,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("confidence").is_none());
        assert!(json.get("risk_score").is_none());
    }
}
