//! Feature adaptation for the autism model
//!
//! The autism model has a fixed 11-feature contract (ten binarized item
//! scores plus an age value), but clients integrate in three styles: a
//! pre-built feature vector, the 20-question assessment, or a bare risk
//! percentage from legacy callers. This module normalizes all three onto the
//! canonical vector; first matching branch wins.

use std::collections::HashMap;

use crate::models::PredictRequest;

/// Questions in the assessment form
pub const QUESTION_COUNT: usize = 20;

/// Binarized item scores fed to the model (question pairs)
pub const ITEM_SCORE_COUNT: usize = 10;

/// Item scores plus the trailing age value
pub const AUTISM_FEATURE_COUNT: usize = 11;

/// Answer assumed for unanswered questions (2 = "sometimes" on the 0-4 scale)
pub const DEFAULT_ANSWER: f64 = 2.0;

/// Age used when the client supplies none
pub const DEFAULT_AGE: f64 = 30.0;

/// Pair averages above this binarize to 1 (concern)
pub const PAIR_CONCERN_THRESHOLD: f64 = 2.0;

/// Risk percentages above this fill all item scores in the fallback branch
pub const RISK_SPLIT_PERCENT: f64 = 50.0;

/// Build the canonical autism feature vector from a client request
pub fn adapt_autism_features(request: &PredictRequest) -> Vec<f64> {
    // Client already produced the canonical shape
    if let Some(features) = &request.features {
        if features.len() >= AUTISM_FEATURE_COUNT {
            return features.clone();
        }
    }

    match &request.answers {
        Some(answers) if !answers.is_empty() => {
            let mut features = item_scores_from_answers(answers);
            features.push(request.age.unwrap_or(DEFAULT_AGE));
            features
        }
        _ => risk_fallback_features(request.risk_percentage.unwrap_or(0.0)),
    }
}

/// Collapse the 20 answers into ten item scores: average question pairs
/// (0,1), (2,3), ... and binarize each average against the threshold
fn item_scores_from_answers(answers: &HashMap<String, f64>) -> Vec<f64> {
    let values: Vec<f64> = (0..QUESTION_COUNT)
        .map(|i| {
            answers
                .get(&i.to_string())
                .copied()
                .unwrap_or(DEFAULT_ANSWER)
        })
        .collect();

    (0..QUESTION_COUNT)
        .step_by(2)
        .map(|i| {
            let average = (values[i] + values[i + 1]) / 2.0;
            if average > PAIR_CONCERN_THRESHOLD {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Last resort for callers that only know a risk percentage
fn risk_fallback_features(risk_percentage: f64) -> Vec<f64> {
    let fill = if risk_percentage > RISK_SPLIT_PERCENT {
        1.0
    } else {
        0.0
    };
    let mut features = vec![fill; ITEM_SCORE_COUNT];
    features.push(DEFAULT_AGE);
    features
}
