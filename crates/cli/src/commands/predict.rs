//! Prediction command

use anyhow::{bail, Result};
use std::collections::HashMap;

use crate::client::{ApiClient, PredictBody, PredictionResponse};
use crate::output::{color_result, format_confidence, print_info, OutputFormat};

/// Send one prediction request and display the outcome
pub async fn run_prediction(
    client: &ApiClient,
    model: &str,
    features: Option<Vec<f64>>,
    answers: Option<Vec<String>>,
    age: Option<f64>,
    risk: Option<f64>,
    format: OutputFormat,
) -> Result<()> {
    let body = PredictBody {
        features,
        answers: answers.map(|pairs| parse_answers(&pairs)).transpose()?,
        age,
        risk_percentage: risk,
    };

    let response: PredictionResponse = client.post(&format!("predict/{}", model), &body).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Table => {
            println!(
                "{}: {} (class {})",
                model,
                color_result(&response.result),
                response.prediction
            );
            if let Some(confidence) = response.confidence {
                print_info(&format!("confidence: {}", format_confidence(confidence)));
            }
            if let Some(risk_score) = response.risk_score {
                print_info(&format!("risk score: {:.1}", risk_score));
            }
        }
    }

    Ok(())
}

/// Parse `index=value` pairs into the wire answers map
fn parse_answers(pairs: &[String]) -> Result<HashMap<String, f64>> {
    let mut answers = HashMap::new();
    for pair in pairs {
        let Some((index, value)) = pair.split_once('=') else {
            bail!("invalid answer {pair:?}, expected index=value");
        };
        let index = index.trim();
        if index.parse::<usize>().is_err() {
            bail!("invalid question index {index:?}");
        }
        let value: f64 = value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid answer value in {pair:?}"))?;
        answers.insert(index.to_string(), value);
    }
    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_answers() {
        let answers = parse_answers(&strings(&["0=4", "1=3", "19=0"])).unwrap();
        assert_eq!(answers.len(), 3);
        assert_eq!(answers["0"], 4.0);
        assert_eq!(answers["19"], 0.0);
    }

    #[test]
    fn test_parse_answers_rejects_bad_pairs() {
        assert!(parse_answers(&strings(&["0:4"])).is_err());
        assert!(parse_answers(&strings(&["x=4"])).is_err());
        assert!(parse_answers(&strings(&["0=high"])).is_err());
    }
}
