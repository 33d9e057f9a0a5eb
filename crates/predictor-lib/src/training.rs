//! One-time training fallback for the autism model
//!
//! Runs at startup when no autism artifact exists. Reads the labeled
//! assessment dataset, cleans it, fits the forest with a fixed seed, and
//! persists the artifact so later starts skip training. Every failure mode
//! here is contained: the entry point logs the reason and reports the model
//! absent, and the process serves the remaining categories.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::TrainError;
use crate::features::AUTISM_FEATURE_COUNT;
use crate::forest::{ForestConfig, RandomForest};
use crate::models::Category;
use crate::store::ModelStore;

/// Item-score columns, in model feature order
const SCORE_COLUMNS: [&str; 10] = [
    "A1_Score", "A2_Score", "A3_Score", "A4_Score", "A5_Score", "A6_Score", "A7_Score",
    "A8_Score", "A9_Score", "A10_Score",
];

const AGE_COLUMN: &str = "age";

/// Label column candidates, tried in order; the first present wins
const LABEL_COLUMNS: [&str; 4] = ["Class/ASD", "ASD", "result", "Class"];

/// Minimum usable rows to trust a fit
const MIN_TRAINING_ROWS: usize = 10;

/// Train the autism model from the dataset and persist the artifact
///
/// Returns `None` when the dataset is missing, unusable, or too small; the
/// reason is logged here and nowhere else. A fitted model that fails to
/// persist is still returned and served from memory.
pub fn train_autism_model(dataset_path: &Path, store: &ModelStore) -> Option<RandomForest> {
    match fit_from_dataset(dataset_path) {
        Ok(model) => {
            match store.save(Category::Autism, &model) {
                Ok(()) => info!(
                    path = %store.artifact_path(Category::Autism).display(),
                    "Autism model trained and persisted"
                ),
                Err(err) => warn!(
                    error = %err,
                    "Trained autism model could not be persisted, serving from memory"
                ),
            }
            Some(model)
        }
        Err(err) => {
            warn!(path = %dataset_path.display(), error = %err, "Autism model training skipped");
            None
        }
    }
}

fn fit_from_dataset(path: &Path) -> Result<RandomForest, TrainError> {
    let raw = fs::read_to_string(path)?;
    let (x, y) = prepare_training_data(&raw)?;
    // Bounded depth and split/leaf floors against overfitting a small table;
    // the fixed seed makes the fit reproducible for identical input data.
    RandomForest::fit(&ForestConfig::default(), &x, &y)
}

/// Clean the raw CSV into feature rows and binary labels
///
/// Rows with missing or unparseable item scores or labels are dropped.
/// Missing ages drop the row as well, but a non-empty age that fails to
/// parse (the dataset marks unknown ages with `?`) is imputed with the mean
/// of the parseable ages.
fn prepare_training_data(raw: &str) -> Result<(Vec<Vec<f64>>, Vec<u8>), TrainError> {
    let mut lines = raw.lines();
    let header = lines.next().ok_or(TrainError::BadTrainingData)?;
    let columns: Vec<String> = split_record(header)
        .into_iter()
        .map(|c| c.trim().to_string())
        .collect();

    let score_idx: Vec<usize> = SCORE_COLUMNS
        .iter()
        .map(|name| find_column(&columns, name))
        .collect::<Result<_, _>>()?;
    let age_idx = find_column(&columns, AGE_COLUMN)?;
    let label_idx = LABEL_COLUMNS
        .iter()
        .find_map(|name| columns.iter().position(|c| c == name))
        .ok_or(TrainError::NoLabelColumn)?;

    let width_needed = score_idx
        .iter()
        .copied()
        .chain([age_idx, label_idx])
        .max()
        .unwrap_or(0)
        + 1;

    let mut rows: Vec<(Vec<f64>, Option<f64>, u8)> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let fields = split_record(line);
        if fields.len() < width_needed {
            continue;
        }

        let mut scores = Vec::with_capacity(SCORE_COLUMNS.len());
        let mut usable = true;
        for &idx in &score_idx {
            match parse_number(&fields[idx]) {
                Some(value) => scores.push(value),
                None => {
                    usable = false;
                    break;
                }
            }
        }
        if !usable {
            continue;
        }

        let age_cell = fields[age_idx].trim();
        if age_cell.is_empty() {
            continue;
        }
        let age = parse_number(age_cell);

        let label = match parse_label(&fields[label_idx]) {
            Some(label) => label,
            None => continue,
        };

        rows.push((scores, age, label));
    }

    if rows.len() < MIN_TRAINING_ROWS {
        return Err(TrainError::TooFewRows(rows.len(), MIN_TRAINING_ROWS));
    }

    let parsed_ages: Vec<f64> = rows.iter().filter_map(|(_, age, _)| *age).collect();
    if parsed_ages.is_empty() {
        return Err(TrainError::NoNumericAges);
    }
    let mean_age = parsed_ages.iter().sum::<f64>() / parsed_ages.len() as f64;

    let mut x = Vec::with_capacity(rows.len());
    let mut y = Vec::with_capacity(rows.len());
    for (mut scores, age, label) in rows {
        scores.push(age.unwrap_or(mean_age));
        debug_assert_eq!(scores.len(), AUTISM_FEATURE_COUNT);
        x.push(scores);
        y.push(label);
    }
    Ok((x, y))
}

fn find_column(columns: &[String], name: &str) -> Result<usize, TrainError> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| TrainError::MissingColumn(name.to_string()))
}

/// Split one CSV record, honoring double-quoted fields
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Binary label from a dataset cell: numeric (nonzero = positive) or yes/no
fn parse_label(cell: &str) -> Option<u8> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Some(value) = parse_number(cell) {
        return Some(u8::from(value != 0.0));
    }
    match cell.to_ascii_lowercase().as_str() {
        "yes" => Some(1),
        "no" => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "id,A1_Score,A2_Score,A3_Score,A4_Score,A5_Score,A6_Score,A7_Score,A8_Score,A9_Score,A10_Score,age,gender,Class/ASD";

    fn row(id: usize, score: u8, age: &str, label: &str) -> String {
        let scores = vec![score.to_string(); 10].join(",");
        format!("{id},{scores},{age},m,{label}")
    }

    /// Ten clearly positive and ten clearly negative respondents
    fn usable_dataset() -> String {
        let mut lines = vec![HEADER.to_string()];
        for i in 0..10 {
            lines.push(row(i, 1, "21", "YES"));
            lines.push(row(100 + i, 0, "35", "NO"));
        }
        lines.join("\n")
    }

    fn write_dataset(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("autism.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_training_fits_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("models"));
        let dataset = write_dataset(&dir, &usable_dataset());

        let model = train_autism_model(&dataset, &store).unwrap();
        assert_eq!(model.n_features(), AUTISM_FEATURE_COUNT);
        assert!(store.artifact_path(Category::Autism).exists());

        // Subsequent starts load the artifact instead of retraining
        let reloaded = store.load(Category::Autism).unwrap();
        let probe = vec![1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 21.0];
        assert_eq!(
            reloaded.predict(&probe).unwrap(),
            model.predict(&probe).unwrap()
        );
    }

    #[test]
    fn test_training_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let dataset = write_dataset(&dir, &usable_dataset());

        let a = fit_from_dataset(&dataset).unwrap();
        let b = fit_from_dataset(&dataset).unwrap();

        let held_out = vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 28.0];
        assert_eq!(
            a.predict_proba(&held_out).unwrap(),
            b.predict_proba(&held_out).unwrap()
        );
    }

    #[test]
    fn test_learns_the_score_signal() {
        let dir = TempDir::new().unwrap();
        let dataset = write_dataset(&dir, &usable_dataset());
        let model = fit_from_dataset(&dataset).unwrap();

        let positive = vec![1.0; 10].into_iter().chain([21.0]).collect::<Vec<_>>();
        let negative = vec![0.0; 10].into_iter().chain([35.0]).collect::<Vec<_>>();
        assert_eq!(model.predict(&positive).unwrap(), 1);
        assert_eq!(model.predict(&negative).unwrap(), 0);
    }

    #[test]
    fn test_missing_dataset_returns_absent() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("models"));
        assert!(train_autism_model(&dir.path().join("absent.csv"), &store).is_none());
    }

    #[test]
    fn test_too_few_rows_returns_absent() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("models"));
        let mut lines = vec![HEADER.to_string()];
        for i in 0..4 {
            lines.push(row(i, 1, "20", "YES"));
            lines.push(row(10 + i, 0, "30", "NO"));
        }
        let dataset = write_dataset(&dir, &lines.join("\n"));
        assert!(train_autism_model(&dataset, &store).is_none());
    }

    #[test]
    fn test_missing_label_column_returns_absent() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("models"));
        let header = HEADER.replace(",Class/ASD", ",outcome");
        let mut lines = vec![header];
        for i in 0..20 {
            lines.push(row(i, (i % 2) as u8, "25", "YES"));
        }
        let dataset = write_dataset(&dir, &lines.join("\n"));
        assert!(train_autism_model(&dataset, &store).is_none());
    }

    #[test]
    fn test_alternate_label_column_is_accepted() {
        let header = HEADER.replace("Class/ASD", "result");
        let mut lines = vec![header];
        for i in 0..10 {
            lines.push(row(i, 1, "21", "1"));
            lines.push(row(100 + i, 0, "35", "0"));
        }
        let (x, y) = prepare_training_data(&lines.join("\n")).unwrap();
        assert_eq!(x.len(), 20);
        assert_eq!(y.iter().filter(|&&l| l == 1).count(), 10);
    }

    #[test]
    fn test_first_label_candidate_wins() {
        // "result" also present, but Class/ASD is earlier in the candidate
        // list and must supply the labels
        let header = format!("{HEADER},result");
        let mut lines = vec![header];
        for i in 0..10 {
            lines.push(format!("{},0", row(i, 1, "21", "YES")));
            lines.push(format!("{},1", row(100 + i, 0, "35", "NO")));
        }
        let (_, y) = prepare_training_data(&lines.join("\n")).unwrap();
        assert_eq!(y.iter().filter(|&&l| l == 1).count(), 10);
        assert_eq!(y[0], 1);
    }

    #[test]
    fn test_unknown_ages_are_imputed_with_mean() {
        let mut lines = vec![HEADER.to_string()];
        for i in 0..10 {
            lines.push(row(i, 1, "20", "YES"));
            lines.push(row(100 + i, 0, "40", "NO"));
        }
        lines.push(row(200, 1, "?", "YES"));

        let (x, _) = prepare_training_data(&lines.join("\n")).unwrap();
        assert_eq!(x.len(), 21);
        // Mean of ten 20s and ten 40s
        assert!((x[20][10] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_rows_with_missing_values_are_dropped() {
        let mut lines = vec![HEADER.to_string()];
        for i in 0..10 {
            lines.push(row(i, 1, "21", "YES"));
            lines.push(row(100 + i, 0, "35", "NO"));
        }
        lines.push("300,1,1,,1,1,1,1,1,1,1,25,m,YES".to_string()); // missing score
        lines.push(row(301, 1, "", "YES")); // missing age
        lines.push(row(302, 1, "25", "")); // missing label

        let (x, _) = prepare_training_data(&lines.join("\n")).unwrap();
        assert_eq!(x.len(), 20);
    }

    #[test]
    fn test_quoted_fields_do_not_shift_columns() {
        assert_eq!(
            split_record(r#"1,"Baa, Atoll",0"#),
            vec!["1", "Baa, Atoll", "0"]
        );
    }

    #[test]
    fn test_label_parsing() {
        assert_eq!(parse_label("YES"), Some(1));
        assert_eq!(parse_label("no"), Some(0));
        assert_eq!(parse_label("1"), Some(1));
        assert_eq!(parse_label("0"), Some(0));
        assert_eq!(parse_label("maybe"), None);
        assert_eq!(parse_label(" "), None);
    }
}
