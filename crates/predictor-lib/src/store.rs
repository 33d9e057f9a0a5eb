//! Model artifact storage
//!
//! Serialized models live under a single models directory, one file per
//! category, named by convention (`diabetes_model.sav`, ...). Artifacts are
//! trusted local data produced by this service's own training step; there is
//! no integrity validation beyond decoding.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::TrainError;
use crate::forest::RandomForest;
use crate::models::Category;

/// Loads and persists serialized model artifacts
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Canonical artifact path for a category
    pub fn artifact_path(&self, category: Category) -> PathBuf {
        self.dir.join(category.artifact_name())
    }

    /// Load a category's model, or `None` when no usable artifact exists
    ///
    /// A missing file is the normal "not provisioned" case and is not an
    /// error. An artifact that exists but cannot be read or decoded is
    /// logged and reported absent.
    pub fn load(&self, category: Category) -> Option<RandomForest> {
        let path = self.artifact_path(category);
        if !path.exists() {
            return None;
        }

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(model = %category, path = %path.display(), error = %err, "Failed to read model artifact");
                return None;
            }
        };
        match bincode::deserialize(&bytes) {
            Ok(model) => {
                debug!(model = %category, path = %path.display(), "Loaded model artifact");
                Some(model)
            }
            Err(err) => {
                warn!(model = %category, path = %path.display(), error = %err, "Failed to decode model artifact");
                None
            }
        }
    }

    /// Persist a model to its canonical artifact path
    pub fn save(&self, category: Category, model: &RandomForest) -> Result<(), TrainError> {
        fs::create_dir_all(&self.dir).map_err(TrainError::Persist)?;
        let bytes = bincode::serialize(model)
            .map_err(|err| TrainError::Persist(to_io_error(err)))?;
        fs::write(self.artifact_path(category), bytes).map_err(TrainError::Persist)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn to_io_error(err: bincode::Error) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::{ForestConfig, RandomForest};
    use tempfile::TempDir;

    fn trained_model() -> RandomForest {
        let mut x = Vec::new();
        let mut y = Vec::new();
        for i in 0..15 {
            x.push(vec![i as f64]);
            y.push(u8::from(i >= 8));
        }
        let config = ForestConfig {
            n_trees: 5,
            ..ForestConfig::default()
        };
        RandomForest::fit(&config, &x, &y).unwrap()
    }

    #[test]
    fn test_missing_artifact_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path());
        assert!(store.load(Category::Diabetes).is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path());
        let model = trained_model();

        store.save(Category::Autism, &model).unwrap();
        assert!(store.artifact_path(Category::Autism).exists());

        let loaded = store.load(Category::Autism).unwrap();
        assert_eq!(loaded.n_features(), model.n_features());
        assert_eq!(
            loaded.predict(&[12.0]).unwrap(),
            model.predict(&[12.0]).unwrap()
        );
    }

    #[test]
    fn test_corrupt_artifact_is_absent() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path());

        std::fs::write(store.artifact_path(Category::Heart), b"not a model").unwrap();
        assert!(store.load(Category::Heart).is_none());
    }

    #[test]
    fn test_save_creates_models_dir() {
        let dir = TempDir::new().unwrap();
        let store = ModelStore::new(dir.path().join("nested").join("models"));

        store.save(Category::Parkinsons, &trained_model()).unwrap();
        assert!(store.load(Category::Parkinsons).is_some());
    }
}
