use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::linear::LinearRegressor;
use crate::Regressor;

#[derive(thiserror::Error, Debug)]
pub enum ModelLoadError {
    #[error("cannot read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported model format version {0}")]
    UnsupportedVersion(u32),
    #[error("model references unknown feature column {0:?}")]
    UnknownColumn(String),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
}

pub fn try_load_model(path: impl AsRef<Path>) -> Result<Arc<dyn Regressor>, ModelLoadError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let model = LinearRegressor::from_json_str(&text)?;
    Ok(Arc::new(model))
}

/// Loads a regressor, or `None` when the artifact is missing or unusable.
pub fn load_model(path: impl AsRef<Path>) -> Option<Arc<dyn Regressor>> {
    let path = path.as_ref();
    match try_load_model(path) {
        Ok(model) => {
            info!(path = %path.display(), model = model.name(), "model loaded");
            Some(model)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "model unavailable, using fallback estimate");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_artifact(tag: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "pt-model-{tag}-{}-{}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos())
                .unwrap_or_default()
        ));
        let mut f = std::fs::File::create(&path).expect("create file");
        f.write_all(body.as_bytes()).expect("write file");
        path
    }

    #[test]
    fn missing_file_is_absent() {
        assert!(load_model("/nonexistent/processing_time_model.json").is_none());
        assert!(matches!(
            try_load_model("/nonexistent/processing_time_model.json"),
            Err(ModelLoadError::Io(_))
        ));
    }

    #[test]
    fn corrupt_and_mismatched_artifacts_are_absent() {
        let corrupt = temp_artifact("corrupt", "\u{1f}\u{8b} binary pickle");
        assert!(load_model(&corrupt).is_none());

        let future = temp_artifact("future", r#"{"format_version": 9, "intercept": 1.0}"#);
        assert!(matches!(try_load_model(&future), Err(ModelLoadError::UnsupportedVersion(9))));
        assert!(load_model(&future).is_none());

        let _ = std::fs::remove_file(corrupt);
        let _ = std::fs::remove_file(future);
    }

    #[test]
    fn valid_artifact_loads() {
        let path = temp_artifact(
            "valid",
            r#"{"format_version": 1, "name": "demo", "intercept": 30.0, "category_id_coefficient": 0.0}"#,
        );
        let model = load_model(&path).expect("model loads");
        assert_eq!(model.name(), "demo");
        let _ = std::fs::remove_file(path);
    }
}
