//! Regressor capability, model artifacts and prediction dispatch.

use std::fmt;

use pt_core::{CategoryId, FeatureRecord};

pub mod dispatch;
pub mod linear;
pub mod loader;

pub use dispatch::{fallback_estimate, predict, PredictError, Prediction, PredictionSource};
pub use linear::LinearRegressor;
pub use loader::{load_model, try_load_model, ModelLoadError};

/// Category column as handed to a regressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryCell<'a> {
    Label(&'a str),
    Id(CategoryId),
}

impl fmt::Display for CategoryCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryCell::Label(label) => write!(f, "{label:?}"),
            CategoryCell::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// A feature record with its category either left as a label or pre-encoded.
#[derive(Debug, Clone, Copy)]
pub struct ModelRow<'a> {
    pub category: CategoryCell<'a>,
    pub record: &'a FeatureRecord,
}

impl<'a> ModelRow<'a> {
    pub fn labelled(record: &'a FeatureRecord) -> Self {
        Self { category: CategoryCell::Label(&record.category), record }
    }

    pub fn encoded(record: &'a FeatureRecord, id: CategoryId) -> Self {
        Self { category: CategoryCell::Id(id), record }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("model has no encoder for string category {0:?}")]
    UnencodedCategory(String),
    #[error("model does not accept integer-encoded categories")]
    UnsupportedCategoryEncoding,
    #[error("model produced a non-finite value: {0}")]
    NonFinite(f64),
    #[error("inference failed: {0}")]
    Failed(String),
}

/// A trained regressor that maps one row to a processing time in minutes.
pub trait Regressor: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn infer(&self, row: &ModelRow<'_>) -> Result<f64, InferenceError>;
}
