use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use pt_core::FeatureRecord;

use crate::{CategoryCell, InferenceError, ModelLoadError, ModelRow, Regressor};

pub const SUPPORTED_FORMAT_VERSION: u32 = 1;

/// On-disk description of a linear processing-time regressor.
///
/// `category_encoder` maps labels to additive offsets, which lets the model
/// consume raw category strings. Without it the model only understands the
/// integer-encoded column, weighted by `category_id_coefficient`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearArtifact {
    pub format_version: u32,
    #[serde(default = "default_name")]
    pub name: String,
    pub intercept: f64,
    #[serde(default)]
    pub coefficients: BTreeMap<String, f64>,
    #[serde(default)]
    pub category_encoder: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub category_id_coefficient: Option<f64>,
}

fn default_name() -> String {
    "linear".to_string()
}

#[derive(Debug, Clone)]
pub struct LinearRegressor {
    name: String,
    intercept: f64,
    weights: [f64; 12],
    category_encoder: Option<BTreeMap<String, f64>>,
    category_id_coefficient: Option<f64>,
}

impl LinearRegressor {
    pub fn from_artifact(artifact: LinearArtifact) -> Result<Self, ModelLoadError> {
        if artifact.format_version != SUPPORTED_FORMAT_VERSION {
            return Err(ModelLoadError::UnsupportedVersion(artifact.format_version));
        }

        let mut weights = [0.0; 12];
        for (column, weight) in &artifact.coefficients {
            let idx = FeatureRecord::NUMERIC_COLUMNS
                .iter()
                .position(|c| c == column)
                .ok_or_else(|| ModelLoadError::UnknownColumn(column.clone()))?;
            if !weight.is_finite() {
                return Err(ModelLoadError::Invalid(format!("weight for {column} is not finite")));
            }
            weights[idx] = *weight;
        }
        if !artifact.intercept.is_finite() {
            return Err(ModelLoadError::Invalid("intercept is not finite".to_string()));
        }

        Ok(Self {
            name: artifact.name,
            intercept: artifact.intercept,
            weights,
            category_encoder: artifact.category_encoder,
            category_id_coefficient: artifact.category_id_coefficient,
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self, ModelLoadError> {
        let artifact: LinearArtifact = serde_json::from_str(s)?;
        Self::from_artifact(artifact)
    }

    pub fn accepts_labels(&self) -> bool {
        self.category_encoder.is_some()
    }

    fn category_term(&self, cell: CategoryCell<'_>) -> Result<f64, InferenceError> {
        match cell {
            CategoryCell::Label(label) => match &self.category_encoder {
                Some(encoder) => Ok(encoder.get(label).copied().unwrap_or(0.0)),
                None => Err(InferenceError::UnencodedCategory(label.to_string())),
            },
            CategoryCell::Id(id) => match self.category_id_coefficient {
                Some(coef) => Ok(coef * f64::from(id)),
                None => Err(InferenceError::UnsupportedCategoryEncoding),
            },
        }
    }
}

impl Regressor for LinearRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn infer(&self, row: &ModelRow<'_>) -> Result<f64, InferenceError> {
        let mut value = self.intercept + self.category_term(row.category)?;
        for ((_, x), w) in row.record.numeric_columns().iter().zip(self.weights) {
            value += w * x;
        }
        if value.is_finite() {
            Ok(value)
        } else {
            Err(InferenceError::NonFinite(value))
        }
    }
}
