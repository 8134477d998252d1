//! Model invocation with the encoded-category retry and the closed-form fallback.

use serde::Serialize;
use tracing::{debug, warn};

use pt_core::features::busy_ratio;
use pt_core::{category_id, FeatureRecord, Minutes};

use crate::{InferenceError, ModelRow, Regressor};

pub const FALLBACK_MIN_MINUTES: Minutes = 5.0;
pub const FALLBACK_MAX_MINUTES: Minutes = 240.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    /// Model consumed the category label directly.
    Model,
    /// Model needed the category as an integer id.
    ModelEncodedCategory,
    /// No model was available.
    Fallback,
}

/// Unrounded processing-time estimate and the path that produced it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Prediction {
    pub minutes: Minutes,
    pub source: PredictionSource,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error("model {model} failed on label ({direct}) and on encoded category ({encoded})")]
    EncodedRetryFailed {
        model: String,
        direct: InferenceError,
        encoded: InferenceError,
    },
}

/// Deterministic estimate used when no model is loaded, clamped to `[5, 240]`.
pub fn fallback_estimate(record: &FeatureRecord) -> Minutes {
    let busy = busy_ratio(record.total_busy_partners, record.total_onshift_partners);
    let price_spread = record.max_item_price - record.min_item_price;

    let mut base = 12.0;
    base += 0.8 * f64::from(record.total_items);
    base += 0.02 * record.subtotal;
    base += 1.5 * f64::from(record.distinct_items.saturating_sub(1));
    base += 10.0 * busy;
    base += 0.25 * f64::from(record.total_outstanding_orders);
    base += (price_spread / 50000.0).min(6.0);
    base.clamp(FALLBACK_MIN_MINUTES, FALLBACK_MAX_MINUTES)
}

/// Runs the model when present, retrying once with an encoded category.
///
/// Model outputs are returned as-is; only the fallback estimate is clamped.
pub fn predict(
    record: &FeatureRecord,
    model: Option<&dyn Regressor>,
) -> Result<Prediction, PredictError> {
    let Some(model) = model else {
        let minutes = fallback_estimate(record);
        debug!(minutes, "no model loaded, fallback estimate");
        return Ok(Prediction { minutes, source: PredictionSource::Fallback });
    };

    let direct = match model.infer(&ModelRow::labelled(record)) {
        Ok(minutes) => {
            debug!(model = model.name(), minutes, "direct inference");
            return Ok(Prediction { minutes, source: PredictionSource::Model });
        }
        Err(err) => err,
    };

    let id = category_id(&record.category);
    warn!(
        model = model.name(),
        error = %direct,
        category = %record.category,
        category_id = id,
        "model rejected category label, retrying with encoded category"
    );

    match model.infer(&ModelRow::encoded(record, id)) {
        Ok(minutes) => {
            debug!(model = model.name(), minutes, "encoded-category inference");
            Ok(Prediction { minutes, source: PredictionSource::ModelEncodedCategory })
        }
        Err(encoded) => Err(PredictError::EncodedRetryFailed {
            model: model.name().to_string(),
            direct,
            encoded,
        }),
    }
}
