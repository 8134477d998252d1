//! Single-request prediction flow around an optional injected regressor.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use pt_core::{
    build_features, round_one_decimal, CoreError, FeatureRecord, InputAdvisory, Minutes,
    RawOrderInput,
};
use pt_predictors::{predict, PredictError, PredictionSource, Regressor};
use pt_runtime::metrics::MetricsRegistry;

#[derive(thiserror::Error, Debug)]
pub enum SessionError {
    #[error("invalid order input: {0}")]
    Input(#[from] CoreError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

/// Everything produced for one order, ready for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PredictionOutcome {
    pub input: RawOrderInput,
    pub advisories: Vec<InputAdvisory>,
    pub features: FeatureRecord,
    pub raw_minutes: Minutes,
    pub predicted_minutes: Minutes,
    pub source: PredictionSource,
}

pub struct PredictionSession {
    model: Option<Arc<dyn Regressor>>,
    metrics: MetricsRegistry,
}

impl PredictionSession {
    pub fn new(model: Option<Arc<dyn Regressor>>) -> Self {
        Self::with_metrics(model, MetricsRegistry::default())
    }

    pub fn with_metrics(model: Option<Arc<dyn Regressor>>, metrics: MetricsRegistry) -> Self {
        Self { model, metrics }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn run(&self, raw: &RawOrderInput) -> Result<PredictionOutcome, SessionError> {
        raw.validate()?;

        let advisories = raw.advisories();
        for advisory in &advisories {
            warn!(?advisory, "{}", advisory.message());
        }
        self.metrics.inc_advisories(advisories.len() as u64);

        let features = build_features(raw);
        let prediction = match predict(&features, self.model.as_deref()) {
            Ok(p) => p,
            Err(err) => {
                self.metrics.inc_dispatch_failures(1);
                return Err(err.into());
            }
        };

        self.metrics.inc_predictions(1);
        match prediction.source {
            PredictionSource::Model => self.metrics.inc_model_direct(1),
            PredictionSource::ModelEncodedCategory => self.metrics.inc_model_encoded(1),
            PredictionSource::Fallback => self.metrics.inc_fallback_estimates(1),
        }

        let predicted_minutes = round_one_decimal(prediction.minutes);
        info!(
            category = %raw.category,
            source = ?prediction.source,
            minutes = predicted_minutes,
            "prediction ready"
        );

        Ok(PredictionOutcome {
            input: raw.clone(),
            advisories,
            features,
            raw_minutes: prediction.minutes,
            predicted_minutes,
            source: prediction.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_predictors::{InferenceError, LinearRegressor, ModelRow};

    #[derive(Debug)]
    struct Broken;

    impl Regressor for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn infer(&self, _row: &ModelRow<'_>) -> Result<f64, InferenceError> {
            Err(InferenceError::Failed("weights not loaded".into()))
        }
    }

    #[test]
    fn fallback_run_rounds_and_counts() {
        let session = PredictionSession::new(None);
        assert!(!session.has_model());
        let outcome = session.run(&RawOrderInput::default()).expect("prediction");
        assert_eq!(outcome.predicted_minutes, 123.3);
        assert_eq!(outcome.source, PredictionSource::Fallback);
        assert!(outcome.advisories.is_empty());

        let snap = session.metrics().snapshot();
        assert_eq!(snap.predictions, 1);
        assert_eq!(snap.fallback_estimates, 1);
    }

    #[test]
    fn invalid_input_stops_before_prediction() {
        let session = PredictionSession::new(None);
        let raw = RawOrderInput { total_items: 0, ..RawOrderInput::default() };
        assert!(matches!(session.run(&raw), Err(SessionError::Input(_))));
        assert_eq!(session.metrics().snapshot().predictions, 0);
    }

    #[test]
    fn advisories_do_not_block() {
        let session = PredictionSession::new(None);
        let raw = RawOrderInput {
            total_onshift_partners: 3,
            total_busy_partners: 7,
            ..RawOrderInput::default()
        };
        let outcome = session.run(&raw).expect("prediction");
        assert_eq!(outcome.advisories, vec![InputAdvisory::BusyExceedsOnshift]);
        assert_eq!(outcome.features.busy_ratio, 1.0);
        assert_eq!(session.metrics().snapshot().advisories, 1);
    }

    #[test]
    fn failing_model_is_surfaced() {
        let session = PredictionSession::new(Some(Arc::new(Broken)));
        let err = session.run(&RawOrderInput::default()).expect_err("model fails twice");
        assert!(matches!(err, SessionError::Predict(PredictError::EncodedRetryFailed { .. })));
        let snap = session.metrics().snapshot();
        assert_eq!(snap.dispatch_failures, 1);
        assert_eq!(snap.predictions, 0);
    }

    #[test]
    fn model_output_is_rounded_but_not_clamped() {
        let model = LinearRegressor::from_json_str(
            r#"{"format_version": 1, "intercept": 250.04, "category_encoder": {}}"#,
        )
        .expect("valid artifact");
        let session = PredictionSession::new(Some(Arc::new(model)));
        let outcome = session.run(&RawOrderInput::default()).expect("prediction");
        assert_eq!(outcome.source, PredictionSource::Model);
        assert_eq!(outcome.predicted_minutes, 250.0);
        assert_eq!(session.metrics().snapshot().model_direct, 1);
    }
}
