use std::path::PathBuf;
use std::sync::Arc;

use pt_core::{build_features, InputAdvisory, RawOrderInput};
use pt_predictors::{load_model, predict, LinearRegressor, PredictionSource};
use pt_session::{PredictionSession, SessionError};

fn minimal_order() -> RawOrderInput {
    RawOrderInput {
        category: "afghan".into(),
        total_items: 1,
        subtotal: 1.0,
        distinct_items: 1,
        protocol: "1.0".parse().expect("protocol"),
        total_onshift_partners: 1,
        total_busy_partners: 1,
        total_outstanding_orders: 1,
        min_item_price: 1.0,
        max_item_price: 1.0,
    }
}

fn bundled_model(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../models")
        .join(name)
}

#[test]
fn reference_order_without_model() {
    let outcome = PredictionSession::new(None)
        .run(&RawOrderInput::default())
        .expect("prediction");
    assert_eq!(outcome.features.busy_ratio, 0.4);
    assert_eq!(outcome.features.price_spread, 19000.0);
    assert!((outcome.raw_minutes - 123.28).abs() < 1e-9);
    assert_eq!(outcome.predicted_minutes, 123.3);
}

#[test]
fn minimal_order_without_model() {
    let outcome = PredictionSession::new(None)
        .run(&minimal_order())
        .expect("prediction");
    assert_eq!(outcome.features.busy_ratio, 1.0);
    assert_eq!(outcome.features.price_spread, 0.0);
    assert_eq!(outcome.predicted_minutes, 23.1);
    assert!(outcome.predicted_minutes >= 5.0);
}

#[test]
fn repeated_runs_are_identical() {
    let session = PredictionSession::new(None);
    let a = session.run(&RawOrderInput::default()).expect("prediction");
    let b = session.run(&RawOrderInput::default()).expect("prediction");
    assert_eq!(a.raw_minutes.to_bits(), b.raw_minutes.to_bits());
    assert_eq!(a, b);
    assert_eq!(session.metrics().snapshot().predictions, 2);
}

#[test]
fn missing_artifact_falls_back() {
    let model = load_model(bundled_model("does-not-exist.json"));
    assert!(model.is_none());
    let session = PredictionSession::new(model);
    let outcome = session.run(&RawOrderInput::default()).expect("prediction");
    assert_eq!(outcome.source, PredictionSource::Fallback);
}

#[test]
fn bundled_pipeline_model_takes_labels() {
    let model = load_model(bundled_model("processing_time_model.json")).expect("bundled model");
    let session = PredictionSession::new(Some(model));
    let outcome = session.run(&RawOrderInput::default()).expect("prediction");
    assert_eq!(outcome.source, PredictionSource::Model);
    assert!(outcome.predicted_minutes > 0.0);
}

#[test]
fn bundled_id_model_needs_encoded_category() {
    let model = load_model(bundled_model("processing_time_model_ids.json")).expect("bundled model");
    let session = PredictionSession::new(Some(model));
    let outcome = session.run(&RawOrderInput::default()).expect("prediction");
    assert_eq!(outcome.source, PredictionSource::ModelEncodedCategory);
    assert_eq!(session.metrics().snapshot().model_encoded, 1);
}

#[test]
fn model_that_accepts_neither_shape_is_an_error() {
    let model = LinearRegressor::from_json_str(r#"{"format_version": 1, "intercept": 12.0}"#)
        .expect("valid artifact");
    let rec = build_features(&RawOrderInput::default());
    assert!(predict(&rec, Some(&model)).is_err());

    let session = PredictionSession::new(Some(Arc::new(model)));
    assert!(matches!(
        session.run(&RawOrderInput::default()),
        Err(SessionError::Predict(_))
    ));
}

#[test]
fn outcome_serializes_for_display() {
    let outcome = PredictionSession::new(None)
        .run(&RawOrderInput::default())
        .expect("prediction");
    let v = serde_json::to_value(&outcome).expect("serializes");
    assert_eq!(v["source"], "fallback");
    assert_eq!(v["advisories"].as_array().map(Vec::len), Some(0));
}

#[test]
fn inverted_prices_floor_the_fallback_and_warn() {
    let raw = RawOrderInput {
        min_item_price: 10_000_000.0,
        max_item_price: 1.0,
        ..minimal_order()
    };
    let outcome = PredictionSession::new(None).run(&raw).expect("prediction");
    assert_eq!(outcome.advisories, vec![InputAdvisory::MaxPriceBelowMin]);
    assert_eq!(outcome.source, PredictionSource::Fallback);
    assert_eq!(outcome.predicted_minutes, 5.0);
}

#[test]
fn infinite_amounts_are_rejected_before_prediction() {
    let raw = RawOrderInput {
        min_item_price: f64::INFINITY,
        max_item_price: f64::INFINITY,
        ..RawOrderInput::default()
    };
    let session = PredictionSession::new(None);
    assert!(matches!(session.run(&raw), Err(SessionError::Input(_))));
    assert_eq!(session.metrics().snapshot().predictions, 0);
}
