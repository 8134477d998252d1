//! Core types for the delivery processing-time estimator.

use serde::{Deserialize, Serialize};

pub type Minutes = f64;
pub type CategoryId = u32;

/// SLA threshold in whole minutes, accepted range 1..=240.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlaThreshold(u32);

impl SlaThreshold {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 240;

    pub fn new(minutes: u32) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&minutes) {
            Ok(Self(minutes))
        } else {
            Err(CoreError::SlaOutOfRange(minutes))
        }
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl Default for SlaThreshold {
    fn default() -> Self {
        Self(30)
    }
}

impl TryFrom<u32> for SlaThreshold {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SlaThreshold> for u32 {
    fn from(value: SlaThreshold) -> Self {
        value.0
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("{field} must be at least 1, got {value}")]
    BelowMinimum { field: &'static str, value: f64 },
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("unknown restaurant category: {0:?}")]
    UnknownCategory(String),
    #[error("unknown order protocol code: {0:?}")]
    InvalidProtocol(String),
    #[error("SLA must be between 1 and 240 minutes, got {0}")]
    SlaOutOfRange(u32),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub mod category;
pub mod features;
pub mod order;

pub use category::{category_id, CategoryIndex, STORE_CATEGORIES};
pub use features::{build_features, FeatureRecord};
pub use order::{InputAdvisory, Protocol, RawOrderInput};

/// Rounds to one decimal place, resolving ties on the exact binary value
/// (half-to-even), the way the displayed minutes are produced.
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.1}").parse().unwrap_or(value)
}
