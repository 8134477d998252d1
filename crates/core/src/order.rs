use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::category::CategoryIndex;
use crate::CoreError;

/// Order-placement channel. Codes are the strings `"1.0"` through `"7.0"`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Protocol(u8);

impl Protocol {
    pub const CODES: [&'static str; 7] = ["1.0", "2.0", "3.0", "4.0", "5.0", "6.0", "7.0"];

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    pub fn code(self) -> &'static str {
        Self::CODES[usize::from(self.0) - 1]
    }

    pub fn all() -> impl Iterator<Item = Protocol> {
        (1..=7).map(Protocol)
    }
}

impl Default for Protocol {
    fn default() -> Self {
        Protocol(1)
    }
}

impl FromStr for Protocol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CODES
            .iter()
            .position(|code| *code == s.trim())
            .map(|i| Protocol(i as u8 + 1))
            .ok_or_else(|| CoreError::InvalidProtocol(s.to_string()))
    }
}

impl TryFrom<String> for Protocol {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Protocol> for String {
    fn from(value: Protocol) -> Self {
        value.code().to_string()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The ten operator-supplied order attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawOrderInput {
    pub category: String,
    pub total_items: u32,
    pub subtotal: f64,
    pub distinct_items: u32,
    pub protocol: Protocol,
    pub total_onshift_partners: u32,
    pub total_busy_partners: u32,
    pub total_outstanding_orders: u32,
    pub min_item_price: f64,
    pub max_item_price: f64,
}

impl Default for RawOrderInput {
    fn default() -> Self {
        Self {
            category: "indonesian".to_string(),
            total_items: 3,
            subtotal: 5000.0,
            distinct_items: 2,
            protocol: Protocol::default(),
            total_onshift_partners: 10,
            total_busy_partners: 4,
            total_outstanding_orders: 12,
            min_item_price: 1000.0,
            max_item_price: 20000.0,
        }
    }
}

/// Soft inconsistencies that are reported but never block a prediction.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputAdvisory {
    BusyExceedsOnshift,
    MaxPriceBelowMin,
}

impl InputAdvisory {
    pub fn message(self) -> &'static str {
        match self {
            InputAdvisory::BusyExceedsOnshift => {
                "Busy partners exceed onshift partners. Check the input again."
            }
            InputAdvisory::MaxPriceBelowMin => {
                "Max item price is lower than min item price. Check the input again."
            }
        }
    }
}

impl fmt::Display for InputAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl RawOrderInput {
    /// Boundary checks the input form performs before anything is computed.
    pub fn validate(&self) -> Result<(), CoreError> {
        let counts = [
            ("total_items", self.total_items),
            ("distinct_items", self.distinct_items),
            ("total_onshift_partners", self.total_onshift_partners),
            ("total_busy_partners", self.total_busy_partners),
            ("total_outstanding_orders", self.total_outstanding_orders),
        ];
        for (field, value) in counts {
            if value < 1 {
                return Err(CoreError::BelowMinimum { field, value: f64::from(value) });
            }
        }

        let amounts = [
            ("subtotal", self.subtotal),
            ("min_item_price", self.min_item_price),
            ("max_item_price", self.max_item_price),
        ];
        for (field, value) in amounts {
            if !value.is_finite() {
                return Err(CoreError::NotFinite { field, value });
            }
            if value < 1.0 {
                return Err(CoreError::BelowMinimum { field, value });
            }
        }

        if !CategoryIndex::global().contains(&self.category) {
            return Err(CoreError::UnknownCategory(self.category.clone()));
        }
        Ok(())
    }

    pub fn advisories(&self) -> Vec<InputAdvisory> {
        let mut out = Vec::new();
        if self.total_busy_partners > self.total_onshift_partners {
            out.push(InputAdvisory::BusyExceedsOnshift);
        }
        if self.max_item_price < self.min_item_price {
            out.push(InputAdvisory::MaxPriceBelowMin);
        }
        out
    }

    pub fn from_json_str(s: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(s)?)
    }
}
