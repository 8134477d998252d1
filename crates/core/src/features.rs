use serde::Serialize;

use crate::order::RawOrderInput;

/// One model row: the raw order fields plus three derived features.
///
/// Serialized field names are the column names the regressor was trained on.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeatureRecord {
    #[serde(rename = "store_primary_category")]
    pub category: String,
    pub total_items: u32,
    pub subtotal: f64,
    #[serde(rename = "num_distinct_items")]
    pub distinct_items: u32,
    #[serde(rename = "order_protocol_num")]
    pub protocol: f64,
    pub total_onshift_partners: u32,
    pub total_busy_partners: u32,
    pub total_outstanding_orders: u32,
    pub min_item_price: f64,
    pub max_item_price: f64,
    pub avg_item_price: f64,
    pub price_spread: f64,
    pub busy_ratio: f64,
}

impl FeatureRecord {
    /// Names of the numeric columns, in row order.
    pub const NUMERIC_COLUMNS: [&'static str; 12] = [
        "total_items",
        "subtotal",
        "num_distinct_items",
        "order_protocol_num",
        "total_onshift_partners",
        "total_busy_partners",
        "total_outstanding_orders",
        "min_item_price",
        "max_item_price",
        "avg_item_price",
        "price_spread",
        "busy_ratio",
    ];

    /// Numeric columns paired with their names, matching `NUMERIC_COLUMNS`.
    pub fn numeric_columns(&self) -> [(&'static str, f64); 12] {
        let values = [
            f64::from(self.total_items),
            self.subtotal,
            f64::from(self.distinct_items),
            self.protocol,
            f64::from(self.total_onshift_partners),
            f64::from(self.total_busy_partners),
            f64::from(self.total_outstanding_orders),
            self.min_item_price,
            self.max_item_price,
            self.avg_item_price,
            self.price_spread,
            self.busy_ratio,
        ];
        let mut out = [("", 0.0); 12];
        for (slot, (name, value)) in out
            .iter_mut()
            .zip(Self::NUMERIC_COLUMNS.iter().zip(values))
        {
            *slot = (*name, value);
        }
        out
    }
}

/// `numerator / max(denominator, 1)`.
fn guarded_ratio(numerator: f64, denominator: u32) -> f64 {
    numerator / f64::from(denominator.max(1))
}

/// Busy partners over onshift partners, clamped into `[0, 1]`.
pub fn busy_ratio(busy: u32, onshift: u32) -> f64 {
    guarded_ratio(f64::from(busy), onshift).clamp(0.0, 1.0)
}

pub fn build_features(raw: &RawOrderInput) -> FeatureRecord {
    let avg_item_price = guarded_ratio(raw.subtotal, raw.total_items);
    let price_spread = raw.max_item_price - raw.min_item_price;
    let busy_ratio = busy_ratio(raw.total_busy_partners, raw.total_onshift_partners);

    FeatureRecord {
        category: raw.category.clone(),
        total_items: raw.total_items,
        subtotal: raw.subtotal,
        distinct_items: raw.distinct_items,
        protocol: raw.protocol.as_f64(),
        total_onshift_partners: raw.total_onshift_partners,
        total_busy_partners: raw.total_busy_partners,
        total_outstanding_orders: raw.total_outstanding_orders,
        min_item_price: raw.min_item_price,
        max_item_price: raw.max_item_price,
        avg_item_price,
        price_spread,
        busy_ratio,
    }
}
