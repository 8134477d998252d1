//! SLA comparison and text/JSON rendering of a prediction outcome.

use std::fmt::Write as _;

use serde::Serialize;

use pt_core::{Minutes, SlaThreshold};
use pt_predictors::PredictionSource;
use pt_session::PredictionOutcome;

pub const ATTRIBUTE_INFO: &str = "\
Input features for the delivery processing-time predictor
- Restaurant category (store_primary_category): one of 74 restaurant categories.
- Total items (total_items): at least 1.
- Subtotal price (subtotal): at least 1.
- Distinct items (num_distinct_items): at least 1.
- Order protocol (order_protocol_num): one of 1.0 .. 7.0, stored as a number.
- Total onshift partners (total_onshift_partners): at least 1.
- Total busy partners (total_busy_partners): at least 1.
- Total outstanding orders (total_outstanding_orders): at least 1.
- Min item price (min_item_price): at least 1.
- Max item price (max_item_price): at least 1.

Derived features
- avg_item_price = subtotal / total_items
- price_spread   = max_item_price - min_item_price
- busy_ratio     = total_busy_partners / total_onshift_partners (limited to 0..1)
";

/// Predicted time measured against an SLA threshold.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SlaComparison {
    pub predicted_minutes: Minutes,
    pub sla_minutes: u32,
    /// `sla - predicted`; negative when the SLA is exceeded.
    pub gap_minutes: Minutes,
    pub within_sla: bool,
}

impl SlaComparison {
    pub fn new(predicted_minutes: Minutes, sla: SlaThreshold) -> Self {
        let sla_minutes = sla.minutes();
        let sla_f = f64::from(sla_minutes);
        Self {
            predicted_minutes,
            sla_minutes,
            gap_minutes: sla_f - predicted_minutes,
            within_sla: predicted_minutes <= sla_f,
        }
    }

    pub fn gap_label(&self) -> String {
        format!("{:+.1} min", self.gap_minutes)
    }

    pub fn headline(&self) -> String {
        if self.within_sla {
            format!("Arrives quickly, in about {:.1} minutes", self.predicted_minutes)
        } else {
            format!("Needs more time, about {:.1} minutes", self.predicted_minutes)
        }
    }

    pub fn caption(&self) -> &'static str {
        if self.within_sla {
            "Prediction is within the SLA limit."
        } else {
            "Prediction exceeds the SLA limit; consider adjusting capacity or priority."
        }
    }
}

fn source_label(source: PredictionSource) -> &'static str {
    match source {
        PredictionSource::Model => "trained model",
        PredictionSource::ModelEncodedCategory => "trained model (encoded category)",
        PredictionSource::Fallback => "fallback estimate (no model loaded)",
    }
}

pub fn render_text(outcome: &PredictionOutcome, sla: SlaThreshold, show_features: bool) -> String {
    let cmp = SlaComparison::new(outcome.predicted_minutes, sla);
    let mut out = String::new();

    for advisory in &outcome.advisories {
        let _ = writeln!(out, "warning: {}", advisory.message());
    }
    if !outcome.advisories.is_empty() {
        out.push('\n');
    }

    let _ = writeln!(out, "Prediction Result");
    let _ = writeln!(out, "  {:<28}{:.1} min", "Predicted Processing Time", cmp.predicted_minutes);
    let _ = writeln!(out, "  {:<28}{} min", "SLA Threshold", cmp.sla_minutes);
    let _ = writeln!(out, "  {:<28}{}", "Gap vs SLA", cmp.gap_label());
    let _ = writeln!(out, "  {:<28}{}", "Estimated by", source_label(outcome.source));
    out.push('\n');
    let _ = writeln!(out, "{}", cmp.headline());
    let _ = writeln!(out, "{}", cmp.caption());

    let raw = &outcome.input;
    out.push('\n');
    let _ = writeln!(out, "Your Selected Options");
    let options: [(&str, String); 10] = [
        ("store_primary_category", raw.category.clone()),
        ("total_items", raw.total_items.to_string()),
        ("subtotal", format!("{:?}", raw.subtotal)),
        ("num_distinct_items", raw.distinct_items.to_string()),
        ("order_protocol", raw.protocol.to_string()),
        ("total_onshift_partners", raw.total_onshift_partners.to_string()),
        ("total_busy_partners", raw.total_busy_partners.to_string()),
        ("total_outstanding_orders", raw.total_outstanding_orders.to_string()),
        ("min_item_price", format!("{:?}", raw.min_item_price)),
        ("max_item_price", format!("{:?}", raw.max_item_price)),
    ];
    for (name, value) in &options {
        let _ = writeln!(out, "  {name:<26}{value}");
    }

    if show_features {
        out.push('\n');
        let _ = writeln!(out, "Features Sent to Model");
        let _ = writeln!(out, "  {:<26}{}", "store_primary_category", outcome.features.category);
        for (name, value) in outcome.features.numeric_columns() {
            let _ = writeln!(out, "  {name:<26}{value}");
        }
    }

    out
}

pub fn render_json(outcome: &PredictionOutcome, sla: SlaThreshold) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct Report<'a> {
        #[serde(flatten)]
        outcome: &'a PredictionOutcome,
        sla: SlaComparison,
        gap_label: String,
        message: String,
        caption: &'static str,
    }

    let cmp = SlaComparison::new(outcome.predicted_minutes, sla);
    let report = Report {
        outcome,
        sla: cmp,
        gap_label: cmp.gap_label(),
        message: cmp.headline(),
        caption: cmp.caption(),
    };
    serde_json::to_string_pretty(&report)
}
