use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use pt_core::{Protocol, RawOrderInput, SlaThreshold, STORE_CATEGORIES};
use pt_predictors::load_model;
use pt_runtime::metrics::RequestTimer;
use pt_runtime::{init_tracing, AppConfig};
use pt_session::PredictionSession;
use pt_views::{render_json, render_text, ATTRIBUTE_INFO};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Predict delivery processing time for one order and compare it with an SLA.
#[derive(Debug, Parser)]
#[command(name = "eta_demo", version)]
struct Args {
    /// JSON config file (model_path, sla_minutes).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model artifact; overrides config and ETA_MODEL_PATH.
    #[arg(long)]
    model: Option<PathBuf>,

    /// SLA threshold in minutes (1-240); overrides config and ETA_SLA_MINUTES.
    #[arg(long)]
    sla: Option<u32>,

    /// Read the order from a JSON file instead of the flags below.
    #[arg(long)]
    order: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Also print the feature row handed to the model.
    #[arg(long)]
    show_features: bool,

    /// Print the input reference and exit.
    #[arg(long)]
    attribute_info: bool,

    #[arg(long, default_value = "indonesian", value_parser = clap::builder::PossibleValuesParser::new(STORE_CATEGORIES))]
    category: String,

    #[arg(long, default_value_t = 3)]
    total_items: u32,

    #[arg(long, default_value_t = 5000.0)]
    subtotal: f64,

    #[arg(long, default_value_t = 2)]
    distinct_items: u32,

    #[arg(long, default_value = "1.0", value_parser = clap::builder::PossibleValuesParser::new(Protocol::CODES))]
    protocol: String,

    #[arg(long, default_value_t = 10)]
    total_onshift_partners: u32,

    #[arg(long, default_value_t = 4)]
    total_busy_partners: u32,

    #[arg(long, default_value_t = 12)]
    total_outstanding_orders: u32,

    #[arg(long, default_value_t = 1000.0)]
    min_item_price: f64,

    #[arg(long, default_value_t = 20000.0)]
    max_item_price: f64,
}

impl Args {
    fn order_input(&self) -> Result<RawOrderInput> {
        if let Some(path) = &self.order {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading order file {}", path.display()))?;
            return RawOrderInput::from_json_str(&text)
                .with_context(|| format!("parsing order file {}", path.display()));
        }
        Ok(RawOrderInput {
            category: self.category.clone(),
            total_items: self.total_items,
            subtotal: self.subtotal,
            distinct_items: self.distinct_items,
            protocol: self.protocol.parse()?,
            total_onshift_partners: self.total_onshift_partners,
            total_busy_partners: self.total_busy_partners,
            total_outstanding_orders: self.total_outstanding_orders,
            min_item_price: self.min_item_price,
            max_item_price: self.max_item_price,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.attribute_info {
        print!("{ATTRIBUTE_INFO}");
        return Ok(());
    }

    init_tracing();
    let timer = RequestTimer::start();

    let mut cfg = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(model) = &args.model {
        cfg.model_path = model.clone();
    }
    if let Some(sla) = args.sla {
        cfg.sla_minutes = SlaThreshold::new(sla)?;
    }
    info!(model_path = %cfg.model_path.display(), sla = cfg.sla_minutes.minutes(), "eta_demo starting");

    let raw = args.order_input()?;
    let session = PredictionSession::new(load_model(&cfg.model_path));
    let outcome = session.run(&raw).context("prediction failed")?;

    match args.format {
        Format::Text => print!("{}", render_text(&outcome, cfg.sla_minutes, args.show_features)),
        Format::Json => println!("{}", render_json(&outcome, cfg.sla_minutes)?),
    }

    info!(
        metrics = %session.metrics().snapshot().to_json_line("eta_demo", Some(timer.elapsed())),
        "eta_demo finished"
    );
    Ok(())
}
