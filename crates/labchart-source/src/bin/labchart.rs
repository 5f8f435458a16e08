//! Render a lab chart document as JSON.
//!
//! ```text
//! labchart --endpoint https://example.org/api/patients --range creatine=1.1:2.0
//! labchart --file saved.json --pretty
//! labchart --synthetic 30
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use labchart_core::config::DashboardConfig;
use labchart_core::{BiomarkerRange, ChartSession, RangeRegistry, RecordSource};
use labchart_source::{HttpRecordSource, JsonFileSource, SyntheticSource};

#[derive(Parser, Debug)]
#[command(name = "labchart", version, about = "Patient lab results as a styled chart document")]
struct Args {
    /// JSON configuration file
    #[arg(short, long, env = "LABCHART_CONFIG")]
    config: Option<PathBuf>,

    /// Record API endpoint
    #[arg(long, env = "LABCHART_ENDPOINT")]
    endpoint: Option<String>,

    /// Saved record payload
    #[arg(long, conflicts_with = "synthetic")]
    file: Option<PathBuf>,

    /// Generate this many synthetic daily draws
    #[arg(long)]
    synthetic: Option<usize>,

    /// Seed for synthetic data
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Range override, `name=min:max`; repeatable
    #[arg(short, long = "range", value_parser = parse_range_override)]
    ranges: Vec<(String, BiomarkerRange)>,

    /// Pretty-print the chart document
    #[arg(long)]
    pretty: bool,
}

fn parse_range_override(raw: &str) -> Result<(String, BiomarkerRange), String> {
    let (name, bounds) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=min:max, got {raw:?}"))?;
    let (min, max) = bounds
        .split_once(':')
        .ok_or_else(|| format!("expected min:max, got {bounds:?}"))?;
    let min: f64 = min.trim().parse().map_err(|e| format!("bad min {min:?}: {e}"))?;
    let max: f64 = max.trim().parse().map_err(|e| format!("bad max {max:?}: {e}"))?;
    Ok((name.trim().to_string(), BiomarkerRange::new(min, max)))
}

fn select_source(args: &Args, config: &DashboardConfig) -> Result<Box<dyn RecordSource>> {
    if let Some(draws) = args.synthetic {
        return Ok(Box::new(SyntheticSource::new(draws, args.seed)));
    }
    if let Some(path) = &args.file {
        return Ok(Box::new(JsonFileSource::new(path)));
    }
    match args.endpoint.as_ref().or(config.endpoint.as_ref()) {
        Some(endpoint) => Ok(Box::new(HttpRecordSource::new(endpoint.clone()))),
        None => bail!("no record source: pass --endpoint, --file or --synthetic"),
    }
}

fn main() -> Result<()> {
    let _ = labchart_core::telemetry::init_default_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    let mut registry = RangeRegistry::with_defaults();
    config.apply(&mut registry).context("applying configured ranges")?;

    let mut session = match &config.title {
        Some(title) => ChartSession::with_title(title.clone(), registry),
        None => ChartSession::new(registry),
    };

    for (name, range) in &args.ranges {
        session
            .set_range(name, *range)
            .map_err(|e| anyhow!("--range {name}: {e}"))?;
    }

    let source = select_source(&args, &config)?;
    session
        .refresh(source.as_ref())
        .with_context(|| format!("fetching records from {}", source.describe()))?;

    for series in &session.chart().series {
        tracing::info!(
            series = %series.label,
            points = series.points.len(),
            out_of_range = series.out_of_range_count(),
            skipped = series.skipped_count(),
            "series built"
        );
    }

    let json = if args.pretty {
        session.chart().to_json_pretty()?
    } else {
        session.chart().to_json()?
    };
    println!("{json}");
    Ok(())
}
