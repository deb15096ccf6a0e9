use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use survey_stats::report::{default_fields, Report};
use survey_stats::{load_file, CleanConfig, Schema};

/// Clean a passenger survey export and print its descriptive statistics.
#[derive(Parser)]
#[command(name = "survey-stats", version)]
struct Cli {
    /// Survey data file (.csv, .json or .parquet)
    input: PathBuf,

    /// JSON cleaning configuration (defaults to the airline survey cleaning)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Infer column types instead of requiring the airline survey layout
    #[arg(long)]
    infer_schema: bool,

    /// Numeric field to summarise (repeatable)
    #[arg(long = "field")]
    fields: Vec<String>,

    /// Histogram bins per field
    #[arg(long, default_value_t = 30)]
    bins: usize,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let schema = (!cli.infer_schema).then(Schema::airline);
    let raw = load_file(&cli.input, schema.as_ref())
        .with_context(|| format!("loading {}", cli.input.display()))?;

    let config = match &cli.config {
        Some(path) => CleanConfig::from_json_file(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None if cli.infer_schema => CleanConfig::default(),
        None => CleanConfig::airline(),
    };

    let fields = if cli.fields.is_empty() {
        default_fields(&raw)
    } else {
        cli.fields.clone()
    };

    let report = Report::build(&raw, &config, &fields, cli.bins).context("building report")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text());
    }
    Ok(())
}
