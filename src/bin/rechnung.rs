//! CLI binary for rechnung-konverter.
//!
//! Reads a JSON invoice draft, normalizes it and writes the canonical record
//! plus XRechnung/ZUGFeRD XML into `<output>/<invoice number>/`.

use anyhow::{Context, Result};
use clap::Parser;
use rechnung_konverter::config::Settings;
use rechnung_konverter::core::normalize;
use rechnung_konverter::pipeline::Pipeline;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Normalize LLM-extracted invoice drafts into XRechnung and ZUGFeRD XML.
#[derive(Parser, Debug)]
#[command(
    name = "rechnung",
    version,
    about = "Normalize invoice drafts into canonical JSON, XRechnung UBL and ZUGFeRD CII",
    arg_required_else_help = true
)]
struct Cli {
    /// JSON draft file.
    input: PathBuf,

    /// Output root. Defaults to the settings' output directory.
    #[arg(short, long, env = "RECHNUNG_OUTPUT")]
    output: Option<PathBuf>,

    /// Currency used when the draft has none (ISO 4217).
    #[arg(long, env = "RECHNUNG_CURRENCY")]
    currency: Option<String>,

    /// Country used when an address has none (ISO 3166-1 alpha-2).
    #[arg(long, env = "RECHNUNG_COUNTRY")]
    country: Option<String>,

    /// Settings file. Created with defaults if missing.
    #[arg(long, env = "RECHNUNG_SETTINGS")]
    settings: Option<PathBuf>,

    /// Print the canonical JSON instead of the processing report.
    #[arg(long)]
    print: bool,

    /// Debug logging.
    #[arg(short, long, env = "RECHNUNG_VERBOSE")]
    verbose: bool,

    /// Errors only.
    #[arg(short, long, env = "RECHNUNG_QUIET", conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load(path).context("Failed to load settings")?,
        None => Settings::default(),
    };
    if let Some(currency) = &cli.currency {
        settings.defaults.currency_code = currency.trim().to_uppercase();
    }
    if let Some(country) = &cli.country {
        settings.defaults.country_code = country.trim().to_uppercase();
    }
    settings
        .defaults
        .validate()
        .context("Invalid currency, country or date format defaults")?;
    let output_root = cli
        .output
        .clone()
        .unwrap_or_else(|| settings.output_directory.clone());

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read draft {:?}", cli.input))?;
    let draft: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("{:?} is not valid JSON", cli.input))?;

    let invoice = normalize(draft, &settings.defaults).context("Draft rejected")?;

    let pipeline = Pipeline::new().with_defaults(settings.defaults.clone());
    let report = pipeline
        .export(&invoice, &output_root)
        .context("Failed to write outputs")?;

    if let Some(path) = &cli.settings {
        settings.last_output_path = Some(report.output_directory.clone());
        settings.save(path).context("Failed to save settings")?;
    }

    let out = if cli.print {
        invoice.to_canonical_json().context("Failed to serialise invoice")?
    } else {
        serde_json::to_string_pretty(&report).context("Failed to serialise report")?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{out}").context("Failed to write to stdout")?;

    Ok(())
}
