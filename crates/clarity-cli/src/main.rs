//! Clarity: assess an image from its histograms and correct it if needed.
//!
//! Loads the input, prints the quality report, and when the image is
//! judged deficient runs one correction pass, prints the report of the
//! result and saves it.

mod config;
mod image_loader;
mod report;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::RunConfig;
use report::{HistogramExport, OutcomeReport, render_assessment, render_gamma};

#[derive(Parser, Debug)]
#[command(
    name = "clarity",
    version,
    about = "Histogram-based image quality assessment and correction"
)]
struct Args {
    /// Image to assess
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Where to write the corrected image [env: CLARITY_OUTPUT] [default: improved.jpg]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// JPEG quality of the corrected image [env: CLARITY_JPEG_QUALITY] [default: 92]
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Print the outcome as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Write histogram data as JSON for plotting
    #[arg(long, value_name = "PATH")]
    histograms: Option<PathBuf>,

    /// Do not write the corrected image
    #[arg(long)]
    no_save: bool,
}

impl Args {
    fn into_config(self) -> RunConfig {
        let mut config = RunConfig::new(self.input).with_overrides(self.output, self.quality);
        config.json = self.json;
        config.histograms = self.histograms;
        config.save = !self.no_save;
        config
    }
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Args::parse().into_config();
    run(&config)
}

fn run(config: &RunConfig) -> Result<()> {
    let image = image_loader::load_image(&config.input)
        .with_context(|| format!("Failed to load {}", config.input.display()))?;
    info!(
        "Loaded {} ({}x{}, {})",
        config.input.display(),
        image.width(),
        image.height(),
        image.layout()
    );

    let outcome =
        clarity_core::evaluate_and_correct(&image).context("Failed to assess image quality")?;
    info!("Verdict: {}", outcome.original.assessment.verdict);

    if let Some(path) = &config.histograms {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &HistogramExport::new(&outcome))
            .with_context(|| format!("Failed to write histograms to {}", path.display()))?;
        info!("Histograms written to {}", path.display());
    }

    if config.json {
        let json = serde_json::to_string_pretty(&OutcomeReport::new(&outcome))
            .context("Failed to serialize report")?;
        println!("{json}");
    } else {
        print!("{}", render_assessment(&outcome.original.assessment));
    }

    let Some(corrected) = &outcome.corrected else {
        if !config.json {
            println!("\nThe image was judged to be of good quality. No corrections were made.");
        }
        return Ok(());
    };

    if !config.json {
        println!("\nAfter correction:");
        println!("{}", render_gamma(&corrected.gamma));
        print!("{}", render_assessment(&corrected.evaluation.assessment));
    }
    info!(
        "Corrected verdict: {}",
        corrected.evaluation.assessment.verdict
    );

    if config.save {
        image_loader::save_image(&corrected.image, &config.output, config.jpeg_quality)
            .with_context(|| format!("Failed to save {}", config.output.display()))?;
        info!("Saved {}", config.output.display());
        if !config.json {
            println!("\nSaved file: {}", config.output.display());
        }
    }

    Ok(())
}
