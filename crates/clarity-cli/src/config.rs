//! Run configuration for the command-line tool.

use std::path::PathBuf;

/// Default path of the corrected image.
pub const DEFAULT_OUTPUT: &str = "improved.jpg";
/// Default JPEG quality of the corrected image.
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Environment variable overriding the output path.
pub const OUTPUT_ENV: &str = "CLARITY_OUTPUT";
/// Environment variable overriding the JPEG quality.
pub const JPEG_QUALITY_ENV: &str = "CLARITY_JPEG_QUALITY";

/// Runtime configuration resolved from arguments, environment and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Image to assess.
    pub input: PathBuf,
    /// Where the corrected image is written.
    pub output: PathBuf,
    /// JPEG quality (1–100) used when `output` is a JPEG.
    pub jpeg_quality: u8,
    /// Print the outcome as JSON instead of the text report.
    pub json: bool,
    /// Optional histogram export path.
    pub histograms: Option<PathBuf>,
    /// Skip writing the corrected image.
    pub save: bool,
}

impl RunConfig {
    /// Build a configuration for `input` with environment fallbacks.
    pub fn new(input: PathBuf) -> Self {
        Self::with_env(input, |key| std::env::var(key).ok())
    }

    /// Build a configuration reading fallbacks through `lookup`.
    pub fn with_env(input: PathBuf, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            input,
            output: lookup(OUTPUT_ENV)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            jpeg_quality: lookup(JPEG_QUALITY_ENV)
                .and_then(|s| s.trim().parse().ok())
                .filter(|q| (1..=100).contains(q))
                .unwrap_or(DEFAULT_JPEG_QUALITY),
            json: false,
            histograms: None,
            save: true,
        }
    }

    /// Apply explicit overrides from the command line.
    pub fn with_overrides(mut self, output: Option<PathBuf>, jpeg_quality: Option<u8>) -> Self {
        if let Some(output) = output {
            self.output = output;
        }
        if let Some(quality) = jpeg_quality {
            self.jpeg_quality = quality;
        }
        self
    }
}
