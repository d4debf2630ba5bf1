//! Scope computation: per-channel and luminance histograms.

pub mod histogram;

pub use histogram::{BINS, Histogram, HistogramData, compute_histograms};
