//! Histogram statistics and threshold classification.

pub mod balance;
pub mod metrics;
pub mod quality;

pub use balance::{ColorBalance, color_balance_metrics};
pub use metrics::{ChannelMetrics, DEFAULT_EDGE_BINS, histogram_metrics};
pub use quality::{Assessment, Issue, IssueKind, Verdict, assess_quality};
