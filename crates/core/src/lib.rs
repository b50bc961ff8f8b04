//! Commentpulse Core Library
//!
//! Client side of the YouTube comment sentiment-analysis service: backend
//! configuration, the `/run-etl` request/response contract, the submission
//! state machine, and the view derivations the front ends render.

pub mod client;
pub mod config;
pub mod contract;
pub mod derive;
pub mod error;
pub mod format;
pub mod session;
pub mod types;

// Re-export commonly used items at crate root
pub use client::{AnalysisBackend, AnalysisClient};
pub use config::{ClientConfig, DEFAULT_LOG_FILTER, Mode, ModeConfig};
pub use derive::{
    ChartSegment, CloudScale, chart_segments, cloud_font_size, keywords_for_cloud, summary_bullets,
};
pub use error::{AnalysisError, Result};
pub use format::{format_analytics_readable, format_bar, format_result_readable};
pub use session::{Session, SubmissionState, SubmissionTicket};
pub use types::{
    AnalysisRequest, AnalysisResult, AnalyticsResult, CloudWord, FailureResult, FileResult,
    OutputFormat, RequestShape, Sentiment, SentimentBreakdown, TopicMap,
};
