//! View-model derivations over an analytics result.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::{CloudWord, Sentiment, SentimentBreakdown, TopicMap};

/// Flatten the keyword frequencies for `sentiment` into word-cloud input.
///
/// Most frequent words come first; ties are broken alphabetically.
pub fn keywords_for_cloud(topics: Option<&TopicMap>, sentiment: Sentiment) -> Vec<CloudWord> {
    let Some(topics) = topics else {
        return Vec::new();
    };

    let mut words: Vec<CloudWord> = topics
        .keywords(sentiment)
        .iter()
        .map(|(text, value)| CloudWord {
            text: text.clone(),
            value: *value,
        })
        .collect();

    words.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.text.cmp(&b.text))
    });
    words
}

/// Split an executive summary into trimmed, non-empty lines.
pub fn summary_bullets(text: Option<&str>) -> Vec<String> {
    text.unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSegment {
    pub sentiment: Sentiment,
    pub count: u64,
    pub fraction: f64,
}

/// One segment per sentiment label, in a fixed order.
pub fn chart_segments(breakdown: &SentimentBreakdown) -> Vec<ChartSegment> {
    let total = breakdown.total();
    Sentiment::ALL
        .into_iter()
        .map(|sentiment| {
            let count = breakdown.count(sentiment);
            let fraction = if total == 0 {
                0.0
            } else {
                count as f64 / total as f64
            };
            ChartSegment {
                sentiment,
                count,
                fraction,
            }
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudScale {
    pub scale: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for CloudScale {
    fn default() -> Self {
        Self {
            scale: 10.0,
            min: 12.0,
            max: 48.0,
        }
    }
}

/// `clamp(log2(value + 1) * scale, min, max)`
pub fn cloud_font_size(value: f64, scale: CloudScale) -> f64 {
    let value = if value.is_finite() { value.max(0.0) } else { 0.0 };
    ((value + 1.0).log2() * scale.scale).clamp(scale.min, scale.max)
}
