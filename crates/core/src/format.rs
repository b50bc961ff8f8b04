use crate::{
    derive::{CloudScale, chart_segments, cloud_font_size, keywords_for_cloud, summary_bullets},
    types::{AnalysisResult, AnalyticsResult, Sentiment},
};

const BAR_WIDTH: usize = 30;

/// Render a fraction in `0.0..=1.0` as a fixed-width bar.
pub fn format_bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a result as human-readable markdown
pub fn format_result_readable(result: &AnalysisResult, sentiment: Sentiment) -> String {
    match result {
        AnalysisResult::File(file) => {
            format!("# ETL completed\n\n**Output file:** {}\n", file.output_file)
        }
        AnalysisResult::Failure(failure) => format!("# Analysis failed\n\n{}\n", failure.message()),
        AnalysisResult::Analytics(analytics) => format_analytics_readable(analytics, sentiment),
    }
}

pub fn format_analytics_readable(analytics: &AnalyticsResult, sentiment: Sentiment) -> String {
    let mut output = String::new();

    output.push_str("# Comment Sentiment Analysis\n\n");

    output.push_str("## Sentiment Breakdown\n\n");
    let breakdown = &analytics.sentiment_breakdown;
    if breakdown.total() == 0 {
        output.push_str("No sentiment data available.\n");
    } else {
        for segment in chart_segments(breakdown) {
            output.push_str(&format!(
                "{:<9} {} {:>5.1}% ({})\n",
                segment.sentiment.label(),
                format_bar(segment.fraction, BAR_WIDTH),
                segment.fraction * 100.0,
                segment.count
            ));
        }
        output.push_str(&format!("\n**Total comments:** {}\n", breakdown.total()));
    }
    output.push('\n');

    output.push_str(&format!("## {} Keywords\n\n", sentiment.label()));
    let words = keywords_for_cloud(Some(&analytics.topics), sentiment);
    if words.is_empty() {
        output.push_str(&format!("No {} keywords found.\n", sentiment.as_str()));
    } else {
        let scale = CloudScale::default();
        for word in &words {
            output.push_str(&format!(
                "• {} ({}, size {:.0})\n",
                word.text,
                word.value,
                cloud_font_size(word.value, scale)
            ));
        }
    }
    output.push('\n');

    output.push_str("## Content Suggestions\n\n");
    if analytics.content_suggestions.is_empty() {
        output.push_str("No suggestions available.\n");
    } else {
        for (i, suggestion) in analytics.content_suggestions.iter().enumerate() {
            output.push_str(&format!("{}. {}\n", i + 1, suggestion));
        }
    }
    output.push('\n');

    output.push_str("## Executive Summary\n\n");
    let bullets = summary_bullets(Some(&analytics.executive_summary));
    if bullets.is_empty() {
        output.push_str("No summary available.\n");
    } else {
        for bullet in &bullets {
            output.push_str(&format!("• {}\n", bullet));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileResult, SentimentBreakdown};

    #[test]
    fn bar_is_fixed_width() {
        assert_eq!(format_bar(0.5, 4), "██░░");
        assert_eq!(format_bar(0.0, 3), "░░░");
        assert_eq!(format_bar(2.0, 2), "██");
    }

    #[test]
    fn file_result_shows_path() {
        let result = AnalysisResult::File(FileResult {
            output_file: "out.csv".to_string(),
        });
        assert!(format_result_readable(&result, Sentiment::Positive).contains("out.csv"));
    }

    #[test]
    fn empty_analytics_uses_placeholders() {
        let text = format_analytics_readable(&AnalyticsResult::default(), Sentiment::Neutral);
        assert!(text.contains("No sentiment data available."));
        assert!(text.contains("No neutral keywords found."));
        assert!(text.contains("No suggestions available."));
        assert!(text.contains("No summary available."));
    }

    #[test]
    fn analytics_sections_are_rendered() {
        let mut analytics = AnalyticsResult {
            sentiment_breakdown: SentimentBreakdown {
                positive: 3,
                negative: 1,
                neutral: 0,
                mixed: 0,
            },
            content_suggestions: vec!["post more".to_string()],
            executive_summary: "Line one\nLine two".to_string(),
            ..Default::default()
        };
        analytics.topics.positive.insert("great".to_string(), 2.0);

        let text = format_analytics_readable(&analytics, Sentiment::Positive);
        assert!(text.contains("75.0% (3)"));
        assert!(text.contains("• great (2, size 16)"));
        assert!(text.contains("1. post more"));
        assert!(text.contains("• Line one\n• Line two\n"));
    }

    #[test]
    fn huge_counts_render_without_overflow() {
        let analytics = AnalyticsResult {
            sentiment_breakdown: SentimentBreakdown {
                positive: u64::MAX,
                negative: 1,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = AnalysisResult::Analytics(analytics);
        let text = format_result_readable(&result, Sentiment::Positive);
        assert!(text.contains(&format!("**Total comments:** {}", u64::MAX)));
    }
}
