use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, Visitor},
};
use serde_json::Value;

use crate::error::{AnalysisError, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[default]
    Positive,
    Negative,
    Neutral,
    Mixed,
}

impl Sentiment {
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Positive,
        Sentiment::Negative,
        Sentiment::Neutral,
        Sentiment::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Mixed => "mixed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
            Sentiment::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sentiment {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Sentiment::ALL
            .into_iter()
            .find(|sentiment| sentiment.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| AnalysisError::UnknownValue {
                kind: "sentiment",
                value: s.to_string(),
            })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Json, OutputFormat::Csv];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("JSON"),
            OutputFormat::Csv => f.write_str("CSV"),
        }
    }
}

/// Which query parameters the backend expects on `/run-etl`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestShape {
    /// `videoId` + `outputFormat`
    VideoId,
    /// `videoLink` only
    #[default]
    VideoLink,
}

impl FromStr for RequestShape {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" | "video-id" | "videoid" => Ok(RequestShape::VideoId),
            "link" | "video-link" | "videolink" => Ok(RequestShape::VideoLink),
            _ => Err(AnalysisError::UnknownValue {
                kind: "request shape",
                value: s.to_string(),
            }),
        }
    }
}

/// A validated submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisRequest {
    identifier: String,
    format: OutputFormat,
}

impl AnalysisRequest {
    /// Trims the identifier and rejects empty input.
    pub fn new(raw: &str) -> Result<Self> {
        let identifier = raw.trim();
        if identifier.is_empty() {
            return Err(AnalysisError::Validation);
        }
        Ok(Self {
            identifier: identifier.to_string(),
            format: OutputFormat::default(),
        })
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Query pairs for `/run-etl`. Values are encoded by the HTTP client.
    pub fn query_pairs(&self, shape: RequestShape) -> Vec<(&'static str, &str)> {
        match shape {
            RequestShape::VideoId => vec![
                ("videoId", self.identifier.as_str()),
                ("outputFormat", self.format.as_str()),
            ],
            RequestShape::VideoLink => vec![("videoLink", self.identifier.as_str())],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    #[serde(default, deserialize_with = "count_field")]
    pub positive: u64,
    #[serde(default, deserialize_with = "count_field")]
    pub negative: u64,
    #[serde(default, deserialize_with = "count_field")]
    pub neutral: u64,
    #[serde(default, deserialize_with = "count_field")]
    pub mixed: u64,
}

impl SentimentBreakdown {
    pub fn count(&self, sentiment: Sentiment) -> u64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
            Sentiment::Mixed => self.mixed,
        }
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        Sentiment::ALL
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(self.count(*s)))
    }
}

/// A comment count: any non-negative integral JSON number, `null` as 0.
fn count_field<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct CountVisitor;

    impl<'de> Visitor<'de> for CountVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative whole number")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<u64, E> {
            u64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<u64, E> {
            if v.is_finite() && v >= 0.0 && v.fract() == 0.0 {
                // `as` saturates above u64::MAX.
                Ok(v as u64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }

        fn visit_unit<E: de::Error>(self) -> std::result::Result<u64, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> std::result::Result<u64, E> {
            Ok(0)
        }

        fn visit_some<D: Deserializer<'de>>(self, d: D) -> std::result::Result<u64, D::Error> {
            d.deserialize_any(self)
        }
    }

    deserializer.deserialize_any(CountVisitor)
}

/// `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keeps string entries, renders numbers and booleans, drops everything else.
fn suggestion_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
        .collect())
}

/// Keyword frequencies for one sentiment.
pub type KeywordFrequencies = BTreeMap<String, f64>;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicMap {
    #[serde(default, deserialize_with = "null_as_default")]
    pub positive: KeywordFrequencies,
    #[serde(default, deserialize_with = "null_as_default")]
    pub negative: KeywordFrequencies,
    #[serde(default, deserialize_with = "null_as_default")]
    pub neutral: KeywordFrequencies,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mixed: KeywordFrequencies,
}

impl TopicMap {
    pub fn keywords(&self, sentiment: Sentiment) -> &KeywordFrequencies {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Negative => &self.negative,
            Sentiment::Neutral => &self.neutral,
            Sentiment::Mixed => &self.mixed,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileResult {
    pub output_file: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentiment_breakdown: SentimentBreakdown,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topics: TopicMap,
    #[serde(default, deserialize_with = "suggestion_list")]
    pub content_suggestions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub executive_summary: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FailureResult {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl FailureResult {
    pub fn message(&self) -> String {
        match &self.body {
            Some(body) => format!("Error: {}. Response: {}", self.error, body),
            None => format!("Error: {}", self.error),
        }
    }
}

/// Outcome of one `/run-etl` round trip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisResult {
    File(FileResult),
    Analytics(AnalyticsResult),
    Failure(FailureResult),
}

impl AnalysisResult {
    pub fn is_success(&self) -> bool {
        !matches!(self, AnalysisResult::Failure(_))
    }

    pub fn analytics(&self) -> Option<&AnalyticsResult> {
        match self {
            AnalysisResult::Analytics(analytics) => Some(analytics),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CloudWord {
    pub text: String,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identifier_is_rejected() {
        for raw in ["", "   ", "\t\n"] {
            assert!(matches!(
                AnalysisRequest::new(raw),
                Err(AnalysisError::Validation)
            ));
        }
    }

    #[test]
    fn identifier_is_trimmed() {
        let req = AnalysisRequest::new("  dQw4w9WgXcQ \n").unwrap();
        assert_eq!(req.identifier(), "dQw4w9WgXcQ");
    }

    #[test]
    fn video_id_shape_sends_format() {
        let req = AnalysisRequest::new("dQw4w9WgXcQ")
            .unwrap()
            .with_format(OutputFormat::Csv);
        assert_eq!(
            req.query_pairs(RequestShape::VideoId),
            vec![("videoId", "dQw4w9WgXcQ"), ("outputFormat", "csv")]
        );
    }

    #[test]
    fn link_shape_omits_format() {
        let req = AnalysisRequest::new("https://youtu.be/xyz").unwrap();
        assert_eq!(
            req.query_pairs(RequestShape::VideoLink),
            vec![("videoLink", "https://youtu.be/xyz")]
        );
    }

    #[test]
    fn sentiment_parses_case_insensitively() {
        assert_eq!("MIXED".parse::<Sentiment>().unwrap(), Sentiment::Mixed);
        assert_eq!(" neutral ".parse::<Sentiment>().unwrap(), Sentiment::Neutral);
        assert!("angry".parse::<Sentiment>().is_err());
    }

    #[test]
    fn breakdown_totals_all_labels() {
        let breakdown = SentimentBreakdown {
            positive: 3,
            negative: 1,
            neutral: 0,
            mixed: 2,
        };
        assert_eq!(breakdown.total(), 6);
        assert_eq!(breakdown.count(Sentiment::Mixed), 2);
    }

    #[test]
    fn breakdown_total_saturates() {
        let breakdown = SentimentBreakdown {
            positive: u64::MAX,
            negative: 1,
            ..Default::default()
        };
        assert_eq!(breakdown.total(), u64::MAX);
    }

    #[test]
    fn counts_accept_whole_floats_and_null() {
        let breakdown: SentimentBreakdown = serde_json::from_str(
            r#"{"positive": 3.0, "negative": 1, "neutral": null, "mixed": 0.0}"#,
        )
        .unwrap();
        assert_eq!(breakdown.positive, 3);
        assert_eq!(breakdown.negative, 1);
        assert_eq!(breakdown.neutral, 0);
        assert_eq!(breakdown.total(), 4);
    }

    #[test]
    fn counts_reject_fractions_and_negatives() {
        for body in [r#"{"positive": 2.5}"#, r#"{"positive": -1}"#, r#"{"positive": -1.0}"#] {
            assert!(serde_json::from_str::<SentimentBreakdown>(body).is_err(), "{}", body);
        }
    }

    #[test]
    fn suggestions_skip_unusable_entries() {
        let analytics: AnalyticsResult = serde_json::from_str(
            r#"{"content_suggestions": ["post more", null, 7, {"x": 1}, ["y"]]}"#,
        )
        .unwrap();
        assert_eq!(analytics.content_suggestions, vec!["post more", "7"]);
    }
}
