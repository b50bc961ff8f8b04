//! Response contract of the `/run-etl` endpoint.
//!
//! Two backend revisions are in the wild. The analytics revision always
//! carries a `status` field; the file revision never does and signals
//! failure through the HTTP status alone. The presence of `status` is
//! therefore the discriminant between the two.

use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::{AnalysisError, Result},
    types::{AnalysisResult, AnalyticsResult, FailureResult, FileResult},
};

pub const SUCCESS_STATUS: &str = "Success";

const STATUS_FIELD: &str = "status";
const ERROR_FIELD: &str = "error";
const OUTPUT_FILE_FIELD: &str = "output_file";

/// Which revision of the contract a body was written against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContractVersion {
    File,
    Analytics,
}

impl ContractVersion {
    pub fn of(body: &Map<String, Value>) -> Self {
        if body.contains_key(STATUS_FIELD) {
            ContractVersion::Analytics
        } else {
            ContractVersion::File
        }
    }
}

/// Resolve a raw HTTP status and body into an [`AnalysisResult`].
pub fn resolve(http_status: u16, raw_body: &str) -> Result<AnalysisResult> {
    let ok = (200..300).contains(&http_status);

    let mut body = match serde_json::from_str::<Value>(raw_body) {
        Ok(Value::Object(body)) => body,
        Ok(_) | Err(_) if !ok => {
            let text = raw_body.trim();
            return Err(AnalysisError::Http {
                status: http_status,
                body: (!text.is_empty()).then(|| text.to_string()),
            });
        }
        Ok(other) => {
            return Err(AnalysisError::InvalidResponse {
                reason: format!("expected a JSON object, got {}", other),
            });
        }
        Err(e) => return Err(AnalysisError::Json(e)),
    };

    // Backends emit `null` for missing collections; treat them as absent.
    strip_nulls(&mut body);

    let version = ContractVersion::of(&body);
    debug!(http_status, ?version, "resolving run-etl response");

    match version {
        ContractVersion::Analytics => resolve_analytics(http_status, ok, body),
        ContractVersion::File => resolve_file(http_status, ok, body),
    }
}

fn resolve_analytics(http_status: u16, ok: bool, body: Map<String, Value>) -> Result<AnalysisResult> {
    let succeeded = body
        .get(STATUS_FIELD)
        .and_then(Value::as_str)
        // Casing varies between backend deployments.
        .is_some_and(|status| status.eq_ignore_ascii_case(SUCCESS_STATUS));

    if !ok {
        return Ok(AnalysisResult::Failure(FailureResult {
            error: error_text(&body).unwrap_or_else(|| format!("HTTP {}", http_status)),
            http_status: Some(http_status),
            body: Some(Value::Object(body).to_string()),
        }));
    }

    if !succeeded {
        return Ok(AnalysisResult::Failure(FailureResult {
            error: error_text(&body).unwrap_or_else(|| "analysis failed".to_string()),
            http_status: Some(http_status),
            body: None,
        }));
    }

    let analytics: AnalyticsResult =
        serde_json::from_value(Value::Object(body)).map_err(|e| AnalysisError::InvalidResponse {
            reason: e.to_string(),
        })?;
    Ok(AnalysisResult::Analytics(analytics))
}

fn resolve_file(http_status: u16, ok: bool, body: Map<String, Value>) -> Result<AnalysisResult> {
    if !ok {
        return Ok(AnalysisResult::Failure(FailureResult {
            error: error_text(&body).unwrap_or_else(|| format!("HTTP {}", http_status)),
            http_status: Some(http_status),
            body: Some(Value::Object(body).to_string()),
        }));
    }

    let output_file = body
        .get(OUTPUT_FILE_FIELD)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(AnalysisResult::File(FileResult { output_file }))
}

fn strip_nulls(map: &mut Map<String, Value>) {
    map.retain(|_, value| !value.is_null());
    for value in map.values_mut() {
        if let Value::Object(inner) = value {
            strip_nulls(inner);
        }
    }
}

fn error_text(body: &Map<String, Value>) -> Option<String> {
    match body.get(ERROR_FIELD)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sentiment;

    #[test]
    fn file_success() {
        let result = resolve(200, r#"{"output_file": "out.json"}"#).unwrap();
        assert_eq!(
            result,
            AnalysisResult::File(FileResult {
                output_file: "out.json".to_string()
            })
        );
    }

    #[test]
    fn file_failure_echoes_body() {
        let result = resolve(404, r#"{"error": "not found"}"#).unwrap();
        let AnalysisResult::Failure(failure) = result else {
            panic!("expected failure, got {:?}", result);
        };
        assert_eq!(failure.error, "not found");
        assert_eq!(failure.http_status, Some(404));
        assert_eq!(failure.body.as_deref(), Some(r#"{"error":"not found"}"#));
        assert!(failure.message().contains("not found"));
    }

    #[test]
    fn analytics_success_with_missing_fields() {
        let result = resolve(200, r#"{"status": "Success", "topics": null}"#).unwrap();
        let analytics = result.analytics().expect("analytics result");
        assert_eq!(analytics.sentiment_breakdown.total(), 0);
        assert!(analytics.topics.keywords(Sentiment::Positive).is_empty());
        assert!(analytics.content_suggestions.is_empty());
        assert!(analytics.executive_summary.is_empty());
    }

    #[test]
    fn analytics_full_payload() {
        let body = r#"{
            "status": "Success",
            "sentiment_breakdown": {"positive": 3, "negative": 1, "neutral": 0, "mixed": 0},
            "topics": {"positive": {"great": 2}},
            "content_suggestions": ["post more"],
            "executive_summary": "Line one\nLine two"
        }"#;
        let result = resolve(200, body).unwrap();
        let analytics = result.analytics().expect("analytics result");
        assert_eq!(analytics.sentiment_breakdown.positive, 3);
        assert_eq!(analytics.topics.positive.get("great"), Some(&2.0));
        assert_eq!(analytics.content_suggestions, vec!["post more".to_string()]);
    }

    #[test]
    fn analytics_logical_failure_uses_error_field() {
        let result = resolve(200, r#"{"status": "Error", "error": "quota exceeded"}"#).unwrap();
        let AnalysisResult::Failure(failure) = result else {
            panic!("expected failure");
        };
        assert_eq!(failure.error, "quota exceeded");
        assert_eq!(failure.message(), "Error: quota exceeded");
    }

    #[test]
    fn analytics_status_on_http_error_is_failure() {
        let result = resolve(500, r#"{"status": "Success"}"#).unwrap();
        assert!(!result.is_success());
    }

    #[test]
    fn non_json_error_body_is_http_error() {
        let err = resolve(502, "Bad Gateway").unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Http { status: 502, body: Some(ref b) } if b == "Bad Gateway"
        ));
    }

    #[test]
    fn non_object_success_body_is_invalid() {
        assert!(matches!(
            resolve(200, "[1, 2]"),
            Err(AnalysisError::InvalidResponse { .. })
        ));
        assert!(matches!(resolve(200, "not json"), Err(AnalysisError::Json(_))));
    }

    #[test]
    fn nested_nulls_become_empty() {
        let body = r#"{
            "status": "Success",
            "sentiment_breakdown": {"positive": 3, "mixed": null},
            "topics": {"positive": {"great": 2, "meh": null}, "negative": null},
            "content_suggestions": null,
            "executive_summary": null
        }"#;
        let result = resolve(200, body).unwrap();
        let analytics = result.analytics().expect("analytics result");
        assert_eq!(analytics.sentiment_breakdown.positive, 3);
        assert_eq!(analytics.sentiment_breakdown.mixed, 0);
        assert_eq!(analytics.topics.positive.len(), 1);
        assert!(analytics.topics.negative.is_empty());
        assert!(analytics.content_suggestions.is_empty());
    }

    #[test]
    fn float_counts_are_accepted() {
        let body = r#"{"status": "Success", "sentiment_breakdown": {"positive": 3.0, "negative": 1.0, "neutral": 0.0, "mixed": 0}}"#;
        let result = resolve(200, body).unwrap();
        let analytics = result.analytics().expect("analytics result");
        assert_eq!(analytics.sentiment_breakdown.positive, 3);
        assert_eq!(analytics.sentiment_breakdown.total(), 4);
    }

    #[test]
    fn success_status_ignores_case() {
        assert!(resolve(200, r#"{"status": "success"}"#).unwrap().is_success());
        assert!(resolve(200, r#"{"status": "SUCCESS"}"#).unwrap().is_success());
        assert!(!resolve(200, r#"{"status": "Successful"}"#).unwrap().is_success());
    }

    #[test]
    fn negative_counts_are_rejected() {
        let body = r#"{"status": "Success", "sentiment_breakdown": {"positive": -1}}"#;
        assert!(matches!(
            resolve(200, body),
            Err(AnalysisError::InvalidResponse { .. })
        ));
    }
}
