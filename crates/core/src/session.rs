//! Submission state for one front end.
//!
//! `Idle -> Submitting -> Succeeded | Failed -> (next submission or reset)`.
//! A submission can only be finished by handing its [`SubmissionTicket`] back
//! to [`Session::complete`] or [`Session::fail`], both of which leave
//! `Submitting`.

use tracing::{debug, info};

use crate::{
    client::AnalysisBackend,
    derive::{ChartSegment, chart_segments, keywords_for_cloud, summary_bullets},
    error::{AnalysisError, Result},
    types::{AnalysisRequest, AnalysisResult, AnalyticsResult, CloudWord, OutputFormat, Sentiment},
};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded(AnalysisResult),
    Failed(String),
}

/// Proof that a submission is in flight. Not cloneable; consumed when it settles.
#[derive(Debug)]
#[must_use = "a submission must be completed to leave the loading state"]
pub struct SubmissionTicket {
    request: AnalysisRequest,
}

impl SubmissionTicket {
    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }
}

#[derive(Clone, Debug, Default)]
pub struct Session {
    pub input: String,
    pub format: OutputFormat,
    selected_sentiment: Sentiment,
    state: SubmissionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting)
    }

    pub fn selected_sentiment(&self) -> Sentiment {
        self.selected_sentiment
    }

    pub fn select_sentiment(&mut self, sentiment: Sentiment) {
        self.selected_sentiment = sentiment;
    }

    /// Validate `raw` and enter `Submitting`.
    ///
    /// On error the session is left untouched.
    pub fn begin(&mut self, raw: &str) -> Result<SubmissionTicket> {
        if self.is_loading() {
            return Err(AnalysisError::AlreadySubmitting);
        }
        let request = AnalysisRequest::new(raw)?.with_format(self.format);
        debug!(identifier = request.identifier(), "submission started");
        self.state = SubmissionState::Submitting;
        Ok(SubmissionTicket { request })
    }

    pub fn complete(&mut self, ticket: SubmissionTicket, outcome: Result<AnalysisResult>) {
        match outcome {
            Ok(AnalysisResult::Failure(failure)) => self.fail(ticket, failure.message()),
            Ok(result) => {
                info!(identifier = ticket.request.identifier(), "submission succeeded");
                self.state = SubmissionState::Succeeded(result);
            }
            Err(e) => self.fail(ticket, e.user_message()),
        }
    }

    /// Settle a submission with an already rendered failure message.
    pub fn fail(&mut self, ticket: SubmissionTicket, message: impl Into<String>) {
        let message = message.into();
        info!(identifier = ticket.request.identifier(), %message, "submission failed");
        self.state = SubmissionState::Failed(message);
    }

    /// Run one full submission of the current `input` against `backend`.
    pub async fn submit<B: AnalysisBackend>(&mut self, backend: &B) -> Result<()> {
        let raw = self.input.clone();
        let ticket = self.begin(&raw)?;
        let outcome = backend.run_etl(ticket.request()).await;
        self.complete(ticket, outcome);
        Ok(())
    }

    pub fn reset(&mut self) {
        if !self.is_loading() {
            self.state = SubmissionState::Idle;
        }
    }

    pub fn last_result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn analytics(&self) -> Option<&AnalyticsResult> {
        self.last_result().and_then(AnalysisResult::analytics)
    }

    pub fn result_message(&self) -> Option<String> {
        match &self.state {
            SubmissionState::Idle | SubmissionState::Submitting => None,
            SubmissionState::Failed(message) => Some(message.clone()),
            SubmissionState::Succeeded(AnalysisResult::File(file)) => Some(format!(
                "Success: ETL completed. Output saved to: {}",
                file.output_file
            )),
            SubmissionState::Succeeded(_) => Some("Success: analysis completed.".to_string()),
        }
    }

    pub fn chart(&self) -> Vec<ChartSegment> {
        self.analytics()
            .map(|a| chart_segments(&a.sentiment_breakdown))
            .unwrap_or_default()
    }

    pub fn cloud_words(&self) -> Vec<CloudWord> {
        keywords_for_cloud(self.analytics().map(|a| &a.topics), self.selected_sentiment)
    }

    pub fn suggestions(&self) -> &[String] {
        self.analytics()
            .map(|a| a.content_suggestions.as_slice())
            .unwrap_or_default()
    }

    pub fn summary_bullets(&self) -> Vec<String> {
        summary_bullets(self.analytics().map(|a| a.executive_summary.as_str()))
    }
}
