use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Please enter a YouTube video ID or link.")]
    Validation,

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Http { status: u16, body: Option<String> },

    #[error("Invalid response from analysis backend: {reason}")]
    InvalidResponse { reason: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("A submission is already in flight")]
    AlreadySubmitting,

    #[error("Missing base URL for {mode} mode: {env_var} environment variable is not set")]
    MissingBaseUrl { mode: &'static str, env_var: &'static str },

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}

impl AnalysisError {
    /// User-facing text for a failed submission.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::Transport(e) => {
                format!("Failed to execute ETL pipeline. Error: {}", e)
            }
            AnalysisError::Http {
                status,
                body: Some(body),
            } => format!("Error: HTTP {}. Response: {}", status, body),
            AnalysisError::Http { status, body: None } => format!("Error: HTTP {}", status),
            other => format!("Failed to execute ETL pipeline. Error: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
