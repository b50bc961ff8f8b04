use std::{fmt, str::FromStr, time::Duration};

use crate::{
    error::{AnalysisError, Result},
    types::RequestShape,
};

pub const MODE_ENV_VAR: &str = "COMMENTPULSE_MODE";

/// Log directives used when `RUST_LOG` is unset. Matches every
/// `commentpulse*` target.
pub const DEFAULT_LOG_FILTER: &str = "warn,commentpulse=info";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Development,
    Production,
}

pub struct ModeConfig {
    pub env_var: &'static str,
    pub default_base_url: Option<&'static str>,
}

impl Mode {
    pub fn config(&self) -> ModeConfig {
        match self {
            Mode::Development => ModeConfig {
                env_var: "COMMENTPULSE_DEV_API_URL",
                default_base_url: Some("http://localhost:5000"),
            },
            Mode::Production => ModeConfig {
                env_var: "COMMENTPULSE_API_URL",
                default_base_url: None,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    /// Mode selected by `COMMENTPULSE_MODE`, development when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var(MODE_ENV_VAR) {
            Ok(value) => value.parse(),
            Err(_) => Ok(Mode::default()),
        }
    }

    /// Base URL for this mode from its environment variable or built-in default.
    pub fn base_url(&self) -> Result<String> {
        let config = self.config();
        std::env::var(config.env_var)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| config.default_base_url.map(str::to_string))
            .ok_or(AnalysisError::MissingBaseUrl {
                mode: self.name(),
                env_var: config.env_var,
            })
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Mode::Development),
            "production" | "prod" => Ok(Mode::Production),
            _ => Err(AnalysisError::UnknownValue {
                kind: "mode",
                value: s.to_string(),
            }),
        }
    }
}

/// Everything the client needs to reach the backend, resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    mode: Mode,
    shape: RequestShape,
    timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, mode: Mode) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            mode,
            shape: RequestShape::default(),
            timeout: None,
        })
    }

    pub fn for_mode(mode: Mode) -> Result<Self> {
        Self::new(mode.base_url()?, mode)
    }

    pub fn from_env() -> Result<Self> {
        Self::for_mode(Mode::from_env()?)
    }

    pub fn with_shape(mut self, shape: RequestShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn shape(&self) -> RequestShape {
        self.shape
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn run_etl_url(&self) -> String {
        format!("{}/run-etl", self.base_url)
    }
}

fn normalize_base_url(raw: String) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(AnalysisError::InvalidBaseUrl {
            url: raw,
            reason: "expected an http:// or https:// URL".to_string(),
        });
    }
    if trimmed.contains('?') || trimmed.contains('#') {
        return Err(AnalysisError::InvalidBaseUrl {
            url: raw,
            reason: "must not carry a query or fragment".to_string(),
        });
    }
    Ok(trimmed.to_string())
}
