use tracing::{debug, info, warn};

use crate::{
    config::ClientConfig,
    contract,
    error::Result,
    types::{AnalysisRequest, AnalysisResult},
};

/// Something that can run the remote ETL job for a request.
pub trait AnalysisBackend {
    async fn run_etl(&self, request: &AnalysisRequest) -> Result<AnalysisResult>;
}

/// HTTP client for the `/run-etl` endpoint
#[derive(Clone, Debug)]
pub struct AnalysisClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl AnalysisBackend for AnalysisClient {
    async fn run_etl(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let url = self.config.run_etl_url();
        let query = request.query_pairs(self.config.shape());
        debug!(%url, ?query, "dispatching run-etl");

        let response = self.http.get(&url).query(&query).send().await.map_err(|e| {
            warn!(error = %e, "run-etl transport failure");
            e
        })?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let result = contract::resolve(status, &body)?;

        match &result {
            AnalysisResult::Failure(failure) => {
                warn!(status, error = %failure.error, "run-etl reported failure")
            }
            _ => info!(status, identifier = request.identifier(), "run-etl completed"),
        }

        Ok(result)
    }
}
