//! HTTP clients for the analysis and start-run endpoints

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::{AnalysisTransport, LexRequest, LexResponse, RunLauncher, RunRequest, RunResponse};
use crate::config::{AnalysisConfig, ExecutionConfig};
use crate::error::{Error, Result};

/// Analysis endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpAnalysisTransport {
    client: Client,
    endpoint: String,
}

impl HttpAnalysisTransport {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl AnalysisTransport for HttpAnalysisTransport {
    async fn analyze(&self, source: &str) -> Result<LexResponse> {
        debug!(endpoint = %self.endpoint, bytes = source.len(), "POST analysis request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&LexRequest {
                source_code: source,
            })
            .send()
            .await
            .map_err(|e| Error::AnalysisTransportFailed {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::AnalysisHttpStatus {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        response
            .json::<LexResponse>()
            .await
            .map_err(|e| Error::AnalysisTransportFailed {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })
    }
}

/// Start-run endpoint over HTTP
///
/// Only connecting is bounded; the answer arrives when the program ends.
#[derive(Debug, Clone)]
pub struct HttpRunLauncher {
    client: Client,
    endpoint: String,
}

impl HttpRunLauncher {
    pub fn new(config: &ExecutionConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.run_endpoint.clone(),
        })
    }
}

#[async_trait]
impl RunLauncher for HttpRunLauncher {
    async fn start_run(&self, source: &str) -> Result<RunResponse> {
        debug!(endpoint = %self.endpoint, "POST start-run request");

        let launch_failed = |reason: String| Error::RunLaunchFailed {
            endpoint: self.endpoint.clone(),
            reason,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&RunRequest {
                source_code: source,
            })
            .send()
            .await
            .map_err(|e| launch_failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(launch_failed(format!("HTTP error! status: {}", status.as_u16())));
        }

        response
            .json::<RunResponse>()
            .await
            .map_err(|e| launch_failed(e.to_string()))
    }
}
