//! Blocking transport. Same operations and outcomes as [`crate::Client`].

use crate::api::runs::{CancelRun, CancelRunResponse, GetRun, GetRunResponse, ListRuns};
use crate::api::tools::{GetTool, GetToolResponse, ListTools, RunTool, RunToolResponse};
use crate::api::{Endpoint, Response, build_response};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::models::{RunList, RunRequest, ToolList};
use reqwest::header::HeaderMap;
use std::sync::Arc;

/// Blocking client. Must not be used from inside an async runtime.
#[derive(Clone, Debug)]
pub struct BlockingClient {
    config: Arc<ClientConfig>,
    headers: HeaderMap,
    http: reqwest::blocking::Client,
}

impl BlockingClient {
    /// # Errors
    ///
    /// Returns an error if a configured header is invalid or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        // reqwest's blocking client applies a 30s timeout unless told otherwise.
        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Self::with_http_client(config, http)
    }

    /// # Errors
    ///
    /// Returns an error if a configured header is invalid.
    pub fn with_http_client(config: ClientConfig, http: reqwest::blocking::Client) -> Result<Self> {
        Ok(Self {
            headers: config.default_headers()?,
            config: Arc::new(config),
            http,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// # Errors
    ///
    /// Returns an error on transport failure, on a body that does not match the declared
    /// schema, or on an undeclared status when `raise_on_unexpected_status` is set.
    pub fn execute_detailed<E: Endpoint>(&self, endpoint: &E) -> Result<Response<E::Output>> {
        let descriptor = endpoint.request();
        let url = descriptor.url(&self.config.base_url)?;
        tracing::debug!(
            operation = E::NAME,
            method = %descriptor.method,
            path = %descriptor.path,
            "sending request"
        );

        let mut request = self
            .http
            .request(descriptor.method.clone(), url)
            .headers(self.headers.clone());
        for (name, value) in &descriptor.headers {
            request = request.header(name, value);
        }
        if let Some(body) = &descriptor.body {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();
        tracing::debug!(operation = E::NAME, status = status.as_u16(), "received response");

        build_response::<E>(status, headers, body, self.config.raise_on_unexpected_status)
    }

    /// # Errors
    ///
    /// See [`BlockingClient::execute_detailed`].
    pub fn execute<E: Endpoint>(&self, endpoint: &E) -> Result<Option<E::Output>> {
        Ok(self.execute_detailed(endpoint)?.parsed)
    }

    /// # Errors
    ///
    /// See [`BlockingClient::execute_detailed`].
    pub fn list_runs(&self, params: &ListRuns) -> Result<Option<RunList>> {
        self.execute(params)
    }

    /// # Errors
    ///
    /// See [`BlockingClient::execute_detailed`].
    pub fn run_tool(
        &self,
        tool_id: impl Into<String>,
        body: RunRequest,
    ) -> Result<Option<RunToolResponse>> {
        self.execute(&RunTool::new(tool_id, body))
    }

    /// # Errors
    ///
    /// See [`BlockingClient::execute_detailed`].
    pub fn cancel_run(&self, run_id: impl Into<String>) -> Result<Option<CancelRunResponse>> {
        self.execute(&CancelRun::new(run_id))
    }

    /// # Errors
    ///
    /// See [`BlockingClient::execute_detailed`].
    pub fn get_run(&self, run_id: impl Into<String>) -> Result<Option<GetRunResponse>> {
        self.execute(&GetRun::new(run_id))
    }

    /// # Errors
    ///
    /// See [`BlockingClient::execute_detailed`].
    pub fn get_tool(&self, tool_id: impl Into<String>) -> Result<Option<GetToolResponse>> {
        self.execute(&GetTool::new(tool_id))
    }

    /// # Errors
    ///
    /// See [`BlockingClient::execute_detailed`].
    pub fn list_tools(&self, params: &ListTools) -> Result<Option<ToolList>> {
        self.execute(params)
    }
}
