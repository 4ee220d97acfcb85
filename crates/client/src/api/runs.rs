//! `/runs` operations.

use super::{Endpoint, RequestDescriptor, encode_path_segment};
use crate::error::ModelError;
use crate::models::{ErrorResponse, Run, RunList, RunStatus};
use crate::wire::WireModel;
use reqwest::Method;

/// `GET /runs`. Runs are listed newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRuns {
    pub tool_id: Option<String>,
    pub status: Option<RunStatus>,
    /// 1-based. Defaults to 1.
    pub page: Option<u32>,
    /// Defaults to 50.
    pub limit: Option<u32>,
}

impl Default for ListRuns {
    fn default() -> Self {
        Self {
            tool_id: None,
            status: None,
            page: Some(1),
            limit: Some(50),
        }
    }
}

impl ListRuns {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tool_id(mut self, tool_id: impl Into<String>) -> Self {
        self.tool_id = Some(tool_id.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: RunStatus) -> Self {
        self.status = Some(status);
        self
    }

    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl Endpoint for ListRuns {
    type Output = RunList;
    const NAME: &'static str = "listRuns";

    fn request(&self) -> RequestDescriptor {
        RequestDescriptor::new(Method::GET, "/runs")
            .with_query("toolId", self.tool_id.as_deref())
            .with_query("status", self.status.map(RunStatus::as_str))
            .with_query("page", self.page)
            .with_query("limit", self.limit)
    }

    fn parse_response(status: u16, body: &[u8]) -> Result<Option<RunList>, ModelError> {
        match status {
            200 => RunList::from_slice(body).map(Some),
            _ => Ok(None),
        }
    }
}

/// `POST /runs/{runId}/cancel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelRun {
    pub run_id: String,
}

impl CancelRun {
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CancelRunResponse {
    /// 200: the run, now aborted.
    Cancelled(Run),
    /// 400: e.g. the run already finished.
    BadRequest(ErrorResponse),
}

impl Endpoint for CancelRun {
    type Output = CancelRunResponse;
    const NAME: &'static str = "cancelRun";

    fn request(&self) -> RequestDescriptor {
        RequestDescriptor::new(
            Method::POST,
            format!("/runs/{}/cancel", encode_path_segment(&self.run_id)),
        )
    }

    fn parse_response(status: u16, body: &[u8]) -> Result<Option<CancelRunResponse>, ModelError> {
        Ok(Some(match status {
            200 => CancelRunResponse::Cancelled(Run::from_slice(body)?),
            400 => CancelRunResponse::BadRequest(ErrorResponse::from_slice(body)?),
            _ => return Ok(None),
        }))
    }
}

/// `GET /runs/{runId}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRun {
    pub run_id: String,
}

impl GetRun {
    #[must_use]
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GetRunResponse {
    Found(Run),
    NotFound(ErrorResponse),
}

impl Endpoint for GetRun {
    type Output = GetRunResponse;
    const NAME: &'static str = "getRun";

    fn request(&self) -> RequestDescriptor {
        RequestDescriptor::new(
            Method::GET,
            format!("/runs/{}", encode_path_segment(&self.run_id)),
        )
    }

    fn parse_response(status: u16, body: &[u8]) -> Result<Option<GetRunResponse>, ModelError> {
        Ok(Some(match status {
            200 => GetRunResponse::Found(Run::from_slice(body)?),
            404 => GetRunResponse::NotFound(ErrorResponse::from_slice(body)?),
            _ => return Ok(None),
        }))
    }
}
