//! `/tools` operations.

use super::{Endpoint, RequestDescriptor, encode_path_segment};
use crate::error::ModelError;
use crate::models::{ErrorResponse, Run, RunRequest, Tool, ToolList};
use crate::wire::WireModel;
use reqwest::Method;

/// `POST /tools/{toolId}/run`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunTool {
    pub tool_id: String,
    pub body: RunRequest,
}

impl RunTool {
    #[must_use]
    pub fn new(tool_id: impl Into<String>, body: RunRequest) -> Self {
        Self {
            tool_id: tool_id.into(),
            body,
        }
    }
}

/// Outcome of running a tool.
///
/// `Accepted` is the server's answer to `options.async = true`: the run continues in the
/// background and its final state must be fetched later.
#[derive(Debug, Clone, PartialEq)]
pub enum RunToolResponse {
    /// 200: the run finished before the response was sent.
    Completed(Run),
    /// 202: the run was accepted and is still executing.
    Accepted(Run),
    /// 400: invalid inputs or options.
    BadRequest(ErrorResponse),
    /// 409: a run with the supplied `runId` already exists.
    Conflict(ErrorResponse),
    /// 410: the tool no longer exists.
    Gone(ErrorResponse),
    /// 429: rate limited.
    TooManyRequests(ErrorResponse),
}

impl RunToolResponse {
    /// The run, for `Completed` and `Accepted`.
    #[must_use]
    pub fn run(&self) -> Option<&Run> {
        match self {
            Self::Completed(run) | Self::Accepted(run) => Some(run),
            _ => None,
        }
    }

    /// The error payload, for every other outcome.
    #[must_use]
    pub fn error(&self) -> Option<&ErrorResponse> {
        match self {
            Self::BadRequest(e) | Self::Conflict(e) | Self::Gone(e) | Self::TooManyRequests(e) => {
                Some(e)
            }
            Self::Completed(_) | Self::Accepted(_) => None,
        }
    }
}

impl Endpoint for RunTool {
    type Output = RunToolResponse;
    const NAME: &'static str = "runTool";

    fn request(&self) -> RequestDescriptor {
        RequestDescriptor::new(
            Method::POST,
            format!("/tools/{}/run", encode_path_segment(&self.tool_id)),
        )
        .with_json(self.body.to_json())
    }

    fn parse_response(status: u16, body: &[u8]) -> Result<Option<RunToolResponse>, ModelError> {
        Ok(Some(match status {
            200 => RunToolResponse::Completed(Run::from_slice(body)?),
            202 => RunToolResponse::Accepted(Run::from_slice(body)?),
            400 => RunToolResponse::BadRequest(ErrorResponse::from_slice(body)?),
            409 => RunToolResponse::Conflict(ErrorResponse::from_slice(body)?),
            410 => RunToolResponse::Gone(ErrorResponse::from_slice(body)?),
            429 => RunToolResponse::TooManyRequests(ErrorResponse::from_slice(body)?),
            _ => return Ok(None),
        }))
    }
}

/// `GET /tools/{toolId}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTool {
    pub tool_id: String,
}

impl GetTool {
    #[must_use]
    pub fn new(tool_id: impl Into<String>) -> Self {
        Self {
            tool_id: tool_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GetToolResponse {
    Found(Tool),
    NotFound(ErrorResponse),
}

impl Endpoint for GetTool {
    type Output = GetToolResponse;
    const NAME: &'static str = "getTool";

    fn request(&self) -> RequestDescriptor {
        RequestDescriptor::new(
            Method::GET,
            format!("/tools/{}", encode_path_segment(&self.tool_id)),
        )
    }

    fn parse_response(status: u16, body: &[u8]) -> Result<Option<GetToolResponse>, ModelError> {
        Ok(Some(match status {
            200 => GetToolResponse::Found(Tool::from_slice(body)?),
            404 => GetToolResponse::NotFound(ErrorResponse::from_slice(body)?),
            _ => return Ok(None),
        }))
    }
}

/// `GET /tools`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListTools {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Default for ListTools {
    fn default() -> Self {
        Self {
            page: Some(1),
            limit: Some(50),
        }
    }
}

impl ListTools {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

impl Endpoint for ListTools {
    type Output = ToolList;
    const NAME: &'static str = "listTools";

    fn request(&self) -> RequestDescriptor {
        RequestDescriptor::new(Method::GET, "/tools")
            .with_query("page", self.page)
            .with_query("limit", self.limit)
    }

    fn parse_response(status: u16, body: &[u8]) -> Result<Option<ToolList>, ModelError> {
        match status {
            200 => ToolList::from_slice(body).map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GetTool, GetToolResponse, ListTools, RunTool, RunToolResponse};
    use crate::api::Endpoint;
    use crate::error::ModelError;
    use crate::field::Field;
    use crate::models::{RunOptions, RunRequest, RunStatus};
    use reqwest::Method;
    use serde_json::json;

    const RUN: &[u8] = br#"{"runId":"r","toolId":"t","status":"running","metadata":{}}"#;
    const ERROR: &[u8] = br#"{"error":{"message":"nope"}}"#;

    #[test]
    fn run_tool_posts_json_body_to_encoded_path() {
        let body = RunRequest {
            options: Field::Value(RunOptions {
                async_execution: Field::Value(true),
                ..RunOptions::default()
            }),
            ..RunRequest::default()
        };
        let req = RunTool::new("folder/tool", body).request();
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path, "/tools/folder%2Ftool/run");
        assert!(req.query.is_empty());
        assert_eq!(req.body, Some(json!({"options": {"async": true}})));
        assert!(
            req.headers
                .iter()
                .any(|(k, v)| k == "Content-Type" && v == "application/json")
        );
    }

    #[test]
    fn run_tool_dispatches_every_declared_status() {
        let completed = RunTool::parse_response(200, RUN).expect("200");
        assert!(matches!(completed, Some(RunToolResponse::Completed(_))));

        let accepted = RunTool::parse_response(202, RUN).expect("202");
        let Some(RunToolResponse::Accepted(run)) = &accepted else {
            panic!("expected accepted");
        };
        assert_eq!(run.status, RunStatus::Running);
        assert!(accepted.as_ref().and_then(RunToolResponse::error).is_none());

        for (status, expect) in [
            (400, "BadRequest"),
            (409, "Conflict"),
            (410, "Gone"),
            (429, "TooManyRequests"),
        ] {
            let outcome = RunTool::parse_response(status, ERROR)
                .expect("declared")
                .expect("parsed");
            let name = match &outcome {
                RunToolResponse::BadRequest(_) => "BadRequest",
                RunToolResponse::Conflict(_) => "Conflict",
                RunToolResponse::Gone(_) => "Gone",
                RunToolResponse::TooManyRequests(_) => "TooManyRequests",
                RunToolResponse::Completed(_) | RunToolResponse::Accepted(_) => "run",
            };
            assert_eq!(name, expect, "status {status}");
            assert_eq!(outcome.error().and_then(|e| e.message()), Some("nope"));
            assert!(outcome.run().is_none());
        }

        assert_eq!(RunTool::parse_response(500, b"internal"), Ok(None));
        assert_eq!(RunTool::parse_response(201, RUN), Ok(None));
    }

    #[test]
    fn run_tool_surfaces_bad_payloads() {
        let err = RunTool::parse_response(200, b"not json").expect_err("invalid json");
        assert!(matches!(err, ModelError::Schema { .. }));
    }

    #[test]
    fn get_tool_dispatches_by_status() {
        let req = GetTool::new("a/b").request();
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.path, "/tools/a%2Fb");

        let tool = br#"{"id":"a/b","steps":[]}"#;
        let Ok(Some(GetToolResponse::Found(tool))) = GetTool::parse_response(200, tool) else {
            panic!("expected tool");
        };
        assert_eq!(tool.id, "a/b");
        assert!(matches!(
            GetTool::parse_response(404, ERROR),
            Ok(Some(GetToolResponse::NotFound(_)))
        ));
        assert_eq!(GetTool::parse_response(400, ERROR), Ok(None));
    }

    #[test]
    fn get_tool_accepts_numeric_query_params() {
        let body = br#"{"id":"t","steps":[{"id":"s","url":"https://x","method":"GET","systemId":"sys","queryParams":{"q":"<<(sourceData) => sourceData.q>>","limit":10}}]}"#;
        let Ok(Some(GetToolResponse::Found(tool))) = GetTool::parse_response(200, body) else {
            panic!("expected tool");
        };
        assert_eq!(tool.steps[0].query_param("limit").as_deref(), Some("10"));
    }

    #[test]
    fn list_tools_defaults_to_first_page() {
        let req = ListTools::new().request();
        assert_eq!(req.path, "/tools");
        assert_eq!(req.query_value("page"), Some("1"));
        assert_eq!(req.query_value("limit"), Some("50"));
        assert_eq!(ListTools::new().page(2).request().query_value("page"), Some("2"));
    }
}
